//! Filesystem path probing and decomposition.

use crate::types::NodeKind;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

fn kind_of(meta: &Metadata) -> Option<NodeKind> {
    if meta.is_file() {
        Some(NodeKind::File)
    } else if meta.is_dir() {
        Some(NodeKind::Directory)
    } else {
        None
    }
}

/// Probe `path` without blocking the caller's thread. `None` means absent or
/// unreadable; callers treat that as an unknown-kind leaf, not an error.
pub async fn classify(path: &Path) -> Option<NodeKind> {
    let meta = tokio::fs::metadata(path).await.ok()?;
    kind_of(&meta)
}

/// Synchronous variant for code already running on a worker thread.
pub fn classify_blocking(path: &Path) -> Option<NodeKind> {
    let meta = std::fs::metadata(path).ok()?;
    kind_of(&meta)
}

/// Decompose `path` into display-name components below `root`, ordered
/// root-first. Each component is classified by probing the filesystem;
/// directories carry the trailing `/` so they compare equal to tree names.
///
/// The walk runs upward from `path`; it stops as soon as a component is
/// neither file nor directory, discarding everything not yet collected.
/// An empty result is not an error: the caller simply selects the root.
pub fn components_below_root(root: &Path, path: &Path) -> Vec<String> {
    let mut parts = Vec::new();
    let mut next: PathBuf = path.to_path_buf();
    while next != root {
        let part = match classify_blocking(&next) {
            Some(NodeKind::File) => name_of(&next),
            Some(NodeKind::Directory) => name_of(&next).map(|n| format!("{}/", n)),
            None => break,
        };
        let Some(part) = part else { break };
        let Some(parent) = next.parent().map(Path::to_path_buf) else {
            break;
        };
        parts.push(part);
        next = parent;
    }
    parts.reverse();
    parts
}

fn name_of(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Strip the display-name directory marker for filesystem use.
pub fn strip_directory_marker(name: &str) -> &str {
    name.trim_end_matches('/')
}
