//! Core types shared across the reconciliation engine and the gateway boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a tree entry, as reported by either the filesystem or the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// Address of a node inside the remote repository, independent of any checkout.
///
/// Directory URIs carry a trailing `/`; file URIs do not. The distinction is
/// load-bearing: display names are derived from the final segment, and joining
/// a child name onto a directory URI must not double the separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoUri(String);

impl RepoUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a child segment. `name` may itself carry a trailing `/` for
    /// directories, which is preserved in the result.
    pub fn join(&self, name: &str) -> RepoUri {
        let base = self.0.trim_end_matches('/');
        RepoUri(format!("{}/{}", base, name))
    }

    /// Final path segment, without any trailing `/`.
    pub fn file_name(&self) -> &str {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("")
    }

    pub fn is_directory(&self) -> bool {
        self.0.ends_with('/')
    }
}

impl fmt::Display for RepoUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    /// Bare entry name as reported by the repository (no trailing `/`).
    pub name: String,
    pub kind: NodeKind,
    pub uri: RepoUri,
}

/// Checkout depth for an update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Empty,
    ImmediateChildren,
    Infinity,
}

/// Revision selector for an update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revision {
    Head,
    Number(u64),
}

/// Parameters for a working-copy update. The defaults are the only
/// combination the materializer uses: fetch one level, never shrink an
/// existing deeper checkout, always at HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSpec {
    pub depth: Depth,
    pub preserve_depth: bool,
    pub revision: Revision,
}

impl Default for UpdateSpec {
    fn default() -> Self {
        Self {
            depth: Depth::ImmediateChildren,
            preserve_depth: true,
            revision: Revision::Head,
        }
    }
}

/// Opaque handle to a platform icon image. The presentation layer owns the
/// mapping from handle to pixels; the core only moves handles around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconHandle(pub u64);

impl IconHandle {
    /// Fallback icon used whenever resolution fails.
    pub const PLACEHOLDER: IconHandle = IconHandle(0);
}

impl Default for IconHandle {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}
