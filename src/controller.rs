//! View controller: owns the current tree and orchestrates drops,
//! selection, and materialization requests.
//!
//! State machine: `Empty` (no tree) and `Built`. A drop in `Empty` always
//! builds; a drop in `Built` reuses the existing tree when the dropped path
//! resolves to the same working-copy root, and rebuilds otherwise. The
//! controller lives for the process lifetime.
//!
//! All mutating operations take `&mut self`, so overlapping
//! reconciliations or materializations against the same tree are excluded
//! at compile time; a presentation layer sharing the controller serializes
//! through its own mutex.

use crate::error::ViewError;
use crate::gateway::{IconProvider, RepoGateway};
use crate::tree::{select_from, update_only_this_item, NodeId, Reconciler, Tree};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Display sentinel for a path outside any working copy.
pub const NOT_VERSIONED_TEXT: &str = "<No SVN Versioned Item.>";
/// Display sentinel for a failed path classification.
pub const ERROR_TEXT: &str = "<Error Occur.>";

/// Input events from the presentation layer, dispatched by pattern
/// matching. Payloads are strongly typed; there is no downcasting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// Pointer hovering with a payload; accepted but changes no state.
    DragPreview(PathBuf),
    /// A path was dropped onto the view.
    Drop(PathBuf),
    /// The rendered tree changed its selection.
    SelectionChanged(NodeId),
    /// The user asked to materialize a repository-only entry.
    UpdateRequested(NodeId),
}

pub struct ViewController {
    gateway: Arc<dyn RepoGateway>,
    icons: Arc<dyn IconProvider>,
    metadata_dir: String,
    tree: Option<Tree>,
    local_path_text: String,
    repository_path_text: String,
    selected_name: String,
}

impl ViewController {
    pub fn new(
        gateway: Arc<dyn RepoGateway>,
        icons: Arc<dyn IconProvider>,
        metadata_dir: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            icons,
            metadata_dir: metadata_dir.into(),
            tree: None,
            local_path_text: String::new(),
            repository_path_text: String::new(),
            selected_name: String::new(),
        }
    }

    /// The current tree, if one has been built.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn local_path_text(&self) -> &str {
        &self.local_path_text
    }

    pub fn repository_path_text(&self) -> &str {
        &self.repository_path_text
    }

    pub fn selected_name(&self) -> &str {
        &self.selected_name
    }

    pub async fn handle_event(&mut self, event: ViewEvent) -> Result<(), ViewError> {
        match event {
            ViewEvent::DragPreview(path) => {
                debug!(path = %path.display(), "drag preview");
                Ok(())
            }
            ViewEvent::Drop(path) => {
                self.on_path_dropped(&path).await;
                Ok(())
            }
            ViewEvent::SelectionChanged(id) => {
                let tree = self.tree.as_ref().ok_or(ViewError::NoTree)?;
                let node = tree.get(id).ok_or(ViewError::UnknownNode)?;
                self.selected_name = node.name().to_string();
                Ok(())
            }
            ViewEvent::UpdateRequested(id) => self.update_only_this_item(id).await,
        }
    }

    /// Classify a dropped path and either reuse, rebuild, or publish a
    /// sentinel. Probe errors never propagate; they surface as the error
    /// sentinel with the previously built tree left untouched.
    pub async fn on_path_dropped(&mut self, path: &Path) {
        let path = normalize(path);
        self.local_path_text = path.display().to_string();

        if self.is_same_work_copy(&path).await {
            debug!(path = %path.display(), "same working copy, reusing tree");
            let gateway = Arc::clone(&self.gateway);
            if let Some(tree) = self.tree.as_mut() {
                let root = tree.root();
                select_from(tree, root, &*gateway, &path).await;
            }
            return;
        }

        let root = match self.gateway.working_copy_root(&path).await {
            Ok(root) => root,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "working-copy probe failed");
                self.repository_path_text = ERROR_TEXT.to_string();
                return;
            }
        };
        let uri = match self.gateway.repo_location(&path).await {
            Ok(uri) => uri,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "repository location probe failed");
                self.repository_path_text = ERROR_TEXT.to_string();
                return;
            }
        };

        match (root, uri) {
            (Some(root), Some(uri)) => {
                info!(root = %root.display(), "building tree");
                let reconciler =
                    Reconciler::new(&*self.gateway, &*self.icons, self.metadata_dir.clone());
                let tree = reconciler.build_root(&normalize(&root), &path).await;
                self.tree = Some(tree);
                self.repository_path_text = uri.to_string();
            }
            _ => {
                debug!(path = %path.display(), "path is not version-controlled");
                self.repository_path_text = NOT_VERSIONED_TEXT.to_string();
            }
        }
    }

    /// True iff the existing tree's top-level child has a local path equal
    /// to the working-copy root resolved for `path`. Any probe failure is
    /// treated as a different working copy, forcing the safe rebuild.
    pub async fn is_same_work_copy(&self, path: &Path) -> bool {
        let Some(tree) = self.tree.as_ref() else {
            return false;
        };
        let Some(top) = tree.top_level() else {
            return false;
        };
        let Some(existing) = tree.node(top).local_path.as_deref() else {
            return false;
        };
        match self.gateway.working_copy_root(path).await {
            Ok(Some(root)) => normalize(existing) == normalize(&root),
            Ok(None) | Err(_) => false,
        }
    }

    /// Materialize a repository-only node; see
    /// [`crate::tree::update_only_this_item`] for chain semantics.
    pub async fn update_only_this_item(&mut self, id: NodeId) -> Result<(), ViewError> {
        let gateway = Arc::clone(&self.gateway);
        let icons = Arc::clone(&self.icons);
        let tree = self.tree.as_mut().ok_or(ViewError::NoTree)?;
        if tree.get(id).is_none() {
            return Err(ViewError::UnknownNode);
        }
        update_only_this_item(tree, &*gateway, &*icons, id)
            .await
            .map_err(ViewError::from)
    }
}

/// Canonicalize without UNC-prefix surprises; fall back to the path as
/// given when it does not (yet) exist.
fn normalize(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
