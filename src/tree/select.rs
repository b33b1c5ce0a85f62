//! Selection resolution: map a literal filesystem path onto a chain of
//! tree nodes, expanding the chain and selecting its end.

use crate::gateway::RepoGateway;
use crate::tree::node::{NodeId, Tree};
use crate::tree::path;
use std::path::Path;
use tracing::debug;

/// Resolve `target` against the tree anchored at `at` and select the
/// deepest matching node.
///
/// Callable only on the true root: a call on any node with a parent is a
/// no-op returning `None`. The path is decomposed into display-name
/// components between the working-copy root (resolved through the gateway)
/// and `target`; the walk descends from the single top-level child, marking
/// each matched ancestor expanded. Components that stop matching end the
/// descent early without error, and the deepest node reached is expanded
/// and selected. Exactly one node is selected per call; a previous
/// selection is not cleared here.
pub async fn select_from(
    tree: &mut Tree,
    at: NodeId,
    gateway: &dyn RepoGateway,
    target: &Path,
) -> Option<NodeId> {
    if tree.node(at).parent().is_some() {
        return None;
    }
    let top = tree.top_level()?;

    let root = match gateway.working_copy_root(target).await {
        Ok(Some(root)) => root,
        Ok(None) | Err(_) => {
            debug!(path = %target.display(), "selection target has no resolvable working copy");
            return None;
        }
    };

    let parts = {
        let root = root.clone();
        let target = target.to_path_buf();
        tokio::task::spawn_blocking(move || path::components_below_root(&root, &target))
            .await
            .unwrap_or_default()
    };

    let mut current = top;
    for part in &parts {
        match tree.child_by_name(current, part) {
            Some(child) => {
                tree.node_mut(current).is_expanded = true;
                current = child;
            }
            None => break,
        }
    }

    let node = tree.node_mut(current);
    node.is_expanded = true;
    node.is_selected = true;
    Some(current)
}
