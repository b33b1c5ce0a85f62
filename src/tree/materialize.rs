//! Selective materialization of repository-only nodes.
//!
//! Each update call requires the node's parent directory to exist locally,
//! so the missing chain is fetched outermost-first, one level at a time.

use crate::error::MaterializeError;
use crate::gateway::{IconProvider, RepoGateway};
use crate::tree::node::{NodeId, Tree};
use crate::tree::path::strip_directory_marker;
use crate::types::UpdateSpec;
use std::path::PathBuf;
use tracing::{debug, info};

/// Materialize `target` into the working copy.
///
/// Walks upward collecting `target` and every ancestor lacking a local
/// path, then updates the chain outermost-first: one incremental
/// immediate-children update of the parent directory per level, computing
/// the node's local path and flipping `has_local_copy` as each level lands.
/// A failing step aborts the remainder; levels already materialized keep
/// their new state, since a fetched ancestor is useful on its own.
pub async fn update_only_this_item(
    tree: &mut Tree,
    gateway: &dyn RepoGateway,
    icons: &dyn IconProvider,
    target: NodeId,
) -> Result<(), MaterializeError> {
    if !tree.node(target).is_repository_only() {
        return Err(MaterializeError::NotRepositoryOnly {
            name: tree.node(target).name().to_string(),
        });
    }

    // Chain of nodes missing locally, deepest first, target included.
    let mut chain = Vec::new();
    let mut current = Some(target);
    loop {
        let Some(id) = current else {
            // Ran past the top without meeting a local path. The
            // working-copy root always has one, so the tree invariants are
            // broken; fail closed.
            return Err(MaterializeError::MissingLocalAncestor {
                name: tree.node(target).name().to_string(),
            });
        };
        if tree.node(id).local_path.is_some() {
            break;
        }
        chain.push(id);
        current = tree.node(id).parent();
    }

    debug!(
        node = tree.node(target).name(),
        levels = chain.len(),
        "materializing repository-only chain"
    );

    let spec = UpdateSpec::default();
    for id in chain.into_iter().rev() {
        let parent_local: PathBuf = tree
            .node(id)
            .parent()
            .and_then(|p| tree.node(p).local_path.clone())
            .ok_or_else(|| MaterializeError::MissingLocalAncestor {
                name: tree.node(id).name().to_string(),
            })?;

        gateway
            .update(&parent_local, &spec)
            .await
            .map_err(|source| MaterializeError::Step {
                name: tree.node(id).name().to_string(),
                source,
            })?;

        let local = parent_local.join(strip_directory_marker(tree.node(id).name()));
        let node = tree.node_mut(id);
        node.icon = icons.icon_for(&local);
        node.local_path = Some(local);
        node.has_local_copy = true;
    }

    // Reveal the freshly materialized entry.
    tree.expand_ancestors(target);

    info!(node = tree.node(target).name(), "materialized");
    Ok(())
}
