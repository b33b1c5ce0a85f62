//! Merged working-copy/repository tree: node arena, reconciliation,
//! selection, and materialization.

mod materialize;
mod node;
pub mod path;
mod reconcile;
mod select;

pub use materialize::update_only_this_item;
pub use node::{display_name, NodeId, Tree, TreeNode};
pub use reconcile::Reconciler;
pub use select::select_from;
