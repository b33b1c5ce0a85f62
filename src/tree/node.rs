//! Merged-tree node model.
//!
//! Nodes live in a [`Tree`] arena and are addressed by [`NodeId`] indices.
//! Parent links are back-reference indices, so the parent/child graph has no
//! ownership cycles and a held `NodeId` stays valid for the lifetime of the
//! arena: materialization mutates node fields in place and never re-creates
//! a node. Discarding a tree discards every node at once.

use crate::types::{IconHandle, NodeKind, RepoUri};
use std::path::{Path, PathBuf};

/// Stable identifier of a node within one [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// One entry in the merged working-copy/repository tree.
#[derive(Debug)]
pub struct TreeNode {
    /// Display name; directories carry a trailing `/`. Set once at creation.
    name: String,
    /// Present iff a local filesystem entry exists for this node.
    pub local_path: Option<PathBuf>,
    /// Present iff a repository entry exists for this node.
    pub repo_location: Option<RepoUri>,
    /// `None` until a probe answers, and permanently `None` for degraded
    /// nodes, which are treated as leaves carrying no children.
    pub kind: Option<NodeKind>,
    /// True only after the local probe completed successfully.
    pub has_local_copy: bool,
    /// True only after the repository probe completed successfully.
    pub has_repository_copy: bool,
    pub is_expanded: bool,
    pub is_selected: bool,
    pub icon: IconHandle,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl TreeNode {
    /// Create an unprobed node. At least one of `local_path` /
    /// `repo_location` must be present for non-root nodes; the synthetic
    /// arena root is the only node with both absent.
    pub fn new(
        name: impl Into<String>,
        local_path: Option<PathBuf>,
        repo_location: Option<RepoUri>,
    ) -> Self {
        Self {
            name: name.into(),
            local_path,
            repo_location,
            kind: None,
            has_local_copy: false,
            has_repository_copy: false,
            is_expanded: false,
            is_selected: false,
            icon: IconHandle::PLACEHOLDER,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_file(&self) -> bool {
        self.kind == Some(NodeKind::File)
    }

    pub fn is_directory(&self) -> bool {
        self.kind == Some(NodeKind::Directory)
    }

    /// A node known to the repository but absent from the working copy.
    pub fn is_repository_only(&self) -> bool {
        self.local_path.is_none() && self.repo_location.is_some()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Arena holding one merged tree.
///
/// The root node is synthetic: both locations absent, it exists purely to
/// anchor the single top-level child (the working-copy root entry).
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: vec![TreeNode::new(String::new(), None, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The single top-level child anchored under the synthetic root, i.e.
    /// the working-copy root entry. `None` for a freshly created tree.
    pub fn top_level(&self) -> Option<NodeId> {
        self.nodes[0].children.first().copied()
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Append `node` as the last child of `parent` and return its id.
    pub fn alloc_child(&mut self, parent: NodeId, mut node: TreeNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Mark every ancestor of `id` expanded so the node is visible in a
    /// rendered tree ("reveal"). The node itself is left untouched.
    pub fn expand_ancestors(&mut self, id: NodeId) {
        let mut current = self.nodes[id.0].parent;
        while let Some(ancestor) = current {
            self.nodes[ancestor.0].is_expanded = true;
            current = self.nodes[ancestor.0].parent;
        }
    }

    /// Linear scan of `parent`'s children for an exact display-name match.
    /// Insertion order makes this deterministic when reconciliation has
    /// already deduplicated names.
    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child.0].name == name)
    }

    /// Depth-first iteration over `(depth, id)` pairs starting at the
    /// top-level child. Used by renderers and tests; reconciliation never
    /// relies on it.
    pub fn walk(&self) -> Vec<(usize, NodeId)> {
        let mut out = Vec::new();
        if let Some(top) = self.top_level() {
            let mut stack = vec![(0usize, top)];
            while let Some((depth, id)) = stack.pop() {
                out.push((depth, id));
                for &child in self.nodes[id.0].children.iter().rev() {
                    stack.push((depth + 1, child));
                }
            }
        }
        out
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a display name from a path and kind: the final component, with a
/// trailing `/` appended for directories.
pub fn display_name(path: &Path, kind: NodeKind) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match kind {
        NodeKind::Directory => format!("{}/", base),
        NodeKind::File => base,
    }
}
