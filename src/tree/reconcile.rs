//! Reconciliation engine.
//!
//! Builds the merged tree for a working copy by interleaving local
//! filesystem enumeration with remote repository listings, one directory at
//! a time. Merging is keyed by display name, and insertion order is a
//! correctness contract, not a cosmetic choice: local entries are appended
//! first (directories, then files, in enumeration order) and claim their
//! name slot; repository entries are only appended when their derived name
//! is still unclaimed. Reordering these steps would create duplicate nodes.
//!
//! Every probe failure degrades the affected node to an unknown-kind leaf;
//! reconciliation itself never fails.

use crate::gateway::{IconProvider, RepoGateway};
use crate::tree::node::{display_name, NodeId, Tree, TreeNode};
use crate::tree::path;
use crate::types::{NodeKind, RepoEntry, RepoUri};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct Reconciler<'a> {
    gateway: &'a dyn RepoGateway,
    icons: &'a dyn IconProvider,
    /// Directory name the version-control client uses for its metadata
    /// (`.svn` by convention); skipped during local enumeration.
    metadata_dir: String,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        gateway: &'a dyn RepoGateway,
        icons: &'a dyn IconProvider,
        metadata_dir: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            icons,
            metadata_dir: metadata_dir.into(),
        }
    }

    /// Build a fresh tree rooted at `wc_root`, selecting and revealing the
    /// node whose local path equals `select` along the way.
    pub async fn build_root(&self, wc_root: &Path, select: &Path) -> Tree {
        let mut tree = Tree::new();
        let repo = self.probe_repo_location(wc_root).await;
        let name = display_name(wc_root, NodeKind::Directory);
        let top = tree.alloc_child(
            tree.root(),
            TreeNode::new(name, Some(wc_root.to_path_buf()), repo),
        );
        self.populate(&mut tree, top, select).await;
        tree
    }

    /// Recursive worker: probe this node, then merge and recurse if it is a
    /// directory. Boxed because async recursion needs an indirection.
    pub fn populate<'t>(
        &'t self,
        tree: &'t mut Tree,
        id: NodeId,
        select: &'t Path,
    ) -> BoxFuture<'t, ()> {
        Box::pin(async move {
            // Repository probe first, local probe second, so the local
            // answer wins whenever both sources respond.
            if let Some(uri) = tree.node(id).repo_location.clone() {
                match self.gateway.metadata(&uri).await {
                    Ok(Some(kind)) => {
                        let node = tree.node_mut(id);
                        node.kind = Some(kind);
                        node.has_repository_copy = true;
                    }
                    Ok(None) => debug!(%uri, "repository node absent at HEAD"),
                    Err(e) => warn!(%uri, error = %e, "repository metadata probe failed"),
                }
            }

            if let Some(local) = tree.node(id).local_path.clone() {
                if local == select {
                    let node = tree.node_mut(id);
                    node.is_selected = true;
                    node.is_expanded = true;
                    tree.expand_ancestors(id);
                }
                if let Some(kind) = path::classify(&local).await {
                    let node = tree.node_mut(id);
                    node.kind = Some(kind);
                    node.has_local_copy = true;
                }
                tree.node_mut(id).icon = self.icons.icon_for(&local);
            }

            if tree.node(id).is_directory() {
                self.populate_directory(tree, id, select).await;
            }
        })
    }

    async fn populate_directory(&self, tree: &mut Tree, id: NodeId, select: &Path) {
        let (remote_dirs, remote_files) = match tree.node(id).repo_location.clone() {
            Some(uri) => self.list_remote(&uri).await,
            None => (Vec::new(), Vec::new()),
        };

        // Transient per-directory name index; local entries claim their
        // slot first. Dropped when this directory's merge completes.
        let mut names: HashMap<String, NodeId> = HashMap::new();

        if let Some(local) = tree.node(id).local_path.clone() {
            let (local_dirs, local_files) = self.enumerate_local(&local).await;
            for (child_path, kind) in local_dirs
                .into_iter()
                .map(|p| (p, NodeKind::Directory))
                .chain(local_files.into_iter().map(|p| (p, NodeKind::File)))
            {
                let name = display_name(&child_path, kind);
                let repo = self.probe_repo_location(&child_path).await;
                let child =
                    tree.alloc_child(id, TreeNode::new(name.clone(), Some(child_path), repo));
                names.entry(name).or_insert(child);
            }
        }

        for entry in remote_dirs.into_iter().chain(remote_files) {
            let name = match entry.kind {
                NodeKind::Directory => format!("{}/", entry.name),
                NodeKind::File => entry.name.clone(),
            };
            match names.get(&name) {
                Some(&existing) => {
                    // The remote listing names an entry we already added
                    // from the local side: attach the URI if the local
                    // probe produced none, so this child's own populate
                    // pass confirms repository presence.
                    let node = tree.node_mut(existing);
                    if node.repo_location.is_none() {
                        node.repo_location = Some(entry.uri);
                    }
                }
                None => {
                    let child =
                        tree.alloc_child(id, TreeNode::new(name.clone(), None, Some(entry.uri)));
                    names.insert(name, child);
                }
            }
        }

        let children: Vec<NodeId> = tree.node(id).children().to_vec();
        for child in children {
            self.populate(&mut *tree, child, select).await;
        }
    }

    async fn list_remote(&self, uri: &RepoUri) -> (Vec<RepoEntry>, Vec<RepoEntry>) {
        let entries = match self.gateway.list_directory(uri).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(%uri, error = %e, "repository listing failed");
                return (Vec::new(), Vec::new());
            }
        };
        entries
            .into_iter()
            .partition(|entry| entry.kind == NodeKind::Directory)
    }

    /// Enumerate immediate local children: directories and files in
    /// filesystem order, metadata directory excluded, other entry kinds
    /// (sockets, dangling symlinks) skipped.
    async fn enumerate_local(&self, dir: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        let mut read_dir = match tokio::fs::read_dir(dir).await {
            Ok(rd) => rd,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "local enumeration failed");
                return (dirs, files);
            }
        };
        while let Ok(Some(entry)) = read_dir.next_entry().await {
            let Ok(file_type) = entry.file_type().await else {
                continue;
            };
            if file_type.is_dir() {
                if entry.file_name().to_string_lossy() == self.metadata_dir {
                    continue;
                }
                dirs.push(entry.path());
            } else if file_type.is_file() {
                files.push(entry.path());
            }
        }
        (dirs, files)
    }

    async fn probe_repo_location(&self, local: &Path) -> Option<RepoUri> {
        match self.gateway.repo_location(local).await {
            Ok(uri) => uri,
            Err(e) => {
                warn!(path = %local.display(), error = %e, "repository location probe failed");
                None
            }
        }
    }
}
