//! Materialization chains: call counts, ordering, partial progress.

use super::support::MockGateway;
use std::fs;
use svnview::error::MaterializeError;
use svnview::gateway::PlaceholderIcons;
use svnview::tree::{update_only_this_item, NodeId, Reconciler, Tree, TreeNode};
use svnview::types::{NodeKind, RepoUri};
use tempfile::TempDir;

fn repo_child(tree: &Tree, parent: NodeId, name: &str) -> NodeId {
    tree.child_by_name(parent, name).unwrap()
}

#[tokio::test]
async fn single_missing_level_issues_exactly_one_update() {
    let wc = TempDir::new().unwrap();
    fs::write(wc.path().join("a.txt"), b"x").unwrap();

    let base = RepoUri::new("svn://repo/trunk/");
    let gateway = MockGateway::new(wc.path(), "svn://repo/trunk/")
        .with_listing(&base, vec![("c.txt", NodeKind::File)]);
    let icons = PlaceholderIcons;
    let mut tree = Reconciler::new(&gateway, &icons, ".svn")
        .build_root(wc.path(), wc.path())
        .await;

    let top = tree.top_level().unwrap();
    let c = repo_child(&tree, top, "c.txt");
    assert!(!tree.node(c).has_local_copy);

    update_only_this_item(&mut tree, &gateway, &icons, c)
        .await
        .unwrap();

    let calls = gateway.update_calls.lock().clone();
    assert_eq!(calls, vec![wc.path().to_path_buf()]);
    assert!(tree.node(c).has_local_copy);
    assert_eq!(tree.node(c).local_path.as_deref(), Some(wc.path().join("c.txt").as_path()));
}

#[tokio::test]
async fn three_missing_levels_update_outermost_first() {
    let wc = TempDir::new().unwrap();

    let base = RepoUri::new("svn://repo/trunk/");
    let d1 = base.join("d1/");
    let d2 = d1.join("d2/");
    let gateway = MockGateway::new(wc.path(), "svn://repo/trunk/")
        .with_listing(&base, vec![("d1", NodeKind::Directory)])
        .with_listing(&d1, vec![("d2", NodeKind::Directory)])
        .with_listing(&d2, vec![("f.txt", NodeKind::File)]);
    let icons = PlaceholderIcons;
    let mut tree = Reconciler::new(&gateway, &icons, ".svn")
        .build_root(wc.path(), wc.path())
        .await;

    let top = tree.top_level().unwrap();
    let d1_id = repo_child(&tree, top, "d1/");
    let d2_id = repo_child(&tree, d1_id, "d2/");
    let f_id = repo_child(&tree, d2_id, "f.txt");

    update_only_this_item(&mut tree, &gateway, &icons, f_id)
        .await
        .unwrap();

    let calls = gateway.update_calls.lock().clone();
    assert_eq!(
        calls,
        vec![
            wc.path().to_path_buf(),
            wc.path().join("d1"),
            wc.path().join("d1").join("d2"),
        ]
    );
    assert!(tree.node(d1_id).has_local_copy);
    assert!(tree.node(d2_id).has_local_copy);
    assert!(tree.node(f_id).has_local_copy);
    assert_eq!(
        tree.node(f_id).local_path.as_deref(),
        Some(wc.path().join("d1").join("d2").join("f.txt").as_path())
    );
    // The materialized entry is revealed.
    assert!(tree.node(d1_id).is_expanded);
    assert!(tree.node(d2_id).is_expanded);
}

#[tokio::test]
async fn failure_mid_chain_keeps_completed_ancestors() {
    let wc = TempDir::new().unwrap();

    let base = RepoUri::new("svn://repo/trunk/");
    let d1 = base.join("d1/");
    let d2 = d1.join("d2/");
    let gateway = MockGateway::new(wc.path(), "svn://repo/trunk/")
        .with_listing(&base, vec![("d1", NodeKind::Directory)])
        .with_listing(&d1, vec![("d2", NodeKind::Directory)])
        .with_listing(&d2, vec![("f.txt", NodeKind::File)])
        .fail_update_on_call(2);
    let icons = PlaceholderIcons;
    let mut tree = Reconciler::new(&gateway, &icons, ".svn")
        .build_root(wc.path(), wc.path())
        .await;

    let top = tree.top_level().unwrap();
    let d1_id = repo_child(&tree, top, "d1/");
    let d2_id = repo_child(&tree, d1_id, "d2/");
    let f_id = repo_child(&tree, d2_id, "f.txt");

    let err = update_only_this_item(&mut tree, &gateway, &icons, f_id)
        .await
        .unwrap_err();
    assert!(matches!(err, MaterializeError::Step { ref name, .. } if name == "d2/"));

    // Two calls went out; the third never ran.
    assert_eq!(gateway.update_calls.lock().len(), 2);
    assert!(tree.node(d1_id).has_local_copy);
    assert!(!tree.node(d2_id).has_local_copy);
    assert!(!tree.node(f_id).has_local_copy);
}

#[tokio::test]
async fn materializing_a_local_node_is_rejected() {
    let wc = TempDir::new().unwrap();
    fs::write(wc.path().join("a.txt"), b"x").unwrap();

    let gateway = MockGateway::new(wc.path(), "svn://repo/trunk/");
    let icons = PlaceholderIcons;
    let mut tree = Reconciler::new(&gateway, &icons, ".svn")
        .build_root(wc.path(), wc.path())
        .await;

    let top = tree.top_level().unwrap();
    let a = repo_child(&tree, top, "a.txt");

    let err = update_only_this_item(&mut tree, &gateway, &icons, a)
        .await
        .unwrap_err();
    assert!(matches!(err, MaterializeError::NotRepositoryOnly { .. }));
    assert!(gateway.update_calls.lock().is_empty());
}

#[tokio::test]
async fn missing_root_local_path_fails_closed() {
    // Hand-built broken tree: repository-only all the way to the top.
    let mut tree = Tree::new();
    let top = tree.alloc_child(
        tree.root(),
        TreeNode::new("orphan/", None, Some(RepoUri::new("svn://repo/orphan/"))),
    );

    let wc = TempDir::new().unwrap();
    let gateway = MockGateway::new(wc.path(), "svn://repo/");
    let icons = PlaceholderIcons;

    let err = update_only_this_item(&mut tree, &gateway, &icons, top)
        .await
        .unwrap_err();
    assert!(matches!(err, MaterializeError::MissingLocalAncestor { .. }));
    assert!(gateway.update_calls.lock().is_empty());
}

#[tokio::test]
async fn node_identity_survives_materialization() {
    let wc = TempDir::new().unwrap();

    let base = RepoUri::new("svn://repo/trunk/");
    let gateway = MockGateway::new(wc.path(), "svn://repo/trunk/")
        .with_listing(&base, vec![("c.txt", NodeKind::File)]);
    let icons = PlaceholderIcons;
    let mut tree = Reconciler::new(&gateway, &icons, ".svn")
        .build_root(wc.path(), wc.path())
        .await;

    let top = tree.top_level().unwrap();
    let c = repo_child(&tree, top, "c.txt");
    let node_count = tree.len();

    update_only_this_item(&mut tree, &gateway, &icons, c)
        .await
        .unwrap();

    // Same arena, same id, fields mutated in place.
    assert_eq!(tree.len(), node_count);
    assert_eq!(tree.child_by_name(top, "c.txt"), Some(c));
    assert!(tree.node(c).has_repository_copy);
}
