//! Selection resolution against a built tree.

use super::support::MockGateway;
use std::fs;
use svnview::gateway::PlaceholderIcons;
use svnview::tree::{select_from, Reconciler};
use tempfile::TempDir;

#[tokio::test]
async fn selects_the_node_for_a_dropped_path() {
    let wc = TempDir::new().unwrap();
    let sub = wc.path().join("sub");
    fs::create_dir(&sub).unwrap();
    let target = sub.join("a.txt");
    fs::write(&target, b"x").unwrap();

    let gateway = MockGateway::new(wc.path(), "svn://repo/trunk/");
    let icons = PlaceholderIcons;
    let mut tree = Reconciler::new(&gateway, &icons, ".svn")
        .build_root(wc.path(), wc.path())
        .await;

    let root = tree.root();
    let selected = select_from(&mut tree, root, &gateway, &target)
        .await
        .unwrap();

    assert_eq!(tree.node(selected).name(), "a.txt");
    assert!(tree.node(selected).is_selected);
    assert!(tree.node(selected).is_expanded);
    let sub_id = tree.node(selected).parent().unwrap();
    assert!(tree.node(sub_id).is_expanded);
}

#[tokio::test]
async fn selection_targeting_is_idempotent() {
    let wc = TempDir::new().unwrap();
    let target = wc.path().join("a.txt");
    fs::write(&target, b"x").unwrap();

    let gateway = MockGateway::new(wc.path(), "svn://repo/trunk/");
    let icons = PlaceholderIcons;

    // Build with the target as the initial selection, then re-select it.
    let mut tree = Reconciler::new(&gateway, &icons, ".svn")
        .build_root(wc.path(), &target)
        .await;
    let top = tree.top_level().unwrap();
    let built_selection = tree.child_by_name(top, "a.txt").unwrap();
    assert!(tree.node(built_selection).is_selected);

    let root = tree.root();
    let reselected = select_from(&mut tree, root, &gateway, &target)
        .await
        .unwrap();
    assert_eq!(reselected, built_selection);
}

#[tokio::test]
async fn call_on_a_non_root_node_is_a_no_op() {
    let wc = TempDir::new().unwrap();
    let target = wc.path().join("a.txt");
    fs::write(&target, b"x").unwrap();

    let gateway = MockGateway::new(wc.path(), "svn://repo/trunk/");
    let icons = PlaceholderIcons;
    let mut tree = Reconciler::new(&gateway, &icons, ".svn")
        .build_root(wc.path(), wc.path())
        .await;

    let top = tree.top_level().unwrap();
    assert!(select_from(&mut tree, top, &gateway, &target).await.is_none());

    let a = tree.child_by_name(top, "a.txt").unwrap();
    assert!(!tree.node(a).is_selected);
}

#[tokio::test]
async fn unresolvable_components_stop_the_descent_without_error() {
    let wc = TempDir::new().unwrap();
    let sub = wc.path().join("sub");
    fs::create_dir(&sub).unwrap();

    let gateway = MockGateway::new(wc.path(), "svn://repo/trunk/");
    let icons = PlaceholderIcons;
    let mut tree = Reconciler::new(&gateway, &icons, ".svn")
        .build_root(wc.path(), wc.path())
        .await;

    // The path exists on disk but was created after the tree was built, so
    // the walk stops at the deepest matching node.
    let late = sub.join("late.txt");
    fs::write(&late, b"x").unwrap();

    let root = tree.root();
    let selected = select_from(&mut tree, root, &gateway, &late).await.unwrap();
    assert_eq!(tree.node(selected).name(), "sub/");
    assert!(tree.node(selected).is_selected);
}
