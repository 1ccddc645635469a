//! Integration tests for drivedeck-core.

use drivedeck_core::config::{self, Settings};
use drivedeck_core::{
    AuthSession, ChildState, DirectoryEntry, DirectoryTree, FileEntry, NavigationState, path,
};

fn dir(name: &str, path: &str) -> DirectoryEntry {
    DirectoryEntry::new(name, path)
}

#[test]
fn root_sentinel_normalization() {
    for raw in ["", "   ", "."] {
        assert_eq!(path::canonical(raw), path::ROOT);
    }
    assert_eq!(path::canonical("projects/alpha"), "projects/alpha");
}

#[test]
fn expand_protocol_full_cycle() {
    let mut tree = DirectoryTree::new();

    // First expansion request wins the single-flight gate.
    assert!(tree.begin_load(path::ROOT));
    // A second request while the fetch is in flight is a no-op.
    assert!(!tree.begin_load(path::ROOT));

    tree.complete_load(
        path::ROOT,
        vec![dir("docs", "docs"), dir("media", "media")],
    );
    assert_eq!(tree.children(path::ROOT).unwrap(), ["docs", "media"]);

    // Re-expanding a loaded node issues no new call.
    assert!(!tree.begin_load(path::ROOT));
}

#[test]
fn both_expand_requests_observe_same_loaded_state() {
    let mut tree = DirectoryTree::new();
    let first = tree.begin_load(path::ROOT);
    let second = tree.begin_load(path::ROOT);
    assert!(first && !second);

    tree.complete_load(path::ROOT, vec![dir("docs", "docs")]);

    // Exactly one fetch happened, and any observer now sees Loaded.
    assert!(tree.root().children.is_loaded());
    assert_eq!(tree.children(path::ROOT).unwrap(), ["docs"]);
}

#[test]
fn invalidation_forces_refetch() {
    let mut tree = DirectoryTree::new();
    tree.begin_load(path::ROOT);
    tree.complete_load(path::ROOT, vec![dir("docs", "docs")]);

    // A directory was created under the root: discard and re-fetch.
    tree.invalidate(path::ROOT);
    assert_eq!(tree.root().children, ChildState::Unloaded);

    assert!(tree.begin_load(path::ROOT));
    tree.complete_load(
        path::ROOT,
        vec![dir("docs", "docs"), dir("new-dir", "new-dir")],
    );
    assert_eq!(tree.children(path::ROOT).unwrap(), ["docs", "new-dir"]);
}

#[test]
fn failed_load_leaves_cache_as_before() {
    let mut tree = DirectoryTree::new();
    tree.begin_load(path::ROOT);
    tree.complete_load(path::ROOT, vec![dir("a", "a"), dir("b", "b")]);
    tree.begin_load("a");
    tree.complete_load("a", vec![dir("inner", "a/inner")]);

    // A failing fetch on a sibling must not disturb loaded data.
    tree.begin_load("b");
    tree.fail_load("b");

    assert_eq!(tree.node("b").unwrap().children, ChildState::Unloaded);
    assert_eq!(tree.children("a").unwrap(), ["a/inner"]);
    assert!(tree.contains("a/inner"));
}

#[test]
fn base_address_precedence() {
    let env = "http://env:9999/api";
    let saved = "http://saved:8888/api";

    assert_eq!(config::resolve_base_url(Some(env), Some(saved)), env);
    assert_eq!(config::resolve_base_url(Some(env), None), env);
    assert_eq!(config::resolve_base_url(None, Some(saved)), saved);
    assert_eq!(config::resolve_base_url(None, None), config::DEFAULT_BASE_URL);
}

#[test]
fn settings_persist_only_the_base_address() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");

    Settings {
        base_url: Some("http://host/api".into()),
    }
    .save_to(&file)
    .unwrap();

    let raw = std::fs::read_to_string(&file).unwrap();
    assert!(raw.contains("base_url"));
    assert!(!raw.to_lowercase().contains("token"));
}

#[test]
fn session_normalization() {
    let session = AuthSession::new("http://host/api", Some("abc".into()));
    assert_eq!(session.base_url(), "http://host/api/");
    assert_eq!(session.token(), Some("abc"));

    let anonymous = AuthSession::anonymous("http://host/api/");
    assert_eq!(anonymous.base_url(), "http://host/api/");
    assert!(anonymous.token().is_none());
}

#[test]
fn navigation_parent_chain() {
    let mut nav = NavigationState::new();
    nav.enter("a/b/c");
    assert_eq!(nav.parent(), "a/b");
    let parent = nav.parent();
    nav.enter(&parent);
    assert_eq!(nav.current(), "a/b");
    nav.enter("a");
    assert_eq!(nav.parent(), path::ROOT);
}

#[test]
fn file_entry_list_deserializes_in_order() {
    let listing: Vec<FileEntry> = serde_json::from_str(
        r#"[
            {"name":"b.txt","size":10,"lastModified":"2024-01-02 08:00","directory":"."},
            {"name":"a.txt","size":20,"lastModified":"2024-01-01 08:00","directory":"."}
        ]"#,
    )
    .unwrap();

    // Order is whatever the backend returned; no client-side resorting.
    let names: Vec<_> = listing.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["b.txt", "a.txt"]);
}
