//! End-to-end flows driven headlessly through a stub backend.
//!
//! The stub stands in for the HTTP gateway behind the same trait, so
//! these tests exercise the real orchestrator, cache, and state
//! transitions of the app without a server or a terminal.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use drivedeck_api::{Gateway, GatewayError, GatewayResult};
use drivedeck_core::{DirectoryEntry, FileEntry, Settings};
use drivedeck_tui::app::{App, AppMode, GatewayFactory};

const TOKEN: &str = "tok-123";

#[derive(Default)]
struct StubGateway {
    files: Mutex<HashMap<String, Vec<FileEntry>>>,
    dirs: Mutex<HashMap<String, Vec<DirectoryEntry>>>,
    /// Directories whose child listing fails with a server error.
    broken_listings: Mutex<HashSet<String>>,
    /// Per-directory count of `list_directories` calls.
    dir_list_calls: Mutex<HashMap<String, usize>>,
}

impl StubGateway {
    fn with_root() -> Arc<Self> {
        let stub = Self::default();
        stub.files.lock().unwrap().insert(
            ".".to_string(),
            vec![FileEntry::new("notes.txt", 1024, "2024-05-01 10:00", ".")],
        );
        stub.dirs.lock().unwrap().insert(
            ".".to_string(),
            vec![DirectoryEntry::new("docs", "docs")],
        );
        Arc::new(stub)
    }

    fn dir_list_count(&self, directory: &str) -> usize {
        *self
            .dir_list_calls
            .lock()
            .unwrap()
            .get(directory)
            .unwrap_or(&0)
    }
}

#[async_trait]
impl Gateway for StubGateway {
    async fn authenticate(&self, _username: &str, password: &str) -> GatewayResult<String> {
        if password == "secret" {
            Ok(TOKEN.to_string())
        } else {
            Err(GatewayError::Api {
                status: 401,
                body: "bad credentials".to_string(),
            })
        }
    }

    async fn list_files(&self, directory: &str) -> GatewayResult<Vec<FileEntry>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .get(directory)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_directories(&self, directory: &str) -> GatewayResult<Vec<DirectoryEntry>> {
        *self
            .dir_list_calls
            .lock()
            .unwrap()
            .entry(directory.to_string())
            .or_insert(0) += 1;
        if self.broken_listings.lock().unwrap().contains(directory) {
            return Err(GatewayError::Api {
                status: 500,
                body: "listing failed".to_string(),
            });
        }
        Ok(self
            .dirs
            .lock()
            .unwrap()
            .get(directory)
            .cloned()
            .unwrap_or_default())
    }

    async fn upload_file(&self, directory: &str, local: &Path) -> GatewayResult<FileEntry> {
        let name = local
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GatewayError::Validation("not a file path".to_string()))?;
        let entry = FileEntry::new(name, 64, "2024-05-02 09:00", directory);
        self.files
            .lock()
            .unwrap()
            .entry(directory.to_string())
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    async fn download_file(
        &self,
        _directory: &str,
        _filename: &str,
        target: &Path,
    ) -> GatewayResult<()> {
        std::fs::write(target, b"payload")?;
        Ok(())
    }

    async fn create_directory(&self, parent: &str, name: &str) -> GatewayResult<DirectoryEntry> {
        let path = if parent == "." {
            name.to_string()
        } else {
            format!("{parent}/{name}")
        };
        let entry = DirectoryEntry::new(name, path);
        self.dirs
            .lock()
            .unwrap()
            .entry(parent.to_string())
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }
}

fn app_with(stub: &Arc<StubGateway>) -> App {
    let stub = Arc::clone(stub);
    let factory: GatewayFactory =
        Arc::new(move |_session| Arc::clone(&stub) as Arc<dyn Gateway>);
    App::new(
        Settings::default(),
        "http://localhost:8080/api".to_string(),
    )
    .with_gateway_factory(factory)
}

async fn sign_in(app: &mut App) {
    app.login_mut().username = "amy".to_string();
    app.login_mut().password = "secret".to_string();
    app.submit_login();
    app.drain_tasks().await;
}

#[tokio::test]
async fn login_lands_in_browser_with_root_loaded() {
    let stub = StubGateway::with_root();
    let mut app = app_with(&stub);

    sign_in(&mut app).await;

    assert_eq!(app.mode(), AppMode::Normal);
    assert_eq!(app.current_directory(), ".");
    assert_eq!(app.files().len(), 1);
    assert_eq!(app.files()[0].name, "notes.txt");
    assert_eq!(app.tree().children(".").unwrap(), ["docs"]);
}

#[tokio::test]
async fn failed_login_stays_on_login_screen() {
    let stub = StubGateway::with_root();
    let mut app = app_with(&stub);

    app.login_mut().username = "amy".to_string();
    app.login_mut().password = "wrong".to_string();
    app.submit_login();
    app.drain_tasks().await;

    assert_eq!(app.mode(), AppMode::Login);
    assert!(!app.login_mut().authenticating);
    assert!(app.login_mut().error.is_some());
    assert!(app.tree().is_empty());
}

#[tokio::test]
async fn blank_login_fields_are_rejected_without_a_request() {
    let stub = StubGateway::with_root();
    let mut app = app_with(&stub);

    app.submit_login();
    app.drain_tasks().await;

    assert_eq!(app.mode(), AppMode::Login);
    assert!(app.login_mut().error.is_some());
    assert_eq!(stub.dir_list_count("."), 0);
}

#[tokio::test]
async fn expansion_fetches_each_directory_once() {
    let stub = StubGateway::with_root();
    stub.dirs.lock().unwrap().insert(
        "docs".to_string(),
        vec![DirectoryEntry::new("reports", "docs/reports")],
    );
    let mut app = app_with(&stub);
    sign_in(&mut app).await;

    // Two quick expands before the first completes, then one after.
    app.expand_path("docs");
    app.expand_path("docs");
    app.drain_tasks().await;
    app.expand_path("docs");
    app.drain_tasks().await;

    assert_eq!(stub.dir_list_count("docs"), 1);
    assert_eq!(app.tree().children("docs").unwrap(), ["docs/reports"]);
}

#[tokio::test]
async fn failed_expansion_leaves_cache_and_listing_intact() {
    let stub = StubGateway::with_root();
    stub.broken_listings
        .lock()
        .unwrap()
        .insert("docs".to_string());
    let mut app = app_with(&stub);
    sign_in(&mut app).await;

    app.expand_path("docs");
    app.drain_tasks().await;

    assert!(app.error().is_some());
    // The node rolled back to unloaded; nothing else changed.
    assert!(app.tree().node("docs").unwrap().children.is_unloaded());
    assert_eq!(app.tree().children(".").unwrap(), ["docs"]);
    assert_eq!(app.files().len(), 1);

    // A later expand retries.
    stub.broken_listings.lock().unwrap().clear();
    app.expand_path("docs");
    app.drain_tasks().await;
    assert!(app.tree().node("docs").unwrap().children.is_loaded());
}

#[tokio::test]
async fn upload_relists_the_directory() {
    let stub = StubGateway::with_root();
    let mut app = app_with(&stub);
    sign_in(&mut app).await;

    app.request_upload(Path::new("/tmp/report.pdf"));
    app.drain_tasks().await;

    assert!(app.error().is_none());
    let names: Vec<_> = app.files().iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"report.pdf"));
}

#[tokio::test]
async fn create_directory_invalidates_and_refetches_the_parent() {
    let stub = StubGateway::with_root();
    let mut app = app_with(&stub);
    sign_in(&mut app).await;
    assert_eq!(app.tree().children(".").unwrap(), ["docs"]);

    app.request_create_directory("photos");
    app.drain_tasks().await;

    assert!(app.error().is_none());
    assert_eq!(app.tree().children(".").unwrap(), ["docs", "photos"]);
}

#[tokio::test]
async fn download_writes_the_target_file() {
    let stub = StubGateway::with_root();
    let mut app = app_with(&stub);
    sign_in(&mut app).await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("notes.txt");
    app.request_download("notes.txt", &target);
    app.drain_tasks().await;

    assert!(app.error().is_none());
    assert_eq!(std::fs::read(&target).unwrap(), b"payload");
    assert!(app.status().contains("notes.txt"));
}

#[tokio::test]
async fn refresh_drops_the_cached_subtree() {
    let stub = StubGateway::with_root();
    let mut app = app_with(&stub);
    sign_in(&mut app).await;

    stub.dirs
        .lock()
        .unwrap()
        .get_mut(".")
        .unwrap()
        .push(DirectoryEntry::new("extra", "extra"));

    app.refresh();
    app.drain_tasks().await;
    assert!(app.tree().root().children.is_unloaded());

    app.expand_path(".");
    app.drain_tasks().await;
    assert_eq!(app.tree().children(".").unwrap(), ["docs", "extra"]);
}
