//! Remote operation contract.

use std::path::Path;

use async_trait::async_trait;

use drivedeck_core::{DirectoryEntry, FileEntry};

use crate::error::GatewayResult;

/// The consumed surface of the remote file service.
///
/// Directory arguments are normalized to the root sentinel before
/// dispatch, so callers may pass empty strings or `"."` freely. Each
/// operation either returns its value or a
/// [`GatewayError`](crate::GatewayError); nothing is retried here.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn authenticate(&self, username: &str, password: &str) -> GatewayResult<String>;

    /// List the files in a directory, in backend order.
    async fn list_files(&self, directory: &str) -> GatewayResult<Vec<FileEntry>>;

    /// List the subdirectories of a directory, in backend order.
    async fn list_directories(&self, directory: &str) -> GatewayResult<Vec<DirectoryEntry>>;

    /// Upload a local file into a directory; returns the stored entry.
    async fn upload_file(&self, directory: &str, local: &Path) -> GatewayResult<FileEntry>;

    /// Download a file from a directory, streaming it to `target`.
    async fn download_file(
        &self,
        directory: &str,
        filename: &str,
        target: &Path,
    ) -> GatewayResult<()>;

    /// Create a directory under `parent`; returns the created entry.
    async fn create_directory(&self, parent: &str, name: &str) -> GatewayResult<DirectoryEntry>;
}
