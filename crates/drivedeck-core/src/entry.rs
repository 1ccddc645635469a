//! Remote file and directory entry types.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A file stored in a remote directory.
///
/// Immutable value; every directory load replaces the previously
/// displayed list wholesale, there is no incremental diffing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// File name within its directory.
    pub name: CompactString,

    /// Size in bytes.
    pub size: u64,

    /// Server-formatted timestamp, displayed verbatim and never reparsed.
    pub last_modified: String,

    /// Canonical path of the owning directory.
    pub directory: String,
}

impl FileEntry {
    /// Create a new file entry.
    pub fn new(
        name: impl Into<CompactString>,
        size: u64,
        last_modified: impl Into<String>,
        directory: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            last_modified: last_modified.into(),
            directory: directory.into(),
        }
    }
}

/// A subdirectory as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Display label.
    pub name: CompactString,

    /// Canonical path of the directory.
    pub path: String,
}

impl DirectoryEntry {
    /// Create a new directory entry.
    pub fn new(name: impl Into<CompactString>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_entry_wire_shape() {
        let entry: FileEntry = serde_json::from_str(
            r#"{"name":"report.pdf","size":2048,"lastModified":"2024-05-01 10:00","directory":"docs"}"#,
        )
        .unwrap();
        assert_eq!(entry.name, "report.pdf");
        assert_eq!(entry.size, 2048);
        assert_eq!(entry.last_modified, "2024-05-01 10:00");
        assert_eq!(entry.directory, "docs");
    }

    #[test]
    fn test_directory_entry_wire_shape() {
        let entry: DirectoryEntry =
            serde_json::from_str(r#"{"name":"reports","path":"docs/reports"}"#).unwrap();
        assert_eq!(entry.name, "reports");
        assert_eq!(entry.path, "docs/reports");
    }
}
