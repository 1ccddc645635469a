//! Canonical remote directory paths.
//!
//! The backend addresses directories by relative path strings joined with
//! `/`. The root directory is the reserved sentinel [`ROOT`]; every path
//! used as a cache key goes through [`canonical`] first.

/// Root sentinel for the remote directory hierarchy.
pub const ROOT: &str = ".";

/// Normalize a raw directory path to its canonical form.
///
/// Empty and whitespace-only input, as well as the literal `"."`, all map
/// to the root sentinel. Anything else is passed through trimmed.
pub fn canonical(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() || trimmed == ROOT {
        ROOT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Check whether a canonical path is the root sentinel.
pub fn is_root(path: &str) -> bool {
    path == ROOT
}

/// Parent of a canonical path, computed by truncating at the last `/`.
///
/// The root is its own parent; a top-level directory's parent is the root.
pub fn parent(path: &str) -> String {
    if path.is_empty() || is_root(path) {
        return ROOT.to_string();
    }
    match path.rfind('/') {
        Some(idx) if idx > 0 => path[..idx].to_string(),
        _ => ROOT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_normalizes_to_root() {
        assert_eq!(canonical(""), ROOT);
        assert_eq!(canonical("   "), ROOT);
        assert_eq!(canonical("."), ROOT);
    }

    #[test]
    fn test_canonical_passes_paths_through() {
        assert_eq!(canonical("docs"), "docs");
        assert_eq!(canonical(" docs/reports "), "docs/reports");
    }

    #[test]
    fn test_parent_of_nested_path() {
        assert_eq!(parent("docs/reports/2024"), "docs/reports");
        assert_eq!(parent("docs/reports"), "docs");
    }

    #[test]
    fn test_parent_of_top_level_is_root() {
        assert_eq!(parent("docs"), ROOT);
        assert_eq!(parent(ROOT), ROOT);
        assert_eq!(parent(""), ROOT);
    }
}
