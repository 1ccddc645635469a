//! Current-directory tracking.

use crate::path;

/// Tracks the directory whose file listing is currently displayed.
///
/// Mutated only after a successful listing for the new directory, so a
/// failed navigation leaves it untouched.
#[derive(Debug, Clone)]
pub struct NavigationState {
    current: String,
}

impl NavigationState {
    /// Start at the root.
    pub fn new() -> Self {
        Self {
            current: path::ROOT.to_string(),
        }
    }

    /// The currently displayed directory.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Record a completed navigation.
    pub fn enter(&mut self, directory: &str) {
        self.current = path::canonical(directory);
    }

    /// Parent of the current directory, for up-navigation.
    pub fn parent(&self) -> String {
        path::parent(&self.current)
    }

    /// Check whether the root is displayed.
    pub fn at_root(&self) -> bool {
        path::is_root(&self.current)
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_root() {
        let nav = NavigationState::new();
        assert!(nav.at_root());
        assert_eq!(nav.parent(), path::ROOT);
    }

    #[test]
    fn test_enter_canonicalizes() {
        let mut nav = NavigationState::new();
        nav.enter("");
        assert!(nav.at_root());
        nav.enter("docs/reports");
        assert_eq!(nav.current(), "docs/reports");
        assert_eq!(nav.parent(), "docs");
    }
}
