//! Directory tree widget state and flattening.

use std::collections::HashSet;

use drivedeck_core::{path as remote_path, ChildState, DirectoryTree};

/// State for the tree view.
#[derive(Debug, Clone)]
pub struct TreeState {
    /// Currently selected index in the flattened view.
    pub selected: usize,
    /// Scroll offset.
    pub offset: usize,
    /// Set of expanded directory paths.
    pub expanded: HashSet<String>,
}

impl TreeState {
    /// Create new tree state with the root expanded.
    pub fn new() -> Self {
        let mut expanded = HashSet::new();
        expanded.insert(remote_path::ROOT.to_string());
        Self {
            selected: 0,
            offset: 0,
            expanded,
        }
    }

    /// Expand a path.
    pub fn expand(&mut self, path: &str) {
        self.expanded.insert(path.to_string());
    }

    /// Collapse a path.
    pub fn collapse(&mut self, path: &str) {
        self.expanded.remove(path);
    }

    /// Check if a path is expanded.
    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    /// Drop expansion markers for paths the cache no longer knows.
    ///
    /// Called after an invalidation prunes a subtree, so the marker set
    /// cannot drift from the arena. The root survives; it is never
    /// removed from the cache.
    pub fn retain_cached(&mut self, tree: &DirectoryTree) {
        self.expanded.retain(|path| tree.contains(path));
    }

    /// Move selection up.
    pub fn move_up(&mut self, count: usize) {
        self.selected = self.selected.saturating_sub(count);
    }

    /// Move selection down.
    pub fn move_down(&mut self, count: usize, max: usize) {
        self.selected = (self.selected + count).min(max.saturating_sub(1));
    }

    /// Jump to top.
    pub fn jump_to_top(&mut self) {
        self.selected = 0;
    }

    /// Jump to bottom.
    pub fn jump_to_bottom(&mut self, max: usize) {
        self.selected = max.saturating_sub(1);
    }

    /// Clamp the selection after the visible list shrank.
    pub fn clamp(&mut self, max: usize) {
        if max == 0 {
            self.selected = 0;
        } else if self.selected >= max {
            self.selected = max - 1;
        }
    }

    /// Ensure selected item is visible, adjusting offset if needed.
    pub fn ensure_visible(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + viewport_height {
            self.offset = self.selected - viewport_height + 1;
        }
    }
}

impl Default for TreeState {
    fn default() -> Self {
        Self::new()
    }
}

/// A flattened visible item in the tree.
#[derive(Debug, Clone)]
pub struct VisibleItem {
    /// Canonical path of the directory this row belongs to.
    pub path: String,
    /// Display label.
    pub label: String,
    /// Indentation depth.
    pub depth: usize,
    pub kind: VisibleItemKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleItemKind {
    Directory { expanded: bool },
    /// Filler row under an expanded node whose children are not loaded
    /// yet. Selecting it acts on the parent path.
    Placeholder,
}

impl VisibleItem {
    /// Check whether this row is a real directory.
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, VisibleItemKind::Directory { .. })
    }
}

/// Flatten the cached tree into the rows the tree pane displays.
///
/// Only expanded nodes contribute children. An expanded node whose
/// children are `Unloaded` or `Loading` contributes one placeholder row
/// instead, which is what makes a collapsed-looking node visibly
/// expandable before its first fetch completes.
pub fn flatten(tree: &DirectoryTree, state: &TreeState) -> Vec<VisibleItem> {
    let mut items = Vec::new();
    push_node(tree, state, remote_path::ROOT, 0, &mut items);
    items
}

fn push_node(
    tree: &DirectoryTree,
    state: &TreeState,
    path: &str,
    depth: usize,
    out: &mut Vec<VisibleItem>,
) {
    let Some(node) = tree.node(path) else {
        return;
    };
    let expanded = state.is_expanded(path);
    out.push(VisibleItem {
        path: path.to_string(),
        label: node.name.to_string(),
        depth,
        kind: VisibleItemKind::Directory { expanded },
    });
    if !expanded {
        return;
    }
    match &node.children {
        ChildState::Loaded(children) => {
            for child in children {
                push_node(tree, state, child, depth + 1, out);
            }
        }
        ChildState::Unloaded | ChildState::Loading => out.push(VisibleItem {
            path: path.to_string(),
            label: "...".to_string(),
            depth: depth + 1,
            kind: VisibleItemKind::Placeholder,
        }),
    }
}
