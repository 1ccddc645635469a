//! Lazily-loaded directory tree cache.
//!
//! The tree is an arena of [`DirectoryNode`] values keyed by canonical
//! path. Children are stored as ordered lists of child paths rather than
//! live references, so invalidation is a matter of resetting one arena
//! entry and pruning its cached subtree.
//!
//! The tree is mutated only by the UI loop, inside task completion
//! handlers; background workers return immutable listings and never touch
//! it directly.

use std::collections::HashMap;

use compact_str::CompactString;

use crate::entry::DirectoryEntry;
use crate::path;

/// Load state of a node's children.
///
/// Transitions are monotonic: `Unloaded -> Loading -> Loaded`. A node
/// returns to `Unloaded` only through explicit invalidation or a failed
/// load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChildState {
    /// Never fetched.
    #[default]
    Unloaded,
    /// A fetch is in flight.
    Loading,
    /// Child canonical paths in backend order.
    Loaded(Vec<String>),
}

impl ChildState {
    /// Check whether the children have never been fetched.
    pub fn is_unloaded(&self) -> bool {
        matches!(self, ChildState::Unloaded)
    }

    /// Check whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, ChildState::Loading)
    }

    /// Check whether the authoritative child list is present.
    pub fn is_loaded(&self) -> bool {
        matches!(self, ChildState::Loaded(_))
    }
}

/// A single remote directory known to the cache.
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    /// Canonical path, used as the arena key.
    pub path: String,

    /// Display label.
    pub name: CompactString,

    /// Load state of this node's children.
    pub children: ChildState,
}

impl DirectoryNode {
    fn new(path: impl Into<String>, name: impl Into<CompactString>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            children: ChildState::Unloaded,
        }
    }
}

/// Path-keyed arena of directory nodes with single-flight child loading.
#[derive(Debug)]
pub struct DirectoryTree {
    nodes: HashMap<String, DirectoryNode>,
}

impl DirectoryTree {
    /// Create a tree containing only the unloaded root node.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            path::ROOT.to_string(),
            DirectoryNode::new(path::ROOT, "/"),
        );
        Self { nodes }
    }

    /// Get the root node.
    pub fn root(&self) -> &DirectoryNode {
        // The root entry is inserted at construction and never removed.
        &self.nodes[path::ROOT]
    }

    /// Look up a node by canonical path.
    pub fn node(&self, path: &str) -> Option<&DirectoryNode> {
        self.nodes.get(path)
    }

    /// Check whether a path is known to the cache.
    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// Number of cached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the cache holds only the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Ordered child paths of a loaded node.
    pub fn children(&self, path: &str) -> Option<&[String]> {
        match &self.nodes.get(path)?.children {
            ChildState::Loaded(children) => Some(children),
            _ => None,
        }
    }

    /// Single-flight gate for lazy expansion.
    ///
    /// Returns true only when the node exists and its children are
    /// `Unloaded`, transitioning it to `Loading`; the caller must then
    /// issue exactly one listing and finish with [`complete_load`] or
    /// [`fail_load`]. Any other state makes this a no-op returning false,
    /// which covers both the re-entrancy guard while a fetch is in flight
    /// and the idempotent re-expand of an already loaded node.
    ///
    /// [`complete_load`]: DirectoryTree::complete_load
    /// [`fail_load`]: DirectoryTree::fail_load
    pub fn begin_load(&mut self, path: &str) -> bool {
        match self.nodes.get_mut(path) {
            Some(node) if node.children.is_unloaded() => {
                node.children = ChildState::Loading;
                true
            }
            _ => false,
        }
    }

    /// Install the authoritative child list for a node.
    ///
    /// Children are inserted as fresh `Unloaded` nodes and the order is
    /// whatever the backend returned. The result is dropped unless the
    /// node is still `Loading`, so a listing that races an invalidation
    /// cannot resurrect discarded state.
    pub fn complete_load(&mut self, path: &str, children: Vec<DirectoryEntry>) {
        let Some(node) = self.nodes.get_mut(path) else {
            return;
        };
        if !node.children.is_loading() {
            return;
        }

        let mut order = Vec::with_capacity(children.len());
        for child in children {
            let child_path = crate::path::canonical(&child.path);
            order.push(child_path.clone());
            self.nodes
                .insert(child_path.clone(), DirectoryNode::new(child_path, child.name));
        }

        // get_mut again: the child inserts above borrowed the map.
        if let Some(node) = self.nodes.get_mut(path) {
            node.children = ChildState::Loaded(order);
        }
    }

    /// Roll back a failed load: `Loading` returns to `Unloaded`, leaving
    /// the cache exactly as it was before the attempt.
    pub fn fail_load(&mut self, path: &str) {
        if let Some(node) = self.nodes.get_mut(path) {
            if node.children.is_loading() {
                node.children = ChildState::Unloaded;
            }
        }
    }

    /// Discard a node's loaded children, forcing the next expansion to
    /// re-fetch. The cached subtree below the node is pruned.
    pub fn invalidate(&mut self, path: &str) {
        let descendants = self.collect_descendants(path);
        for descendant in descendants {
            self.nodes.remove(&descendant);
        }
        if let Some(node) = self.nodes.get_mut(path) {
            node.children = ChildState::Unloaded;
        }
    }

    /// Collect every cached path strictly below `path`.
    fn collect_descendants(&self, path: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![path.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(ChildState::Loaded(children)) =
                self.nodes.get(&current).map(|n| &n.children)
            {
                for child in children {
                    stack.push(child.clone());
                    out.push(child.clone());
                }
            }
        }
        out
    }
}

impl Default for DirectoryTree {
    fn default() -> Self {
        Self::new()
    }
}
