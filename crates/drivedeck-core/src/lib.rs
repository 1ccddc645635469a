//! Core types for drivedeck.
//!
//! This crate provides the fundamental data structures shared across the
//! drivedeck workspace: canonical remote paths, file and directory entry
//! types, the lazily-loaded directory tree cache, the authenticated
//! session, navigation state, and settings resolution.

pub mod config;
mod entry;
mod nav;
pub mod path;
mod session;
mod tree;

pub use config::{Settings, SettingsError};
pub use entry::{DirectoryEntry, FileEntry};
pub use nav::NavigationState;
pub use session::AuthSession;
pub use tree::{ChildState, DirectoryNode, DirectoryTree};
