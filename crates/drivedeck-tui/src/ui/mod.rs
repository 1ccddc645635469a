//! UI components and widgets.

pub mod login;
pub mod modals;
mod tree;

pub use tree::{flatten, TreeState, VisibleItem, VisibleItemKind};

use ratatui::layout::{Constraint, Layout, Rect};

/// Layout areas for the application.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub header: Rect,
    pub tree: Rect,
    pub files: Rect,
    pub footer: Rect,
}

impl AppLayout {
    /// Compute layout from terminal area.
    pub fn new(area: Rect) -> Self {
        let [header, content, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(area);

        let [tree, files] = Layout::horizontal([
            Constraint::Percentage(32),
            Constraint::Percentage(68),
        ])
        .areas(content);

        Self {
            header,
            tree,
            files,
            footer,
        }
    }
}

/// Format a byte size in human-readable form.
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
