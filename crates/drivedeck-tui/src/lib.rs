//! Terminal user interface for drivedeck.
//!
//! Presents a login screen followed by a two-pane browser: the directory
//! tree on the left loads lazily as nodes are expanded, the file table on
//! the right shows the current directory's listing.
//!
//! # Keyboard Navigation
//!
//! - `j`/`k` - Move down/up
//! - `Tab` - Switch between tree and file table
//! - `o`/`l` - Expand/collapse the selected tree node
//! - `Enter` - Open directory / download selected file
//! - `Backspace` - Go to the parent directory
//! - `r` - Refresh the current directory
//! - `u` - Upload a file
//! - `A` - Create a directory
//! - `?` - Help
//! - `q` - Quit
//!
//! All presentation state lives on one loop; background network calls
//! report back through a task channel drained by that same loop.

pub mod app;
mod event;
mod theme;
mod ui;

pub use app::{App, AppResult};
pub use theme::Theme;

use drivedeck_core::Settings;

/// Run the TUI application.
pub fn run(settings: Settings, base_url: String) -> AppResult<()> {
    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;

    let terminal = ratatui::init();
    let result = rt.block_on(App::new(settings, base_url).run(terminal));
    ratatui::restore();

    // Shutdown runtime immediately; outstanding backend calls are
    // intentionally not cancellable while the app runs, but they die
    // with the process.
    rt.shutdown_timeout(std::time::Duration::from_millis(100));

    result
}
