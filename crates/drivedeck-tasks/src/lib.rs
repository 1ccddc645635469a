//! Background task orchestration for drivedeck.
//!
//! Network work runs on detached tokio tasks; results come back to the
//! single UI-processing loop over an mpsc channel, following the same
//! pattern as the tree and listing loads in the TUI.

mod orchestrator;
mod task;

pub use orchestrator::{TASK_CHANNEL_SIZE, TaskEvent, TaskOrchestrator};
pub use task::{TaskHandle, TaskId, TaskStatus};
