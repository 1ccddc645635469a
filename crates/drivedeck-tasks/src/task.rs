//! Background task bookkeeping types.

/// Identifier for a spawned background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

/// Lifecycle of a background task.
///
/// Transitions are strictly `Pending -> Running -> {Succeeded | Failed}`;
/// no other ordering is observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    /// Spawned but the worker has not reported in yet.
    #[default]
    Pending,
    /// The worker is executing.
    Running,
    /// Finished with a result.
    Succeeded,
    /// Finished with an error.
    Failed,
}

impl TaskStatus {
    /// Check whether the task has finished either way.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

/// Presentation-facing state of one outstanding background operation.
///
/// One handle exists per in-flight task; it is discarded once terminal.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    /// Identifier of the task.
    pub id: TaskId,

    /// Current lifecycle state.
    pub status: TaskStatus,

    /// Human-readable phase label ("Uploading file...").
    pub message: String,

    /// Completion ratio in `0..=1`; `None` renders as indeterminate.
    pub progress: Option<f64>,
}

impl TaskHandle {
    pub(crate) fn new(id: TaskId, message: String) -> Self {
        Self {
            id,
            status: TaskStatus::Pending,
            message,
            progress: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
        assert!(TaskStatus::Succeeded.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
    }

    #[test]
    fn test_new_handle_is_pending_and_indeterminate() {
        let handle = TaskHandle::new(TaskId(7), "Loading directory...".into());
        assert_eq!(handle.status, TaskStatus::Pending);
        assert!(handle.progress.is_none());
    }
}
