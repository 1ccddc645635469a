//! Spawns background work and funnels completions to the UI loop.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::future::Future;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::task::{TaskHandle, TaskId, TaskStatus};

/// Channel buffer size for task events.
pub const TASK_CHANNEL_SIZE: usize = 100;

/// Event delivered from a background worker to the UI loop.
#[derive(Debug)]
pub enum TaskEvent<O> {
    /// The worker has started executing.
    Started { id: TaskId },
    /// The work finished; `outcome` is applied by the UI loop.
    Succeeded { id: TaskId, outcome: O },
    /// The work failed; `message` is shown to the user, nothing is applied.
    Failed { id: TaskId, message: String },
}

impl<O> TaskEvent<O> {
    /// The task this event belongs to.
    pub fn id(&self) -> TaskId {
        match self {
            TaskEvent::Started { id }
            | TaskEvent::Succeeded { id, .. }
            | TaskEvent::Failed { id, .. } => *id,
        }
    }
}

/// Runs units of work on detached tokio tasks and marshals their
/// completions onto the single UI-processing loop.
///
/// The loop that drains the receiver is the only place completions are
/// applied, so each one lands as an indivisible unit with respect to
/// other UI work. Workers return immutable results and never touch
/// presentation or cache state. Started work is never cancelled; it runs
/// to success or failure. Cross-task ordering is not guaranteed: two
/// overlapping operations complete in whatever order the backend answers.
#[derive(Debug)]
pub struct TaskOrchestrator<O> {
    tx: mpsc::Sender<TaskEvent<O>>,
    next_id: u64,
    handles: HashMap<TaskId, TaskHandle>,
    guards: HashMap<TaskId, String>,
    in_flight: HashSet<String>,
}

impl<O: Send + 'static> TaskOrchestrator<O> {
    /// Create an orchestrator and the receiver the UI loop must own.
    pub fn new() -> (Self, mpsc::Receiver<TaskEvent<O>>) {
        let (tx, rx) = mpsc::channel(TASK_CHANNEL_SIZE);
        (
            Self {
                tx,
                next_id: 0,
                handles: HashMap::new(),
                guards: HashMap::new(),
                in_flight: HashSet::new(),
            },
            rx,
        )
    }

    /// Spawn `work` under a human-readable `label`.
    ///
    /// When `guard` names a key that is already in flight the call is a
    /// no-op returning `None` — this is what keeps a re-clicked control
    /// from spawning an overlapping operation on the same target. The key
    /// is held until the task's terminal event is applied.
    ///
    /// Errors raised by `work` never escape: they become a
    /// [`TaskEvent::Failed`] with the error's display text.
    pub fn spawn<F, E>(
        &mut self,
        label: impl Into<String>,
        guard: Option<&str>,
        work: F,
    ) -> Option<TaskId>
    where
        F: Future<Output = Result<O, E>> + Send + 'static,
        E: Display,
    {
        if let Some(key) = guard {
            if self.in_flight.contains(key) {
                debug!(key, "operation already in flight, ignoring");
                return None;
            }
        }

        let id = TaskId(self.next_id);
        self.next_id += 1;

        let label = label.into();
        self.handles.insert(id, TaskHandle::new(id, label));
        if let Some(key) = guard {
            self.in_flight.insert(key.to_string());
            self.guards.insert(id, key.to_string());
        }

        let tx = self.tx.clone();
        tokio::spawn(async move {
            if tx.send(TaskEvent::Started { id }).await.is_err() {
                return;
            }
            let event = match work.await {
                Ok(outcome) => TaskEvent::Succeeded { id, outcome },
                Err(err) => TaskEvent::Failed {
                    id,
                    message: err.to_string(),
                },
            };
            if tx.send(event).await.is_err() {
                warn!(?id, "ui loop gone before task completion");
            }
        });

        Some(id)
    }

    /// Record an event against its handle.
    ///
    /// A terminal event discards the handle, releases the task's guard
    /// key, and returns the handle for final presentation; `Started`
    /// moves the handle to `Running` and returns `None`.
    pub fn apply(&mut self, event: &TaskEvent<O>) -> Option<TaskHandle> {
        match event {
            TaskEvent::Started { id } => {
                if let Some(handle) = self.handles.get_mut(id) {
                    handle.status = TaskStatus::Running;
                }
                None
            }
            TaskEvent::Succeeded { id, .. } => self.finish(*id, TaskStatus::Succeeded),
            TaskEvent::Failed { id, .. } => self.finish(*id, TaskStatus::Failed),
        }
    }

    fn finish(&mut self, id: TaskId, status: TaskStatus) -> Option<TaskHandle> {
        if let Some(key) = self.guards.remove(&id) {
            self.in_flight.remove(&key);
        }
        let mut handle = self.handles.remove(&id)?;
        handle.status = status;
        Some(handle)
    }

    /// Look up the handle of an outstanding task.
    pub fn handle(&self, id: TaskId) -> Option<&TaskHandle> {
        self.handles.get(&id)
    }

    /// Check whether any task is outstanding.
    pub fn is_busy(&self) -> bool {
        !self.handles.is_empty()
    }

    /// Phase label to display, preferring a running task's.
    pub fn active_message(&self) -> Option<&str> {
        self.handles
            .values()
            .find(|h| h.status == TaskStatus::Running)
            .or_else(|| self.handles.values().next())
            .map(|h| h.message.as_str())
    }
}
