//! Progress events emitted while a project is being built.

use std::sync::Mutex;

use super::LoopOutcome;
use crate::checklist::TaskItem;
use crate::roles::{WorkReport, WorkerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Planner produced its directive
    PlanReady { directive: String },
    /// Manager persisted the checklist
    ChecklistWritten { open: usize },
    /// Fallback artifact for tasks without a target was derived
    MainArtifactInferred { artifact: Option<String> },
    TaskStarted { worker: WorkerId, task: TaskItem },
    TaskCompleted { task: TaskItem, report: WorkReport },
    TaskFailed { worker: WorkerId, task: TaskItem, reason: String },
    /// The finished item vanished from the checklist before it could be marked
    MarkSkipped { task: TaskItem },
    RunFinished { outcome: LoopOutcome },
}

/// Receives progress events.
pub trait RunObserver: Send + Sync {
    fn notify(&self, event: &RunEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl RunObserver for NullObserver {
    fn notify(&self, _event: &RunEvent) {}
}

/// Keeps every event, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Worker labels of every dispatch, in order.
    pub fn dispatch_labels(&self) -> Vec<WorkerId> {
        self.events()
            .iter()
            .filter_map(|event| match event {
                RunEvent::TaskStarted { worker, .. } => Some(*worker),
                _ => None,
            })
            .collect()
    }
}

impl RunObserver for RecordingObserver {
    fn notify(&self, event: &RunEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}
