//! Orchestrator - the checklist-driven control loop
//!
//! Each iteration re-reads the checklist, takes the first open item, hands it
//! to the next worker label, and on success marks the item done by its
//! [`TaskId`](crate::checklist::TaskId). The first failure halts the loop.

mod events;
mod pipeline;
mod pool;

use std::time::Duration;

use crate::checklist::{Checklist, TaskItem};
use crate::error::Result;
use crate::gateway::Gateway;
use crate::roles::Worker;
use crate::storage::BlobStore;

pub use events::{NullObserver, RecordingObserver, RunEvent, RunObserver};
pub use pipeline::{Pipeline, RunSettings, RunSummary, read_request};
pub use pool::WorkerPool;

/// How a loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    /// No open items remain
    Completed,
    /// A task failed; later items were not attempted
    Halted { task: TaskItem, reason: String },
}

impl LoopOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, LoopOutcome::Completed)
    }
}

/// Main artifact, derived at most once per run.
#[derive(Debug, Clone)]
enum MainArtifact {
    Unknown,
    Inferred(Option<String>),
}

/// Drives a checklist to completion.
pub struct Orchestrator<'a, G: ?Sized, S: ?Sized> {
    worker: Worker<'a, G, S>,
    store: &'a S,
    checklist_path: &'a str,
    pool: WorkerPool,
    pause: Duration,
    observer: &'a dyn RunObserver,
    main_artifact: MainArtifact,
    completed: usize,
}

impl<'a, G, S> Orchestrator<'a, G, S>
where
    G: Gateway + ?Sized,
    S: BlobStore + ?Sized,
{
    pub fn new(
        worker: Worker<'a, G, S>,
        store: &'a S,
        checklist_path: &'a str,
        pool: WorkerPool,
        pause: Duration,
        observer: &'a dyn RunObserver,
    ) -> Self {
        Self {
            worker,
            store,
            checklist_path,
            pool,
            pause,
            observer,
            main_artifact: MainArtifact::Unknown,
            completed: 0,
        }
    }

    /// Tasks finished successfully so far
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Run until no open item remains or a task fails.
    ///
    /// Worker failures end the loop with [`LoopOutcome::Halted`]. Only failures
    /// to read or write the checklist itself are returned as errors.
    pub async fn run(&mut self) -> Result<LoopOutcome> {
        let mut first = true;

        loop {
            let checklist = self.load_checklist()?;
            let Some(task) = checklist.first_open().cloned() else {
                log::info!("No open items left, {} task(s) completed", self.completed);
                return Ok(LoopOutcome::Completed);
            };

            if !first && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
            first = false;

            let worker_id = self.pool.next_worker();
            log::info!("Dispatching {} to {}", task.id, worker_id);
            self.observer.notify(&RunEvent::TaskStarted {
                worker: worker_id,
                task: task.clone(),
            });

            let fallback = if task.target.is_none() {
                self.main_artifact(&checklist)
            } else {
                None
            };

            match self.worker.execute(&task.description, worker_id, fallback.as_deref()).await {
                Ok(report) => {
                    self.mark_done(&task)?;
                    self.completed += 1;
                    log::info!("{} finished {} ({} bytes to `{}`)", worker_id, task.id, report.bytes, report.artifact);
                    self.observer.notify(&RunEvent::TaskCompleted { task, report });
                }
                Err(err) => {
                    if err.is_task_failure() {
                        log::warn!("{} failed {}: {}", worker_id, task.id, err);
                    } else {
                        log::error!("{} failed {}: {}", worker_id, task.id, err);
                    }
                    let reason = err.to_string();
                    self.observer.notify(&RunEvent::TaskFailed {
                        worker: worker_id,
                        task: task.clone(),
                        reason: reason.clone(),
                    });
                    return Ok(LoopOutcome::Halted { task, reason });
                }
            }
        }
    }

    fn load_checklist(&self) -> Result<Checklist> {
        Ok(Checklist::parse(&self.store.read(self.checklist_path)?))
    }

    /// Re-read the checklist and flip the item. The document may have been
    /// edited while the worker ran, so the item is located by id, not position.
    fn mark_done(&self, task: &TaskItem) -> Result<()> {
        let mut checklist = self.load_checklist()?;
        if checklist.mark_done(&task.id) {
            self.store.write(self.checklist_path, &checklist.render())?;
        } else {
            log::warn!("Task {} disappeared from {} before it could be marked done", task.id, self.checklist_path);
            self.observer.notify(&RunEvent::MarkSkipped { task: task.clone() });
        }
        Ok(())
    }

    fn main_artifact(&mut self, checklist: &Checklist) -> Option<String> {
        if let MainArtifact::Inferred(artifact) = &self.main_artifact {
            return artifact.clone();
        }

        let artifact = checklist.main_artifact();
        match &artifact {
            Some(name) => log::info!("Main artifact inferred as `{}`", name),
            None => log::warn!("No item in {} names a target file", self.checklist_path),
        }
        self.observer.notify(&RunEvent::MainArtifactInferred {
            artifact: artifact.clone(),
        });
        self.main_artifact = MainArtifact::Inferred(artifact.clone());
        artifact
    }
}
