//! Pipeline - request to finished project
//!
//! Planner, Manager, then the orchestrator loop, over one gateway and one
//! blob store.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{LoopOutcome, NullObserver, Orchestrator, RunEvent, RunObserver, WorkerPool};
use crate::checklist::Checklist;
use crate::config::Config;
use crate::error::{Result, SwarmError};
use crate::gateway::Gateway;
use crate::prompt::PromptSet;
use crate::roles::{self, Language, Worker};
use crate::storage::BlobStore;

/// Per-run settings, fixed for the duration of a run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub language: Language,
    /// Checklist name within the blob store
    pub checklist: String,
    pub workers: usize,
    pub pause: Duration,
    /// Clear the project root before planning
    pub clean: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for RunSettings {
    fn from(config: &Config) -> Self {
        Self {
            language: config.llm.language,
            checklist: config.project.checklist.clone(),
            workers: config.orchestrator.workers,
            pause: config.pause(),
            clean: config.project.clean,
        }
    }
}

/// What a run left behind.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcome: LoopOutcome,
    pub tasks_completed: usize,
    pub open_remaining: usize,
    /// Every blob under the project root, sorted
    pub artifacts: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.outcome.is_completed()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Read the request file. Absent or blank requests are rejected.
pub fn read_request(path: &Path) -> Result<String> {
    let request = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SwarmError::PreconditionMissing(format!(
                "request file {} not found",
                path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };

    if request.trim().is_empty() {
        return Err(SwarmError::PreconditionMissing(format!(
            "request file {} is empty",
            path.display()
        )));
    }
    Ok(request)
}

pub struct Pipeline<G: ?Sized, S: ?Sized> {
    gateway: Arc<G>,
    store: Arc<S>,
    prompts: PromptSet,
    settings: RunSettings,
    observer: Arc<dyn RunObserver>,
}

impl<G, S> Pipeline<G, S>
where
    G: Gateway + ?Sized,
    S: BlobStore + ?Sized,
{
    pub fn new(gateway: Arc<G>, store: Arc<S>, prompts: PromptSet, settings: RunSettings) -> Self {
        Self {
            gateway,
            store,
            prompts,
            settings,
            observer: Arc::new(NullObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Build a project from scratch.
    pub async fn run(&self, request: &str) -> Result<RunSummary> {
        let started_at = Utc::now();

        if request.trim().is_empty() {
            return Err(SwarmError::PreconditionMissing("request is empty".to_string()));
        }

        if self.settings.clean {
            self.store.clear()?;
        }

        let directive = roles::plan(self.gateway.as_ref(), &self.prompts, request).await?;
        self.observer.notify(&RunEvent::PlanReady {
            directive: directive.clone(),
        });

        let document = roles::manage(
            self.gateway.as_ref(),
            &self.prompts,
            self.store.as_ref(),
            &self.settings.checklist,
            &directive,
            self.settings.language,
        )
        .await?;
        self.observer.notify(&RunEvent::ChecklistWritten {
            open: Checklist::parse(&document).open_count(),
        });

        self.drive(started_at).await
    }

    /// Continue from the checklist already in the store.
    pub async fn resume(&self) -> Result<RunSummary> {
        let started_at = Utc::now();

        if !self.store.exists(&self.settings.checklist)? {
            return Err(SwarmError::PreconditionMissing(format!(
                "no checklist {} to resume from",
                self.settings.checklist
            )));
        }
        log::info!("Resuming from existing {}", self.settings.checklist);

        self.drive(started_at).await
    }

    async fn drive(&self, started_at: DateTime<Utc>) -> Result<RunSummary> {
        let worker = Worker::new(
            self.gateway.as_ref(),
            self.store.as_ref(),
            &self.prompts,
            &self.settings.checklist,
            self.settings.language,
        );
        let mut orchestrator = Orchestrator::new(
            worker,
            self.store.as_ref(),
            &self.settings.checklist,
            WorkerPool::new(self.settings.workers),
            self.settings.pause,
            self.observer.as_ref(),
        );

        let outcome = orchestrator.run().await?;
        self.observer.notify(&RunEvent::RunFinished {
            outcome: outcome.clone(),
        });

        let checklist = Checklist::parse(&self.store.read(&self.settings.checklist)?);
        Ok(RunSummary {
            outcome,
            tasks_completed: orchestrator.completed(),
            open_remaining: checklist.open_count(),
            artifacts: self.store.list()?,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ScriptedGateway;
    use crate::storage::FsBlobStore;
    use tempfile::TempDir;

    fn settings() -> RunSettings {
        RunSettings {
            pause: Duration::ZERO,
            ..RunSettings::default()
        }
    }

    #[test]
    fn test_read_request_missing() {
        let temp = TempDir::new().unwrap();
        let err = read_request(&temp.path().join("request.txt")).unwrap_err();
        assert!(matches!(err, SwarmError::PreconditionMissing(_)));
    }

    #[test]
    fn test_read_request_blank() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("request.txt");
        fs::write(&path, "  \n\t\n").unwrap();
        assert!(matches!(read_request(&path), Err(SwarmError::PreconditionMissing(_))));
    }

    #[test]
    fn test_read_request_ok() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("request.txt");
        fs::write(&path, "make a game\n").unwrap();
        assert_eq!(read_request(&path).unwrap(), "make a game\n");
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.orchestrator.workers = 5;
        config.project.clean = true;
        config.llm.language = Language::Ruby;

        let settings = RunSettings::from(&config);

        assert_eq!(settings.workers, 5);
        assert!(settings.clean);
        assert_eq!(settings.language, Language::Ruby);
        assert_eq!(settings.checklist, "README.md");
    }

    #[tokio::test]
    async fn test_blank_request_rejected_before_any_call() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(FsBlobStore::new(temp.path()));
        store.write("keep.txt", "x").unwrap();
        let gateway = Arc::new(ScriptedGateway::with_texts(["unused"]));
        let pipeline = Pipeline::new(
            gateway.clone(),
            store.clone(),
            PromptSet::builtin().unwrap(),
            RunSettings {
                clean: true,
                ..settings()
            },
        );

        let err = pipeline.run("   ").await.unwrap_err();

        assert!(matches!(err, SwarmError::PreconditionMissing(_)));
        assert_eq!(gateway.call_count(), 0);
        assert!(store.exists("keep.txt").unwrap());
    }

    #[tokio::test]
    async fn test_clean_clears_before_planning() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(FsBlobStore::new(temp.path()));
        store.write("stale.py", "old").unwrap();
        let gateway = Arc::new(ScriptedGateway::with_texts(["directive", "- [ ] `main.py` hi", "print()"]));
        let pipeline = Pipeline::new(
            gateway,
            store.clone(),
            PromptSet::builtin().unwrap(),
            RunSettings {
                clean: true,
                ..settings()
            },
        );

        let summary = pipeline.run("hello").await.unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.artifacts, vec!["README.md", "main.py"]);
        assert!(summary.finished_at >= summary.started_at);
    }

    #[tokio::test]
    async fn test_resume_without_checklist() {
        let temp = TempDir::new().unwrap();
        let pipeline = Pipeline::new(
            Arc::new(ScriptedGateway::exhausted()),
            Arc::new(FsBlobStore::new(temp.path())),
            PromptSet::builtin().unwrap(),
            settings(),
        );

        let err = pipeline.resume().await.unwrap_err();
        assert!(matches!(err, SwarmError::PreconditionMissing(_)));
    }

    #[tokio::test]
    async fn test_resume_continues_open_items() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(FsBlobStore::new(temp.path()));
        store
            .write("README.md", "- [x] `a.py` done\n- [ ] `b.py` todo\n")
            .unwrap();
        let gateway = Arc::new(ScriptedGateway::with_texts(["B"]));
        let pipeline = Pipeline::new(gateway.clone(), store.clone(), PromptSet::builtin().unwrap(), settings());

        let summary = pipeline.resume().await.unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.tasks_completed, 1);
        assert_eq!(summary.open_remaining, 0);
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(store.read("b.py").unwrap(), "B");
    }
}
