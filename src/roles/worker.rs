use serde::{Deserialize, Serialize};

use super::{Language, Role, WorkerId};
use crate::checklist::{extract_target, strip_fence};
use crate::error::{Result, SwarmError};
use crate::gateway::Gateway;
use crate::prompt::PromptSet;
use crate::storage::BlobStore;

/// Outcome of one successful task execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkReport {
    pub worker: WorkerId,
    pub artifact: String,
    /// Size of the content written
    pub bytes: usize,
}

#[derive(Serialize)]
struct WorkerContext<'a> {
    language: &'static str,
    checklist: &'a str,
    task: &'a str,
    artifact: &'a str,
    fence_tag: &'static str,
    current_content: &'a str,
}

/// Executes a single checklist item against one artifact.
///
/// A single `Worker` serves every slot in the pool; the slot label only shows
/// up in logs and the returned report.
pub struct Worker<'a, G: ?Sized, S: ?Sized> {
    gateway: &'a G,
    store: &'a S,
    prompts: &'a PromptSet,
    checklist_path: &'a str,
    language: Language,
}

impl<'a, G, S> Worker<'a, G, S>
where
    G: Gateway + ?Sized,
    S: BlobStore + ?Sized,
{
    pub fn new(
        gateway: &'a G,
        store: &'a S,
        prompts: &'a PromptSet,
        checklist_path: &'a str,
        language: Language,
    ) -> Self {
        Self {
            gateway,
            store,
            prompts,
            checklist_path,
            language,
        }
    }

    /// Execute `task`, overwriting its target artifact.
    ///
    /// The target is the first backticked token of the description, else
    /// `fallback`. With neither, fails with `UnresolvableTarget` before any
    /// inference call. The checklist is read for context and never modified.
    pub async fn execute(&self, task: &str, worker: WorkerId, fallback: Option<&str>) -> Result<WorkReport> {
        let checklist = self.store.read(self.checklist_path)?;

        let artifact = match extract_target(task) {
            Some(target) => target,
            None => match fallback {
                Some(fallback) => {
                    log::info!("{}: no target in task, using fallback `{}`", worker, fallback);
                    fallback.to_string()
                }
                None => {
                    return Err(SwarmError::UnresolvableTarget { task: task.to_string() });
                }
            },
        };

        let current_content = self.store.read(&artifact)?;

        let context = WorkerContext {
            language: self.language.display_name(),
            checklist: &checklist,
            task,
            artifact: &artifact,
            fence_tag: self.language.fence_tag(),
            current_content: &current_content,
        };
        let prompt = self.prompts.render(Role::Worker, &context)?;

        log::info!("{}: working on `{}`", worker, artifact);
        let response = self
            .gateway
            .generate(&prompt.system, &prompt.user)
            .await
            .ok_or(SwarmError::GatewayExhausted { role: Role::Worker })?;

        let content = strip_fence(&response);
        self.store.write(&artifact, content)?;

        Ok(WorkReport {
            worker,
            artifact,
            bytes: content.len(),
        })
    }
}
