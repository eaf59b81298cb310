use serde::Serialize;

use super::{Language, Role};
use crate::checklist::strip_fence;
use crate::error::{Result, SwarmError};
use crate::gateway::Gateway;
use crate::prompt::PromptSet;
use crate::storage::BlobStore;

#[derive(Serialize)]
struct ManagerContext<'a> {
    directive: &'a str,
    language: &'static str,
    example_file: &'static str,
}

/// Turn a directive into the project checklist and persist it.
///
/// Returns the checklist document as written. On gateway exhaustion nothing is
/// written.
pub async fn manage<G, S>(
    gateway: &G,
    prompts: &PromptSet,
    store: &S,
    checklist_path: &str,
    directive: &str,
    language: Language,
) -> Result<String>
where
    G: Gateway + ?Sized,
    S: BlobStore + ?Sized,
{
    let context = ManagerContext {
        directive,
        language: language.display_name(),
        example_file: language.example_file(),
    };
    let prompt = prompts.render(Role::Manager, &context)?;

    log::info!("Manager: writing checklist for a {} project", language);
    let response = gateway
        .generate(&prompt.system, &prompt.user)
        .await
        .ok_or(SwarmError::GatewayExhausted { role: Role::Manager })?;

    let document = strip_fence(&response).to_string();
    store.write(checklist_path, &document)?;
    log::info!("Manager: wrote {} ({} bytes)", checklist_path, document.len());

    Ok(document)
}
