use serde::Serialize;

use super::Role;
use crate::error::{Result, SwarmError};
use crate::gateway::Gateway;
use crate::prompt::PromptSet;

#[derive(Serialize)]
struct PlannerContext<'a> {
    request: &'a str,
}

/// Turn the user's request into a directive for the manager.
pub async fn plan<G>(gateway: &G, prompts: &PromptSet, request: &str) -> Result<String>
where
    G: Gateway + ?Sized,
{
    let prompt = prompts.render(Role::Planner, &PlannerContext { request })?;

    log::info!("Planner: drafting directive ({} chars of request)", request.len());
    let directive = gateway
        .generate(&prompt.system, &prompt.user)
        .await
        .ok_or(SwarmError::GatewayExhausted { role: Role::Planner })?;

    log::debug!("Planner directive:\n{}", directive);
    Ok(directive)
}
