//! Inference Gateway - the one capability every role depends on.
//!
//! A gateway turns a role instruction and a task payload into generated text.
//! It owns its retry policy and reports exhaustion as `None`; it never returns
//! an error past this boundary.

mod retrying;
mod scripted;

use std::sync::Arc;

use async_trait::async_trait;

pub use retrying::{RetryPolicy, RetryingGateway};
pub use scripted::{GatewayCall, ScriptedGateway};

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Generate text for `user` under the `system` instruction.
    ///
    /// Returns `None` once the gateway has given up.
    async fn generate(&self, system: &str, user: &str) -> Option<String>;
}

#[async_trait]
impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    async fn generate(&self, system: &str, user: &str) -> Option<String> {
        (**self).generate(system, user).await
    }
}
