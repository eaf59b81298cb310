//! Deterministic gateway for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::Gateway;

/// One recorded `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCall {
    pub system: String,
    pub user: String,
}

/// Replays queued outputs in order. `None` entries, and any call after the
/// queue runs dry, behave like an exhausted gateway.
#[derive(Default)]
pub struct ScriptedGateway {
    outputs: Mutex<VecDeque<Option<String>>>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl ScriptedGateway {
    pub fn new(outputs: Vec<Option<String>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call succeeds with the next text.
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(|t| Some(t.into())).collect())
    }

    /// A gateway that never produces anything.
    pub fn exhausted() -> Self {
        Self::default()
    }

    /// Queue another output.
    pub fn push(&self, output: Option<String>) {
        self.outputs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(output);
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn generate(&self, system: &str, user: &str) -> Option<String> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(GatewayCall {
                system: system.to_string(),
                user: user.to_string(),
            });

        self.outputs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .flatten()
    }
}
