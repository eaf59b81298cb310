//! Gateway over an LlmClient with a bounded retry count and a fixed delay.

use std::time::Duration;

use async_trait::async_trait;

use super::Gateway;
use crate::llm::{CompletionRequest, LlmClient};

/// Retry settings for inference calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// Production gateway.
///
/// Every failed attempt (transport error, API error, empty completion) is
/// retried after `delay` until `max_attempts` is reached. Errors that can never
/// succeed, like a missing API key, stop the retries early.
pub struct RetryingGateway<L: LlmClient> {
    client: L,
    policy: RetryPolicy,
}

impl<L: LlmClient> RetryingGateway<L> {
    pub fn new(client: L, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn client(&self) -> &L {
        &self.client
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

#[async_trait]
impl<L: LlmClient> Gateway for RetryingGateway<L> {
    async fn generate(&self, system: &str, user: &str) -> Option<String> {
        let request = CompletionRequest::new(system).with_user_message(user);
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            log::info!("Calling {} (attempt {}/{})", self.client.model(), attempt, max_attempts);

            match self.client.complete(request.clone()).await {
                Ok(response) => {
                    let text = response.content.trim();
                    if !text.is_empty() {
                        if response.finish_reason.is_truncated() {
                            log::warn!("Response from {} was truncated at the token limit", response.model);
                        }
                        log::debug!(
                            "Response received: {} input / {} output tokens",
                            response.usage.input_tokens,
                            response.usage.output_tokens
                        );
                        return Some(text.to_string());
                    }
                    tracing::warn!(attempt, max_attempts, "Inference call returned empty content");
                }
                Err(err) => {
                    tracing::warn!(attempt, max_attempts, error = %err, "Inference call failed");
                    if !err.is_retryable() {
                        log::error!("Not retrying: {}", err);
                        break;
                    }
                }
            }

            if attempt < max_attempts && !self.policy.delay.is_zero() {
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        log::error!("Inference gave up after {} attempt(s)", max_attempts);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, LlmError, MockLlmClient};

    fn no_delay(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::ZERO)
    }

    #[test]
    fn test_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(10));
    }

    #[test]
    fn test_policy_requires_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[tokio::test]
    async fn test_first_attempt_succeeds() {
        let gateway = RetryingGateway::new(MockLlmClient::with_texts(["  directive  \n"]), no_delay(3));

        let result = gateway.generate("system", "user").await;

        assert_eq!(result.as_deref(), Some("directive"));
        assert_eq!(gateway.client().call_count(), 1);
        let requests = gateway.client().requests();
        assert_eq!(requests[0].system, "system");
        assert_eq!(requests[0].messages[0].content, "user");
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let client = MockLlmClient::new(vec![
            Err(LlmError::ApiError {
                status: 503,
                message: "overloaded".into(),
            }),
            Ok(CompletionResponse::text("")),
            Ok(CompletionResponse::text("finally")),
        ]);
        let gateway = RetryingGateway::new(client, no_delay(3));

        assert_eq!(gateway.generate("s", "u").await.as_deref(), Some("finally"));
        assert_eq!(gateway.client().call_count(), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_none() {
        let client = MockLlmClient::new(vec![
            Err(LlmError::InvalidResponse("bad".into())),
            Err(LlmError::InvalidResponse("bad".into())),
            Err(LlmError::InvalidResponse("bad".into())),
            Ok(CompletionResponse::text("too late")),
        ]);
        let gateway = RetryingGateway::new(client, no_delay(3));

        assert_eq!(gateway.generate("s", "u").await, None);
        assert_eq!(gateway.client().call_count(), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_early() {
        let client = MockLlmClient::new(vec![
            Err(LlmError::ApiError {
                status: 401,
                message: "invalid key".into(),
            }),
            Ok(CompletionResponse::text("unreachable")),
        ]);
        let gateway = RetryingGateway::new(client, no_delay(3));

        assert_eq!(gateway.generate("s", "u").await, None);
        assert_eq!(gateway.client().call_count(), 1);
    }
}
