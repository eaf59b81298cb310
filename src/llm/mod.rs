//! LLM Client Layer - chat completion types and the Groq client
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait for API abstraction
//! - GroqClient implementation
//! - MockLlmClient for tests

pub mod client;
pub mod groq;
pub mod types;

pub use client::{LlmClient, LlmError, MockLlmClient};
pub use groq::{GROQ_API_KEY_ENV, GROQ_API_URL, GroqClient, GroqConfig};
pub use types::{ChatRole, CompletionRequest, CompletionResponse, FinishReason, Message, Usage};
