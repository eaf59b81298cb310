//! Codeswarm - a checklist-driven swarm of LLM roles that builds small projects
//!
//! A Planner turns a request into a directive, a Manager turns the directive
//! into a markdown checklist, and a pool of Workers completes the checklist
//! one item at a time, each item rewriting one file under the project root.

pub mod checklist;
pub mod config;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod orchestrator;
pub mod prompt;
pub mod roles;
pub mod storage;

pub use error::{Result, SwarmError};
