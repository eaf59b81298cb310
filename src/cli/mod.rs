//! CLI module for codeswarm - command-line interface and console output.

pub mod commands;
pub mod report;

pub use commands::Cli;
