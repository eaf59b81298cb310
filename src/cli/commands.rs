//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: build a project from the request file (default)
//! - resume: continue an existing checklist
//! - status: show checklist progress
//! - files: list project artifacts
//! - clean: empty the project root

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use codeswarm::config::Config;
use codeswarm::roles::Language;

/// Codeswarm - build small projects with a planner, a manager and a pool of workers
#[derive(Parser, Debug)]
#[command(name = "codeswarm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root directory
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Fold command-line overrides into the loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(project) = &self.project {
            config.project.root = project.clone();
        }

        let run_args = match &self.command {
            Some(Commands::Run(args)) | Some(Commands::Resume(args)) => Some(args),
            _ => None,
        };
        if let Some(args) = run_args {
            args.apply(config);
        }
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a project from the request file
    Run(RunArgs),

    /// Continue working through an existing checklist
    Resume(RunArgs),

    /// Show checklist progress
    Status,

    /// List the files in the project root
    Files,

    /// Delete everything in the project root
    Clean,
}

/// Options shared by `run` and `resume`
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Implementation language
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Number of worker slots
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Clear the project root before starting
    #[arg(long)]
    pub clean: bool,

    /// Request file
    #[arg(short, long)]
    pub request: Option<PathBuf>,
}

impl RunArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(language) = self.language {
            config.llm.language = language;
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(workers) = self.workers {
            config.orchestrator.workers = workers;
        }
        if self.clean {
            config.project.clean = true;
        }
        if let Some(request) = &self.request {
            config.project.request_file = request.clone();
        }
    }
}
