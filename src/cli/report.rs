//! Console rendering of run progress and results.

use colored::*;

use codeswarm::checklist::{Checklist, TaskStatus};
use codeswarm::llm::Usage;
use codeswarm::orchestrator::{LoopOutcome, RunEvent, RunObserver, RunSummary};

/// Prints run events to stdout as they happen.
pub struct ConsoleObserver {
    verbose: bool,
}

impl ConsoleObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl RunObserver for ConsoleObserver {
    fn notify(&self, event: &RunEvent) {
        match event {
            RunEvent::PlanReady { directive } => {
                println!("{} directive ready", "Planner:".cyan().bold());
                if self.verbose {
                    println!("{}", directive.dimmed());
                }
            }
            RunEvent::ChecklistWritten { open } => {
                println!("{} checklist written with {} open task(s)", "Manager:".cyan().bold(), open);
            }
            RunEvent::MainArtifactInferred { artifact } => match artifact {
                Some(name) => println!("{} tasks without a file go to `{}`", "Note:".yellow(), name),
                None => println!("{} no task names a file", "Note:".yellow()),
            },
            RunEvent::TaskStarted { worker, task } => {
                println!("{} {} {}", format!("[{}]", worker).blue(), "started".dimmed(), task.description);
            }
            RunEvent::TaskCompleted { task, report } => {
                println!(
                    "{} {} `{}` ({} bytes) {}",
                    format!("[{}]", report.worker).blue(),
                    "wrote".green(),
                    report.artifact,
                    report.bytes,
                    format!("{}", task.id).dimmed()
                );
            }
            RunEvent::TaskFailed { worker, task, reason } => {
                println!("{} {} {}", format!("[{}]", worker).blue(), "failed".red().bold(), task.description);
                println!("  {}", reason.red());
            }
            RunEvent::MarkSkipped { task } => {
                println!("{} {} vanished from the checklist", "Warning:".yellow(), task.id);
            }
            RunEvent::RunFinished { .. } => {}
        }
    }
}

pub fn print_summary(summary: &RunSummary, usage: Option<Usage>) {
    println!();
    match &summary.outcome {
        LoopOutcome::Completed => println!("{}", "All tasks completed".green().bold()),
        LoopOutcome::Halted { task, reason } => {
            println!("{} at: {}", "Halted".red().bold(), task.description);
            println!("  {}", reason);
        }
    }
    println!(
        "  {} completed, {} open, {}s",
        summary.tasks_completed,
        summary.open_remaining,
        summary.elapsed().num_seconds()
    );
    if let Some(usage) = usage {
        println!(
            "  tokens: {} ({} in / {} out)",
            usage.total(),
            usage.input_tokens,
            usage.output_tokens
        );
    }
    println!();
    print_files(&summary.artifacts);
}

pub fn print_files(files: &[String]) {
    if files.is_empty() {
        println!("{}", "Project is empty".dimmed());
        return;
    }
    println!("{}", "Project files:".bold());
    let mut shown_dirs: Vec<String> = Vec::new();
    for file in files {
        let parts: Vec<&str> = file.split('/').collect();
        let (name, dirs) = match parts.split_last() {
            Some(split) => split,
            None => continue,
        };
        for depth in 0..dirs.len() {
            let dir = dirs[..=depth].join("/");
            if !shown_dirs.contains(&dir) {
                println!("{}{}/", "  ".repeat(depth + 1), dirs[depth].blue());
                shown_dirs.push(dir);
            }
        }
        println!("{}{}", "  ".repeat(dirs.len() + 1), name);
    }
}

pub fn print_status(checklist: &Checklist) {
    if checklist.is_empty() {
        println!("{}", "Checklist has no tasks".dimmed());
        return;
    }
    for item in checklist.items() {
        let mark = match item.status {
            TaskStatus::Done => "[x]".green(),
            TaskStatus::Open => "[ ]".yellow(),
        };
        println!("{} {}", mark, item.description);
    }
    println!(
        "\n{} done, {} open",
        checklist.done_count().to_string().green(),
        checklist.open_count().to_string().yellow()
    );
}
