use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use cli::report::{self, ConsoleObserver};
use codeswarm::checklist::Checklist;
use codeswarm::config::Config;
use codeswarm::gateway::RetryingGateway;
use codeswarm::llm::{GroqClient, LlmClient};
use codeswarm::orchestrator::{Pipeline, RunSettings, RunSummary, read_request};
use codeswarm::prompt::PromptSet;
use codeswarm::storage::{BlobStore, FsBlobStore};

type GroqGateway = RetryingGateway<GroqClient>;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("codeswarm")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("codeswarm.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &Config) -> Result<bool> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let store = Arc::new(FsBlobStore::new(&config.project.root));

    match &cli.command {
        None | Some(Commands::Run(_)) => handle_run_command(config, store, cli.is_verbose()),
        Some(Commands::Resume(_)) => handle_resume_command(config, store, cli.is_verbose()),
        Some(Commands::Status) => handle_status_command(config, &store),
        Some(Commands::Files) => handle_files_command(&store),
        Some(Commands::Clean) => handle_clean_command(&store),
    }
}

fn build_pipeline(
    config: &Config,
    store: Arc<FsBlobStore>,
    verbose: bool,
) -> Result<(Pipeline<GroqGateway, FsBlobStore>, Arc<GroqGateway>)> {
    let client = GroqClient::from_env(&config.llm.api_key_env, config.groq_config())
        .context("Failed to create the Groq client")?;
    if !client.is_ready() {
        eyre::bail!("{} is set but empty", config.llm.api_key_env);
    }
    let gateway = Arc::new(RetryingGateway::new(client, config.retry_policy()));

    let prompts = match &config.prompts.dir {
        Some(dir) => PromptSet::with_overrides(dir).context(format!("Failed to load prompts from {}", dir.display()))?,
        None => PromptSet::builtin().context("Failed to load built-in prompts")?,
    };

    let pipeline = Pipeline::new(gateway.clone(), store, prompts, RunSettings::from(config))
        .with_observer(Arc::new(ConsoleObserver::new(verbose)));
    Ok((pipeline, gateway))
}

fn print_banner(config: &Config) {
    println!(
        "{} {} project with {} ({} workers) in {}",
        "codeswarm:".green().bold(),
        config.llm.language.to_string().bold(),
        config.llm.model,
        config.orchestrator.workers,
        config.project.root.display()
    );
}

fn finish(summary: RunSummary, gateway: &GroqGateway) -> bool {
    report::print_summary(&summary, Some(gateway.client().total_usage()));
    info!(
        "Run finished: {} completed, {} open, outcome {:?}",
        summary.tasks_completed, summary.open_remaining, summary.outcome
    );
    summary.is_success()
}

fn handle_run_command(config: &Config, store: Arc<FsBlobStore>, verbose: bool) -> Result<bool> {
    let request = read_request(&config.project.request_file).context("Failed to read the request")?;
    let (pipeline, gateway) = build_pipeline(config, store, verbose)?;

    print_banner(config);
    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;
    let summary = runtime.block_on(pipeline.run(&request)).context("Run aborted")?;

    Ok(finish(summary, &gateway))
}

fn handle_resume_command(config: &Config, store: Arc<FsBlobStore>, verbose: bool) -> Result<bool> {
    let (pipeline, gateway) = build_pipeline(config, store, verbose)?;

    print_banner(config);
    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;
    let summary = runtime.block_on(pipeline.resume()).context("Resume aborted")?;

    Ok(finish(summary, &gateway))
}

fn handle_status_command(config: &Config, store: &FsBlobStore) -> Result<bool> {
    let name = &config.project.checklist;
    if !store.exists(name)? {
        println!("{} no {} in {}", "Status:".yellow(), name, store.root().display());
        return Ok(true);
    }

    let checklist = Checklist::parse(&store.read(name)?);
    report::print_status(&checklist);
    Ok(true)
}

fn handle_files_command(store: &FsBlobStore) -> Result<bool> {
    let files = store.list().context("Failed to list project files")?;
    report::print_files(&files);
    Ok(true)
}

fn handle_clean_command(store: &FsBlobStore) -> Result<bool> {
    store.clear().context("Failed to clean the project root")?;
    println!("{} {}", "Cleaned".green(), store.root().display());
    Ok(true)
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging first
    setup_logging(cli.is_verbose()).context("Failed to setup logging")?;

    // API keys may live in a .env file
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded environment from {}", path.display());
    }

    // Load configuration
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    let success = run_application(&cli, &config).context("Application failed")?;
    if !success {
        std::process::exit(1);
    }

    Ok(())
}
