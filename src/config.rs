use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SwarmError;
use crate::gateway::RetryPolicy;
use crate::llm::{GROQ_API_KEY_ENV, GROQ_API_URL, GroqConfig};
use crate::roles::Language;

/// Models the Groq endpoint is known to serve for this tool
pub const SUPPORTED_MODELS: [&str; 4] = ["llama3-70b-8192", "mixtral-8x7b-32768", "llama3-8b-8192", "gemma-7b-it"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub project: ProjectConfig,
    pub llm: LlmConfig,
    pub retry: RetryConfig,
    pub orchestrator: OrchestratorConfig,
    pub prompts: PromptsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory every artifact is written under
    pub root: PathBuf,
    /// Checklist name, relative to the project root
    pub checklist: String,
    pub request_file: PathBuf,
    /// Clear the project root before a run
    pub clean: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("Project"),
            checklist: "README.md".to_string(),
            request_file: PathBuf::from("request.txt"),
            clean: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub language: Language,
    pub base_url: String,
    pub api_key_env: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: SUPPORTED_MODELS[0].to_string(),
            language: Language::default(),
            base_url: GROQ_API_URL.to_string(),
            api_key_env: GROQ_API_KEY_ENV.to_string(),
            max_tokens: 8000,
            temperature: 0.1,
            timeout_ms: 300000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 10000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Size of the worker pool
    pub workers: usize,
    /// Pause between loop iterations
    pub pause_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            pause_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory of `<role>.system.md` / `<role>.user.md` overrides
    pub dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            project: ProjectConfig::default(),
            llm: LlmConfig::default(),
            retry: RetryConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            prompts: PromptsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Project-local config wins over the user-wide one
        let local_config = PathBuf::from(format!("{}.yml", project_name));
        let mut candidates = vec![local_config];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(project_name).join(format!("{}.yml", project_name)));
        }

        for candidate in candidates {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject settings the run cannot work with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.orchestrator.workers == 0 {
            return Err(SwarmError::Config("orchestrator.workers must be at least 1".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(SwarmError::Config("retry.max_attempts must be at least 1".to_string()));
        }
        if !SUPPORTED_MODELS.contains(&self.llm.model.as_str()) {
            return Err(SwarmError::Config(format!(
                "unknown model '{}' (expected one of: {})",
                self.llm.model,
                SUPPORTED_MODELS.join(", ")
            )));
        }
        if self.project.checklist.trim().is_empty() {
            return Err(SwarmError::Config("project.checklist must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry.max_attempts, Duration::from_millis(self.retry.delay_ms))
    }

    pub fn groq_config(&self) -> GroqConfig {
        GroqConfig {
            base_url: self.llm.base_url.clone(),
            model: self.llm.model.clone(),
            max_tokens: self.llm.max_tokens,
            temperature: self.llm.temperature,
            timeout: Duration::from_millis(self.llm.timeout_ms),
        }
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.orchestrator.pause_ms)
    }
}
