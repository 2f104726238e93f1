//! Configuration loading and validation for SnapSolve.
//!
//! Loads configuration from `~/.snapsolve/config.toml` with environment
//! variable overrides. The orchestration engine reads this as-is on each
//! call; a config change requires no internal state reset beyond
//! re-reading.

use serde::{Deserialize, Serialize};
use snapsolve_core::TaskKind;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.snapsolve/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider name (e.g. "openai", "anthropic").
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Provider base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model used for problem extraction.
    #[serde(default = "default_extraction_model")]
    pub extraction_model: String,

    /// Model used for solution generation.
    #[serde(default = "default_solution_model")]
    pub solution_model: String,

    /// Model used for debug analysis.
    #[serde(default = "default_debug_model")]
    pub debug_model: String,

    /// Preferred output language for generated code.
    #[serde(default = "default_language")]
    pub language: String,

    /// Maximum attempts per request before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Debug memory configuration.
    #[serde(default)]
    pub memory: MemoryConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_extraction_model() -> String {
    "gpt-4o-mini".into()
}
fn default_solution_model() -> String {
    "gpt-4o".into()
}
fn default_debug_model() -> String {
    "gpt-4o".into()
}
fn default_language() -> String {
    "python".into()
}
fn default_max_attempts() -> u32 {
    3
}

/// Debug memory store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Where prior solution attempts are persisted.
    #[serde(default = "default_memory_path")]
    pub path: PathBuf,

    /// How many attempts to retain.
    #[serde(default = "default_retention")]
    pub retention: usize,
}

fn default_memory_path() -> PathBuf {
    AppConfig::config_dir().join("debug_memory.json")
}
fn default_retention() -> usize {
    10
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            path: default_memory_path(),
            retention: default_retention(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            extraction_model: default_extraction_model(),
            solution_model: default_solution_model(),
            debug_model: default_debug_model(),
            language: default_language(),
            max_attempts: default_max_attempts(),
            memory: MemoryConfig::default(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("extraction_model", &self.extraction_model)
            .field("solution_model", &self.solution_model)
            .field("debug_model", &self.debug_model)
            .field("language", &self.language)
            .field("max_attempts", &self.max_attempts)
            .field("memory", &self.memory)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.snapsolve/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `SNAPSOLVE_API_KEY` (highest priority)
    /// - `OPENAI_API_KEY`
    /// - `ANTHROPIC_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("SNAPSOLVE_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok());
        }

        if let Ok(provider) = std::env::var("SNAPSOLVE_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("SNAPSOLVE_MODEL") {
            config.solution_model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".snapsolve")
    }

    /// The model configured for a given task kind.
    pub fn model_for(&self, task: TaskKind) -> &str {
        match task {
            TaskKind::Extraction => &self.extraction_model,
            TaskKind::Solution => &self.solution_model,
            TaskKind::Debug => &self.debug_model,
        }
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "max_attempts must be at least 1".into(),
            ));
        }
        if self.memory.retention == 0 {
            return Err(ConfigError::ValidationError(
                "memory.retention must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}
