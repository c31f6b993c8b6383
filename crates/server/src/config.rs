//! # Application Configuration
//!
//! This module defines the configuration structure for the `mcqgen-server` and
//! loads it in layers: library defaults, a YAML file (`config.yml` or the
//! `config.{AI_PROVIDER}.yml` fallback), an optional `prompt.yml`, and finally
//! environment variables.

use config::{
    Config as ConfigBuilder, Environment, File, FileFormat, Value as ConfigValue,
    ValueKind as ConfigValueKind,
};
use mcqgen::prompts::core::DEFAULT_MAX_CONTEXT_CHARS;
use mcqgen::prompts::tasks::{MCQ_GENERATION_SYSTEM_PROMPT, MCQ_GENERATION_USER_PROMPT};
use mcqgen::{Difficulty, ProviderConfig};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// The task that drives `/generate_quiz`.
pub const MCQ_GENERATION_TASK: &str = "mcq_generation";

/// The provider the default task points at.
pub const DEFAULT_PROVIDER: &str = "default";

#[derive(Error, Debug)]
pub enum ConfigError {
    /// An error from the underlying `config` crate or a malformed file.
    #[error("Configuration error: {0}")]
    General(String),
    /// A required configuration file was not found.
    #[error("{0}")]
    NotFound(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Overridden by the `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// A map of named, reusable AI provider configurations.
    pub providers: HashMap<String, ProviderConfig>,
    /// A map of tasks, each specifying a provider and prompts.
    pub tasks: HashMap<String, TaskConfig>,
    /// Limits and defaults for quiz generation.
    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_port() -> u16 {
    5000
}

/// Defines the prompts and provider for a specific application task.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TaskConfig {
    /// The key of the provider to use from the `providers` map.
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub user_prompt: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Document characters sent to the model; the rest is cut off.
    pub max_context_chars: usize,
    /// The largest accepted `numQuestions`.
    pub max_questions: u32,
    pub default_difficulty: Difficulty,
    pub default_num_questions: u32,
    /// The request body limit for uploads, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            max_questions: 50,
            default_difficulty: Difficulty::Medium,
            default_num_questions: 5,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Builds the default task table from the library prompts, the base layer of configuration.
fn build_default_tasks() -> HashMap<String, ConfigValue> {
    let tasks = [(
        MCQ_GENERATION_TASK,
        (
            DEFAULT_PROVIDER,
            MCQ_GENERATION_SYSTEM_PROMPT,
            MCQ_GENERATION_USER_PROMPT,
        ),
    )];

    tasks
        .into_iter()
        .map(|(name, (provider, sys, user))| {
            let mut table = HashMap::new();
            table.insert("provider".to_string(), ConfigValue::from(provider));
            table.insert("system_prompt".to_string(), ConfigValue::from(sys));
            table.insert("user_prompt".to_string(), ConfigValue::from(user));
            (
                name.to_string(),
                ConfigValue::new(None, ConfigValueKind::Table(table)),
            )
        })
        .collect()
}

/// Reads a file and substitutes `${VAR}` placeholders from the environment.
/// Unset variables become empty strings. Returns `Ok(None)` if the file does not exist.
fn read_and_substitute(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::General(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded_content.into_owned()))
}

/// The directory holding `config.yml` and `prompt.yml`: `MCQGEN_CONFIG_DIR` if
/// set, otherwise the server crate's directory.
fn config_dir() -> String {
    env::var("MCQGEN_CONFIG_DIR").unwrap_or_else(|_| env!("CARGO_MANIFEST_DIR").to_string())
}

/// Loads the application configuration from files and environment variables.
///
/// - Top-level keys like `port` are overridden by `PORT`.
/// - Nested keys are overridden by `MCQGEN_...` variables, e.g.
///   `MCQGEN_GENERATION__MAX_QUESTIONS=20`.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = config_dir();
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults from the library.
        .set_default("tasks", build_default_tasks())?;

    // Layer 2: Main Config (with Fallback)
    let main_config_path = if let Some(override_path) = config_path_override {
        override_path.to_string()
    } else {
        let user_config_path = format!("{base_path}/config.yml");
        if Path::new(&user_config_path).exists() {
            info!("Loading user-defined configuration from '{user_config_path}'.");
            user_config_path
        } else {
            let provider = env::var("AI_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
            let fallback_path = format!("{base_path}/config.{provider}.yml");
            info!("'{user_config_path}' not found. Falling back to '{fallback_path}' based on AI_PROVIDER='{provider}'.");
            fallback_path
        }
    };

    let main_content = read_and_substitute(Path::new(&main_config_path))?
        .ok_or_else(|| ConfigError::NotFound(format!("Main config file not found at '{main_config_path}'. Please ensure 'config.yml' exists or your AI_PROVIDER is set to load a valid template ('gemini' or 'local').")))?;
    builder = builder.add_source(File::from_str(&main_content, FileFormat::Yaml));

    // Layer 3: User Prompt Overrides (Optional)
    let user_prompt_path = format!("{base_path}/prompt.yml");
    if let Some(user_prompts_content) = read_and_substitute(Path::new(&user_prompt_path))? {
        info!("Loading user prompt overrides from '{user_prompt_path}'.");
        builder = builder.add_source(File::from_str(&user_prompts_content, FileFormat::Yaml));
    }

    let settings = builder
        // Layer 4: Top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 5: Prefixed variables for nested overrides.
        .add_source(
            Environment::with_prefix("MCQGEN")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
