//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. Provider construction happens here, so missing
//! credentials stop the server before it accepts a single request.

use crate::config::{AppConfig, MCQ_GENERATION_TASK};
use mcqgen::{providers::factory::create_provider, McqFieldParser, McqGenerator};
use std::sync::Arc;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// The generator for the `mcq_generation` task, bound to its provider and prompts.
    pub generator: Arc<McqGenerator>,
    /// Builds the optional structured view of each record.
    pub field_parser: Arc<McqFieldParser>,
}

/// Builds the shared application state from the configuration.
///
/// Resolves the `mcq_generation` task, instantiates the provider it names and
/// wires both into an [`McqGenerator`].
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let task = config.tasks.get(MCQ_GENERATION_TASK).ok_or_else(|| {
        anyhow::anyhow!("Configuration for task '{MCQ_GENERATION_TASK}' not found.")
    })?;
    let provider_name = task.provider.as_deref().ok_or_else(|| {
        anyhow::anyhow!("Resolved task '{MCQ_GENERATION_TASK}' is missing required 'provider' field")
    })?;
    let system_prompt = task.system_prompt.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "Resolved task '{MCQ_GENERATION_TASK}' is missing required 'system_prompt' field"
        )
    })?;
    let user_prompt = task.user_prompt.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "Resolved task '{MCQ_GENERATION_TASK}' is missing required 'user_prompt' field"
        )
    })?;

    let provider_config = config.providers.get(provider_name).ok_or_else(|| {
        anyhow::anyhow!(
            "Provider '{provider_name}' used by task '{MCQ_GENERATION_TASK}' not found in providers map."
        )
    })?;
    let ai_provider = create_provider(provider_name, provider_config)?;

    let generator = McqGenerator::builder()
        .ai_provider(ai_provider)
        .system_prompt(system_prompt)
        .user_prompt_template(user_prompt)
        .max_context_chars(config.generation.max_context_chars)
        .build()?;
    info!(
        provider = %provider_name,
        model = %provider_config.model_name,
        "Initialized MCQ generator."
    );

    Ok(AppState {
        config: Arc::new(config),
        generator: Arc::new(generator),
        field_parser: Arc::new(McqFieldParser::new()?),
    })
}
