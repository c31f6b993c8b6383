//! # AI Provider Factory
//!
//! This module centralizes the logic for creating AI provider instances from a
//! [`ProviderConfig`]. Any consumer (server, tests) builds providers through it, so
//! credential checks happen once, at construction time.

use crate::{
    errors::PromptError,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider, RequestOptions},
    types::ProviderConfig,
};
use std::time::Duration;
use tracing::info;

/// Resolves the request options of a provider, filling in library defaults.
pub fn request_options(config: &ProviderConfig) -> RequestOptions {
    let defaults = RequestOptions::default();
    RequestOptions {
        temperature: config.temperature.unwrap_or(defaults.temperature),
        timeout: config
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout),
    }
}

/// Creates an AI provider instance from its configuration.
///
/// - `gemini` requires a non-empty `api_key`; the URL defaults to the model's
///   `generateContent` endpoint.
/// - `local` requires an `api_url`; the key is optional.
pub fn create_provider(
    name: &str,
    config: &ProviderConfig,
) -> Result<Box<dyn AiProvider>, PromptError> {
    let options = request_options(config);
    let provider: Box<dyn AiProvider> = match config.provider.as_str() {
        "gemini" => {
            let api_key = config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| PromptError::MissingApiKey(name.to_string()))?;
            let api_url = config
                .api_url
                .clone()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| GeminiProvider::endpoint_for_model(&config.model_name));
            info!(provider = %name, %api_url, "Configuring Gemini provider.");
            Box::new(GeminiProvider::new(api_url, api_key, options)?)
        }
        "local" => {
            let api_url = config
                .api_url
                .clone()
                .filter(|url| !url.trim().is_empty())
                .ok_or_else(|| {
                    PromptError::InvalidProviderConfig(format!(
                        "api_url is required for local provider '{name}'. Please set LOCAL_AI_API_URL in your .env file."
                    ))
                })?;
            info!(provider = %name, %api_url, "Configuring local AI provider.");
            Box::new(LocalAiProvider::new(
                api_url,
                config.api_key.clone(),
                Some(config.model_name.clone()),
                options,
            )?)
        }
        other => {
            return Err(PromptError::InvalidProviderConfig(format!(
                "Unsupported AI provider type '{other}' for provider '{name}'"
            )))
        }
    };
    Ok(provider)
}
