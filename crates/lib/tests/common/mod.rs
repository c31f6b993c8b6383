#![allow(dead_code)]
//! # Common Test Utilities
//!
//! This module provides shared utilities for testing, such as mock providers,
//! to ensure tests are isolated and repeatable.

use async_trait::async_trait;
use dotenvy::dotenv;
use mcqgen::providers::ai::AiProvider;
use mcqgen::PromptError;
use std::fmt::Debug;
use std::sync::{Arc, Once, RwLock};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();
    });
}

// --- Mock AI Provider for Logic Testing ---

/// What the mock answers with on its next call.
#[derive(Clone, Debug)]
pub enum MockReply {
    Text(String),
    Error(String),
}

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<(String, String)>>>,
    pub replies: Arc<RwLock<Vec<MockReply>>>,
}

impl MockAiProvider {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            replies: Arc::new(RwLock::new(replies.into_iter().rev().collect())),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![MockReply::Text(text.to_string())])
    }

    pub fn failing(message: &str) -> Self {
        Self::new(vec![MockReply::Error(message.to_string())])
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.call_history.read().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.call_history
            .write()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        match self.replies.write().unwrap().pop() {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error(message)) => Err(PromptError::AiApi(message)),
            None => Ok("Default mock response".to_string()),
        }
    }
}
