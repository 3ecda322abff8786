// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::sync::Arc;

use async_trait::async_trait;

pub mod ollama;
pub mod openai;

use crate::config::{Config, Provider};
use crate::error::Result;

pub const SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Reply your answer in markdown format.";

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Single completion for `prompt`, trimmed.
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn name(&self) -> &str;
}

pub fn create_provider(config: &Config) -> Arc<dyn LlmProvider> {
    match config.provider {
        Provider::Ollama => Arc::new(ollama::OllamaProvider::new(config)),
        Provider::OpenAI => Arc::new(openai::OpenAiProvider::new(config)),
    }
}
