// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::sync::Arc;

use async_trait::async_trait;

pub mod huggingface;

use crate::config::Config;
use crate::domain::Classification;
use crate::error::Result;

/// Which pretrained model a classification request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceTask {
    Sentiment,
    Emotion,
    Toxicity,
    /// Per-token toxicity, run only after a text is flagged
    ToxicWord,
}

/// Opaque upstream that hosts the pretrained pipelines.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// All class scores the task's model returns for `text`.
    async fn classify(&self, task: InferenceTask, text: &str) -> Result<Vec<Classification>>;

    /// Sentence embedding for `text`.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn name(&self) -> &str;
}

pub fn create_provider(config: &Config) -> Arc<dyn InferenceProvider> {
    Arc::new(huggingface::HuggingFaceProvider::new(
        &config.inference,
        config.timeout_secs,
    ))
}
