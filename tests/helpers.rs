// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use riskdesk::config::Config;
use riskdesk::domain::Classification;
use riskdesk::error::{Error, Result};
use riskdesk::server::AppState;
use riskdesk::services::inference::{InferenceProvider, InferenceTask};
use riskdesk::services::llm::LlmProvider;
use riskdesk::services::patterns::PatternRegistry;

/// Build a classification list from `(label, score)` pairs
#[allow(dead_code)]
pub fn scores(pairs: &[(&str, f32)]) -> Vec<Classification> {
    pairs
        .iter()
        .map(|(label, score)| Classification {
            label: label.to_string(),
            score: *score,
        })
        .collect()
}

/// In-memory inference upstream with canned answers per task.
#[allow(dead_code)]
#[derive(Default)]
pub struct StubInference {
    pub sentiment: Vec<Classification>,
    pub emotion: Vec<Classification>,
    pub toxicity: Vec<Classification>,
    /// Tokens scored 0.99 by the per-token model; everything else scores 0.01
    pub toxic_words: Vec<String>,
    /// Embedding per exact text; unknown texts embed to `[1.0, 0.0]`
    pub embeddings: HashMap<String, Vec<f32>>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl StubInference {
    pub fn new() -> Self {
        Self {
            sentiment: scores(&[("POSITIVE", 0.98), ("NEGATIVE", 0.02)]),
            emotion: scores(&[("joy", 0.91), ("anger", 0.05), ("neutral", 0.04)]),
            toxicity: scores(&[("toxic", 0.02)]),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceProvider for StubInference {
    async fn classify(&self, task: InferenceTask, text: &str) -> Result<Vec<Classification>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::UpstreamUnavailable {
                upstream: "inference".into(),
                message: "connection refused".into(),
            });
        }
        Ok(match task {
            InferenceTask::Sentiment => self.sentiment.clone(),
            InferenceTask::Emotion => self.emotion.clone(),
            InferenceTask::Toxicity => self.toxicity.clone(),
            InferenceTask::ToxicWord => {
                let toxic = self.toxic_words.iter().any(|w| w == text);
                scores(&[("offensive", if toxic { 0.99 } else { 0.01 })])
            }
        })
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::UpstreamUnavailable {
                upstream: "inference".into(),
                message: "connection refused".into(),
            });
        }
        Ok(self
            .embeddings
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![1.0, 0.0]))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// LLM that answers every prompt with the same text and records the last prompt.
#[allow(dead_code)]
pub struct StubLlm {
    pub answer: String,
    pub last_prompt: std::sync::Mutex<Option<String>>,
}

#[allow(dead_code)]
impl StubLlm {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            last_prompt: std::sync::Mutex::new(None),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }
        Ok(self.answer.clone())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// App state backed by stubs instead of real upstreams
#[allow(dead_code)]
pub fn stub_state(inference: StubInference, llm: StubLlm) -> AppState {
    AppState::new(
        &Config::default(),
        PatternRegistry::builtin(),
        Arc::new(inference),
        Arc::new(llm),
    )
}
