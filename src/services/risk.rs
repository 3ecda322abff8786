// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::sync::{Arc, LazyLock};

use futures::{StreamExt, TryStreamExt, stream};
use regex::Regex;
use tracing::debug;

use crate::domain::{
    Assessment, AssessmentOutcome, Classification, EmotionResult, SimilarityScore,
    ToxicityReport,
};
use crate::error::{Error, Result};
use crate::services::inference::{InferenceProvider, InferenceTask};

// Words (with inner apostrophes) and individual punctuation marks
static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:'\w+)*|[^\w\s]").unwrap());

pub fn tokenize(text: &str) -> Vec<&str> {
    WORD_REGEX.find_iter(text).map(|m| m.as_str()).collect()
}

/// Cosine similarity; zero vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::upstream(
            "inference",
            format!("embedding dimensions differ ({} vs {})", a.len(), b.len()),
        ));
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::MissingInput { field });
    }
    Ok(value)
}

/// Thin layer over the inference upstream: validates input, picks the top
/// class and runs the token-level toxicity pass.
#[derive(Clone)]
pub struct RiskFacade {
    provider: Arc<dyn InferenceProvider>,
    max_concurrency: usize,
}

impl RiskFacade {
    pub fn new(provider: Arc<dyn InferenceProvider>, max_concurrency: usize) -> Self {
        Self {
            provider,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub async fn classify(&self, assessment: Assessment<'_>) -> Result<AssessmentOutcome> {
        match assessment {
            Assessment::Sentiment { text } => {
                self.sentiment(text).await.map(AssessmentOutcome::Sentiment)
            }
            Assessment::Emotion { text } => self.emotion(text).await.map(AssessmentOutcome::Emotion),
            Assessment::Toxicity { text, threshold } => self
                .toxicity(text, threshold)
                .await
                .map(AssessmentOutcome::Toxicity),
            Assessment::Similarity { text1, text2 } => self
                .similarity(text1, text2)
                .await
                .map(AssessmentOutcome::Similarity),
        }
    }

    pub async fn sentiment(&self, text: &str) -> Result<Classification> {
        let text = require("text", text)?;
        self.top_class(InferenceTask::Sentiment, text).await
    }

    pub async fn emotion(&self, text: &str) -> Result<EmotionResult> {
        let text = require("text", text)?;
        let top = self.top_class(InferenceTask::Emotion, text).await?;
        Ok(EmotionResult {
            text: text.to_string(),
            emotion: top.label,
            score: top.score,
        })
    }

    /// Flags `text` when its top-class probability exceeds `threshold`, then
    /// scores every token against the same threshold.
    pub async fn toxicity(&self, text: &str, threshold: f32) -> Result<ToxicityReport> {
        let text = require("text", text)?;
        let top = self.top_class(InferenceTask::Toxicity, text).await?;
        debug!(label = %top.label, score = top.score, threshold, "toxicity scored");

        if top.score <= threshold {
            return Ok(ToxicityReport::default());
        }

        let tokens: Vec<String> = tokenize(text).into_iter().map(str::to_owned).collect();
        let provider = Arc::clone(&self.provider);
        let flags: Vec<Option<String>> = stream::iter(tokens)
            .map(move |token| {
                let provider = Arc::clone(&provider);
                async move {
                    let scores = provider.classify(InferenceTask::ToxicWord, &token).await?;
                    let top = top_of(provider.as_ref(), InferenceTask::ToxicWord, &scores)?;
                    Ok::<_, Error>((top.score > threshold).then_some(token))
                }
            })
            .buffered(self.max_concurrency)
            .try_collect()
            .await?;

        let toxicwords: Vec<String> = flags.into_iter().flatten().collect();
        debug!(flagged = toxicwords.len(), "toxic tokens");

        Ok(ToxicityReport {
            result: Some(ToxicityReport::DETECTED.to_string()),
            toxicwords,
        })
    }

    pub async fn similarity(&self, text1: &str, text2: &str) -> Result<SimilarityScore> {
        let text1 = require("text1", text1)?;
        let text2 = require("text2", text2)?;
        let (a, b) = tokio::try_join!(self.provider.embed(text1), self.provider.embed(text2))?;
        Ok(SimilarityScore {
            similarity_score: cosine_similarity(&a, &b)?,
        })
    }

    async fn top_class(&self, task: InferenceTask, text: &str) -> Result<Classification> {
        let scores = self.provider.classify(task, text).await?;
        top_of(self.provider.as_ref(), task, &scores).cloned()
    }
}

fn top_of<'a>(
    provider: &dyn InferenceProvider,
    task: InferenceTask,
    scores: &'a [Classification],
) -> Result<&'a Classification> {
    Classification::top(scores).ok_or_else(|| {
        Error::upstream(provider.name(), format!("no scores returned for {task:?}"))
    })
}
