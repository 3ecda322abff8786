// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use serde::{Deserialize, Serialize};

/// One class score returned by an upstream classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub score: f32,
}

impl Classification {
    /// Highest-scoring entry; `None` for an empty slice.
    pub fn top(scores: &[Classification]) -> Option<&Classification> {
        scores.iter().max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    pub text: String,
    pub emotion: String,
    pub score: f32,
}

/// Toxicity verdict. Below threshold only an empty word list is returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToxicityReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default)]
    pub toxicwords: Vec<String>,
}

impl ToxicityReport {
    pub const DETECTED: &'static str = "Toxic Content Detected";

    pub fn is_toxic(&self) -> bool {
        self.result.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    pub similarity_score: f32,
}

/// A single assessment request, resolved once into the matching upstream call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Assessment<'a> {
    Sentiment { text: &'a str },
    Emotion { text: &'a str },
    Toxicity { text: &'a str, threshold: f32 },
    Similarity { text1: &'a str, text2: &'a str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AssessmentOutcome {
    Sentiment(Classification),
    Emotion(EmotionResult),
    Toxicity(ToxicityReport),
    Similarity(SimilarityScore),
}

/// Single-turn assistant answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}
