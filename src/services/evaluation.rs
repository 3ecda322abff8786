// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ToxicityReport;
use crate::error::{Error, Result};
use crate::services::patterns::PatternRegistry;
use crate::services::risk::RiskFacade;

/// Reference answers and thresholds an LLM output is judged against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseCase {
    #[serde(default)]
    pub validated_output: Vec<String>,
    pub similarity_threshold: f32,
    /// Toxicity threshold
    pub tolerance_threshold: f32,
    /// Sensitive data categories to scan for
    #[serde(default)]
    pub sensitive_info: Vec<String>,
}

impl UseCase {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityFinding {
    pub comparable_verified_output: String,
    pub similarity_score: f32,
}

impl Default for SimilarityFinding {
    fn default() -> Self {
        Self {
            comparable_verified_output: "none".into(),
            similarity_score: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitiveFinding {
    pub sensitive_info_name: String,
    pub sensitive_info_value: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub llm_output: String,
    pub similarity_finder_result: SimilarityFinding,
    pub sentiment: String,
    pub emotion: String,
    pub toxic_content: ToxicityReport,
    pub sensitive_data: Vec<SensitiveFinding>,
}

/// Runs every quality and risk check on one LLM output.
#[derive(Clone)]
pub struct Evaluator {
    risk: RiskFacade,
    patterns: Arc<PatternRegistry>,
}

impl Evaluator {
    pub fn new(risk: RiskFacade, patterns: Arc<PatternRegistry>) -> Self {
        Self { risk, patterns }
    }

    pub async fn evaluate(&self, output: &str, usecase: &UseCase) -> Result<EvaluationReport> {
        if output.trim().is_empty() {
            return Err(Error::MissingInput { field: "text" });
        }

        // Fail on a bad category before spending any upstream calls
        let sensitive_data = usecase
            .sensitive_info
            .iter()
            .map(|name| {
                Ok(SensitiveFinding {
                    sensitive_info_name: name.clone(),
                    sensitive_info_value: self.patterns.find(name, output)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let (sentiment, emotion, toxic_content) = tokio::try_join!(
            self.risk.sentiment(output),
            self.risk.emotion(output),
            self.risk.toxicity(output, usecase.tolerance_threshold),
        )?;

        let similarity_finder_result = self
            .closest_validated(output, &usecase.validated_output, usecase.similarity_threshold)
            .await?;

        debug!(
            score = similarity_finder_result.similarity_score,
            toxic = toxic_content.is_toxic(),
            "output evaluated"
        );

        Ok(EvaluationReport {
            llm_output: output.to_string(),
            similarity_finder_result,
            sentiment: sentiment.label,
            emotion: emotion.emotion,
            toxic_content,
            sensitive_data,
        })
    }

    // The last validated output above the threshold wins.
    async fn closest_validated(
        &self,
        output: &str,
        validated: &[String],
        threshold: f32,
    ) -> Result<SimilarityFinding> {
        let mut finding = SimilarityFinding::default();
        for candidate in validated {
            let score = self.risk.similarity(output, candidate).await?.similarity_score;
            if score > threshold {
                finding = SimilarityFinding {
                    comparable_verified_output: candidate.clone(),
                    similarity_score: score,
                };
            }
        }
        Ok(finding)
    }
}
