// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{InferenceProvider, InferenceTask};
use crate::config::InferenceConfig;
use crate::domain::Classification;
use crate::error::{Error, Result};

const UPSTREAM: &str = "inference";

/// Client for the Hugging Face Inference API (`POST {base}/models/{model}`).
pub struct HuggingFaceProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    sentiment_model: String,
    emotion_model: String,
    toxicity_model: String,
    toxic_word_model: String,
    embedding_model: String,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

// Text classification answers `[[{label, score}, ...]]` for a single input,
// some deployments drop the outer list.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Batched(Vec<Vec<Classification>>),
    Single(Vec<Classification>),
}

// Sentence-transformers return one pooled vector; plain encoders return one
// vector per token, which we mean-pool.
#[derive(Deserialize)]
#[serde(untagged)]
enum EmbeddingResponse {
    Pooled(Vec<f32>),
    PerToken(Vec<Vec<f32>>),
}

impl HuggingFaceProvider {
    pub fn new(config: &InferenceConfig, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            // Sanitize: remove trailing slashes to avoid //models
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().map(SecretString::from),
            sentiment_model: config.sentiment_model.clone(),
            emotion_model: config.emotion_model.clone(),
            toxicity_model: config.toxicity_model.clone(),
            toxic_word_model: config.toxic_word_model.clone(),
            embedding_model: config.embedding_model.clone(),
        }
    }

    fn model_for(&self, task: InferenceTask) -> &str {
        match task {
            InferenceTask::Sentiment => &self.sentiment_model,
            InferenceTask::Emotion => &self.emotion_model,
            InferenceTask::Toxicity => &self.toxicity_model,
            InferenceTask::ToxicWord => &self.toxic_word_model,
        }
    }

    async fn post<T: DeserializeOwned>(&self, model: &str, text: &str) -> Result<T> {
        let url = format!("{}/models/{}", self.base_url, model);

        let mut request = self.client.post(&url).json(&InferenceRequest {
            inputs: text,
            options: RequestOptions {
                wait_for_model: true,
            },
        });
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::upstream(UPSTREAM, "request timed out")
            } else {
                Error::upstream(UPSTREAM, e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(
                UPSTREAM,
                format!("HTTP {status} from {model}: {body}"),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::upstream(UPSTREAM, format!("unexpected response from {model}: {e}")))
    }
}

#[async_trait]
impl InferenceProvider for HuggingFaceProvider {
    async fn classify(&self, task: InferenceTask, text: &str) -> Result<Vec<Classification>> {
        let model = self.model_for(task);
        let scores = match self.post::<ClassificationResponse>(model, text).await? {
            ClassificationResponse::Batched(mut batches) => {
                if batches.is_empty() {
                    Vec::new()
                } else {
                    batches.swap_remove(0)
                }
            }
            ClassificationResponse::Single(scores) => scores,
        };
        Ok(scores)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self
            .post::<EmbeddingResponse>(&self.embedding_model, text)
            .await?
        {
            EmbeddingResponse::Pooled(vector) => Ok(vector),
            EmbeddingResponse::PerToken(rows) => mean_pool(&rows),
        }
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}

fn mean_pool(rows: &[Vec<f32>]) -> Result<Vec<f32>> {
    let Some(first) = rows.first() else {
        return Err(Error::upstream(UPSTREAM, "empty embedding"));
    };
    let dim = first.len();
    let mut pooled = vec![0.0_f32; dim];
    for row in rows {
        if row.len() != dim {
            return Err(Error::upstream(UPSTREAM, "ragged token embeddings"));
        }
        for (acc, v) in pooled.iter_mut().zip(row) {
            *acc += v;
        }
    }
    let n = rows.len() as f32;
    pooled.iter_mut().for_each(|v| *v /= n);
    Ok(pooled)
}
