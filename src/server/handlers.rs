// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

//! Request handlers. Each one validates its input, calls one service and
//! returns JSON; errors render through `IntoResponse for Error`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use super::AppState;
use crate::domain::{
    Assessment, AssessmentOutcome, AssistantReply, DispatchResult, Intent, ServiceKind,
};
use crate::error::{Error, Result};
use crate::services::evaluation::{EvaluationReport, UseCase};
use crate::services::intent::parse_amount;

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| Error::MalformedBody(rejection.body_text()))
}

/// Absent and blank values both count as missing.
fn required(field: &'static str, value: Option<String>) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(Error::MissingInput { field })
}

// ─── Greeting ─────────────────────────────────────────────────────────────────

pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "hello world" }))
}

pub async fn echo(
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let data = body(payload)?;
    Ok((StatusCode::CREATED, Json(json!({ "data": data }))))
}

// ─── Banking demo ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AccountServiceQuery {
    pub servicetype: Option<String>,
    /// Accepted for compatibility; the demo has a single account holder
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub service: Option<String>,
    pub amount: Option<String>,
    pub user: Option<String>,
}

impl AccountServiceQuery {
    /// TRANSFER reads `receiver`; ADD and REMOVE read `user`.
    pub fn into_intent(self) -> Result<Intent> {
        let service = self
            .servicetype
            .as_deref()
            .map(ServiceKind::parse)
            .unwrap_or_default();

        let amount = self
            .amount
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(parse_amount)
            .transpose()?;

        let receiver_or_user = match service {
            ServiceKind::Transfer => self.receiver,
            _ => self.user,
        }
        .filter(|name| !name.trim().is_empty());

        Ok(Intent {
            service,
            receiver_or_user,
            subscription_service: self.service.filter(|s| !s.trim().is_empty()),
            amount,
        })
    }
}

pub async fn account_service(
    State(state): State<AppState>,
    Query(query): Query<AccountServiceQuery>,
) -> Result<Json<DispatchResult>> {
    let intent = query.into_intent()?;
    Ok(Json(state.dispatcher.dispatch(&intent)))
}

#[derive(Debug, Deserialize)]
pub struct PromptQuery {
    pub prompt: Option<String>,
}

pub async fn process_user_prompt(
    State(state): State<AppState>,
    Query(query): Query<PromptQuery>,
) -> Result<Json<DispatchResult>> {
    let prompt = required("prompt", query.prompt)?;
    let intent = state.extractor.extract(&prompt)?;
    Ok(Json(state.dispatcher.dispatch(&intent)))
}

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub prompt: Option<String>,
    #[serde(default = "default_with_context")]
    pub with_context: bool,
}

fn default_with_context() -> bool {
    true
}

pub async fn assistant(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AssistantRequest>, JsonRejection>,
) -> Result<Json<AssistantReply>> {
    let request = body(payload)?;
    let prompt = required("prompt", request.prompt)?;
    let reply = state.assistant.assist(&prompt, request.with_context).await?;
    Ok(Json(reply))
}

// ─── Risk and quality assessment ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SensitiveInfoRequest {
    pub text: Option<String>,
    pub sensitive_data_name: Option<String>,
}

pub async fn detect_sensitive_info(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SensitiveInfoRequest>, JsonRejection>,
) -> Result<Json<Vec<String>>> {
    let request = body(payload)?;
    let text = required("text", request.text)?;
    let name = required("sensitive_data_name", request.sensitive_data_name)?;
    Ok(Json(state.patterns.find(&name, &text)?))
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToxicityRequest {
    pub text: Option<String>,
    pub threshold: Option<f32>,
}

pub async fn toxic_assessment(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ToxicityRequest>, JsonRejection>,
) -> Result<Json<AssessmentOutcome>> {
    let request = body(payload)?;
    let text = required("text", request.text)?;
    let threshold = request
        .threshold
        .ok_or(Error::MissingInput { field: "threshold" })?;
    let outcome = state
        .risk
        .classify(Assessment::Toxicity {
            text: &text,
            threshold,
        })
        .await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub text1: Option<String>,
    pub text2: Option<String>,
}

pub async fn compare_texts(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<AssessmentOutcome>> {
    let request = body(payload)?;
    let text1 = required("text1", request.text1)?;
    let text2 = required("text2", request.text2)?;
    let outcome = state
        .risk
        .classify(Assessment::Similarity {
            text1: &text1,
            text2: &text2,
        })
        .await?;
    Ok(Json(outcome))
}

pub async fn sentiment(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<AssessmentOutcome>> {
    let text = required("text", body(payload)?.text)?;
    let outcome = state.risk.classify(Assessment::Sentiment { text: &text }).await?;
    Ok(Json(outcome))
}

pub async fn emotion(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<AssessmentOutcome>> {
    let text = required("text", body(payload)?.text)?;
    let outcome = state.risk.classify(Assessment::Emotion { text: &text }).await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub text: Option<String>,
    pub usecase: UseCase,
}

pub async fn evaluate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<EvaluationReport>> {
    let request = body(payload)?;
    let text = required("text", request.text)?;
    let report = state.evaluator.evaluate(&text, &request.usecase).await?;
    Ok(Json(report))
}
