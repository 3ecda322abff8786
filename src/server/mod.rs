// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

//! HTTP surface: banking dispatcher, sensitive-data scanner and the risk
//! assessment pass-through routes.

use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub mod handlers;
pub mod router;

pub use router::build_router;

use crate::config::Config;
use crate::domain::ReferenceData;
use crate::error::{Error, Result};
use crate::services::assistant::Assistant;
use crate::services::dispatcher::ServiceDispatcher;
use crate::services::evaluation::Evaluator;
use crate::services::inference::{self, InferenceProvider};
use crate::services::intent::IntentExtractor;
use crate::services::llm::{self, LlmProvider};
use crate::services::patterns::PatternRegistry;
use crate::services::risk::RiskFacade;

/// Services shared by every request. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub extractor: IntentExtractor,
    pub dispatcher: ServiceDispatcher,
    pub patterns: Arc<PatternRegistry>,
    pub risk: RiskFacade,
    pub assistant: Assistant,
    pub evaluator: Evaluator,
}

impl AppState {
    pub fn new(
        config: &Config,
        patterns: PatternRegistry,
        inference: Arc<dyn InferenceProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let reference = Arc::new(ReferenceData::from_config(&config.intent));
        let extractor = IntentExtractor::new(Arc::clone(&reference), config.intent.skip_leading_match);
        let dispatcher = ServiceDispatcher::new(reference);
        let patterns = Arc::new(patterns);
        let risk = RiskFacade::new(inference, config.inference.max_concurrency);

        Self {
            assistant: Assistant::new(llm, extractor.clone(), dispatcher.clone()),
            evaluator: Evaluator::new(risk.clone(), Arc::clone(&patterns)),
            extractor,
            dispatcher,
            patterns,
            risk,
        }
    }

    /// Wires the configured upstream clients.
    pub fn from_config(config: &Config) -> Result<Self> {
        let patterns = PatternRegistry::with_custom(&config.patterns.custom)?;
        Ok(Self::new(
            config,
            patterns,
            inference::create_provider(config),
            llm::create_provider(config),
        ))
    }
}

pub async fn serve(state: AppState, bind_addr: &str, cancel: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!(addr = %listener.local_addr()?, "riskdesk listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("riskdesk stopped");
    Ok(())
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            e if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            Error::UpstreamUnavailable { upstream, message } => {
                warn!(upstream = %upstream, error = %message, "upstream call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Upstream '{upstream}' is unavailable, please try again later"),
                )
            }
            e => {
                error!(error = %e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
