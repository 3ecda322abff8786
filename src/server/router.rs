// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use super::AppState;
use super::handlers;

/// Build the full router with every route and the request trace layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::hello).post(handlers::echo))
        // Banking demo
        .route("/accountservice", get(handlers::account_service))
        .route("/processuserpmt", get(handlers::process_user_prompt))
        .route("/assistant", post(handlers::assistant))
        // Risk and quality assessment
        .route("/detectsensitiveinfo", post(handlers::detect_sensitive_info))
        .route("/toxicassessment", post(handlers::toxic_assessment))
        .route("/comparetexts", post(handlers::compare_texts))
        .route("/sentiment", post(handlers::sentiment))
        .route("/emotion", post(handlers::emotion))
        .route("/evaluate", post(handlers::evaluate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
