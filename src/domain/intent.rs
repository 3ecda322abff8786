// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use rust_decimal::Decimal;
use serde::Serialize;

/// Banking operation requested by a prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceKind {
    Transfer,
    Subscribe,
    Add,
    Remove,
    #[default]
    Unknown,
}

impl ServiceKind {
    /// Keyword scan order. Later hits overwrite earlier ones.
    pub const KEYWORDS: [(&'static str, ServiceKind); 4] = [
        ("transfer", Self::Transfer),
        ("subscribe", Self::Subscribe),
        ("add", Self::Add),
        ("remove", Self::Remove),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transfer => "TRANSFER",
            Self::Subscribe => "SUBSCRIBE",
            Self::Add => "ADD",
            Self::Remove => "REMOVE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Case-insensitive; anything unrecognised is `Unknown`.
    pub fn parse(s: &str) -> Self {
        let lowered = s.trim().to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| *keyword == lowered)
            .map(|(_, kind)| *kind)
            .unwrap_or(Self::Unknown)
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured form of a free-text banking request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Intent {
    pub service: ServiceKind,
    /// Transfer receiver, or the user to add/remove
    pub receiver_or_user: Option<String>,
    pub subscription_service: Option<String>,
    pub amount: Option<Decimal>,
}

/// Reply produced by the service dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchResult {
    #[serde(rename = "result")]
    pub message: String,
}

impl DispatchResult {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
