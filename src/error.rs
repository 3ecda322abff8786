// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Missing required field: {field}")]
    #[diagnostic(code(riskdesk::request::missing_input))]
    MissingInput { field: &'static str },

    #[error("Unknown sensitive data category '{0}'")]
    #[diagnostic(
        code(riskdesk::patterns::invalid_category),
        help("Valid categories: credit_card, ssn, account_balance, address, age, gender")
    )]
    InvalidCategory(String),

    #[error("Invalid amount '{0}'")]
    #[diagnostic(
        code(riskdesk::intent::invalid_amount),
        help("Amounts are non-negative decimals, e.g. $250 or $19.99")
    )]
    InvalidAmount(String),

    #[error("Upstream '{upstream}' unavailable: {message}")]
    #[diagnostic(
        code(riskdesk::upstream::unavailable),
        help("Check the upstream base URL and credentials with: riskdesk config")
    )]
    UpstreamUnavailable { upstream: String, message: String },

    #[error("Malformed request body: {0}")]
    #[diagnostic(code(riskdesk::request::malformed))]
    MalformedBody(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(riskdesk::config::error))]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[cfg(feature = "secure-storage")]
    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(riskdesk::keyring::error),
        help("Check your system keychain configuration")
    )]
    Keyring(String),
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Dialog(e.to_string())
    }
}

impl Error {
    pub(crate) fn upstream(upstream: &str, message: impl Into<String>) -> Self {
        Error::UpstreamUnavailable {
            upstream: upstream.to_string(),
            message: message.into(),
        }
    }

    /// Whether the failure was caused by the caller's request data.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MissingInput { .. }
                | Error::InvalidCategory(_)
                | Error::InvalidAmount(_)
                | Error::MalformedBody(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
