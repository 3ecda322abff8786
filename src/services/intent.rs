// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::IntentConfig;
use crate::domain::{Intent, ReferenceData, ServiceKind};
use crate::error::{Error, Result};

/// Turns free-text banking prompts into an [`Intent`] by substring search.
///
/// Every scan keeps the *last* hit in list order. With `skip_leading_match`
/// a term found only at index 0 of the prompt does not count.
#[derive(Debug, Clone)]
pub struct IntentExtractor {
    reference: Arc<ReferenceData>,
    skip_leading_match: bool,
}

impl IntentExtractor {
    pub fn new(reference: Arc<ReferenceData>, skip_leading_match: bool) -> Self {
        Self {
            reference,
            skip_leading_match,
        }
    }

    pub fn from_config(config: &IntentConfig) -> Self {
        Self::new(
            Arc::new(ReferenceData::from_config(config)),
            config.skip_leading_match,
        )
    }

    pub fn reference(&self) -> &Arc<ReferenceData> {
        &self.reference
    }

    pub fn extract(&self, prompt: &str) -> Result<Intent> {
        let lowered = prompt.to_lowercase();
        let mut intent = Intent::default();

        for (keyword, kind) in ServiceKind::KEYWORDS {
            if self.hit(&lowered, keyword) {
                intent.service = kind;
            }
        }

        intent.receiver_or_user = self.last_hit(&lowered, self.reference.users());
        intent.subscription_service =
            self.last_hit(&lowered, self.reference.subscription_services());

        if let Some(token) = lowered
            .split_whitespace()
            .rev()
            .find(|word| word.starts_with('$'))
        {
            intent.amount = Some(parse_amount(token)?);
        }

        debug!(
            service = %intent.service,
            has_receiver = intent.receiver_or_user.is_some(),
            has_amount = intent.amount.is_some(),
            "intent extracted"
        );
        Ok(intent)
    }

    fn hit(&self, haystack: &str, needle: &str) -> bool {
        match haystack.find(needle) {
            Some(0) => !self.skip_leading_match,
            Some(_) => true,
            None => false,
        }
    }

    fn last_hit(&self, haystack: &str, candidates: &[String]) -> Option<String> {
        candidates
            .iter()
            .rev()
            .find(|c| self.hit(haystack, &c.to_lowercase()))
            .cloned()
    }
}

/// Parses `$12.50`-style tokens (surrounding `$` signs are ignored).
pub fn parse_amount(token: &str) -> Result<Decimal> {
    let raw = token.trim_matches('$');
    let amount = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| Error::InvalidAmount(token.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::InvalidAmount(token.to_string()));
    }
    Ok(amount)
}
