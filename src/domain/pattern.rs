// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::str::FromStr;

use crate::error::Error;

/// Built-in sensitive data categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternCategory {
    CreditCard,
    Ssn,
    AccountBalance,
    Address,
    Age,
    Gender,
}

impl PatternCategory {
    pub const ALL: &'static [PatternCategory] = &[
        Self::CreditCard,
        Self::Ssn,
        Self::AccountBalance,
        Self::Address,
        Self::Age,
        Self::Gender,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::Ssn => "ssn",
            Self::AccountBalance => "account_balance",
            Self::Address => "address",
            Self::Age => "age",
            Self::Gender => "gender",
        }
    }

    /// Case-insensitive; accepts the legacy `<name>_pattern` spelling.
    pub fn parse(name: &str) -> Option<Self> {
        let key = normalize_category_name(name);
        Self::ALL.iter().copied().find(|c| c.as_str() == key)
    }
}

impl std::fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}

/// Lower-cases and strips a trailing `_pattern`, so `SSN_pattern` and `ssn` agree.
pub fn normalize_category_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    match lowered.strip_suffix("_pattern") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => lowered,
    }
}
