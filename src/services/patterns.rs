// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::domain::{PatternCategory, normalize_category_name};
use crate::error::{Error, Result};

static BUILTIN_PATTERNS: LazyLock<Vec<(PatternCategory, Regex)>> = LazyLock::new(|| {
    vec![
        (
            PatternCategory::CreditCard,
            Regex::new(r"\b(?:\d[ -]*?){13,16}\b").unwrap(),
        ),
        (
            PatternCategory::Ssn,
            Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap(),
        ),
        (
            PatternCategory::AccountBalance,
            Regex::new(
                r"(?i)\b(?:\d+(?:,\d{3})*(?:\.\d{2})?|one|two|three|four|five|six|seven|eight|nine|ten)\b",
            )
            .unwrap(),
        ),
        (
            PatternCategory::Address,
            Regex::new(
                r"(?i)\d{1,4} [\w\s]{1,20} (?:street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|drive|dr|court|ct|circle|cir|trail|trl|parkway|pkwy)\b",
            )
            .unwrap(),
        ),
        // 1..=100; "100" first so it is not cut short at "10"
        (
            PatternCategory::Age,
            Regex::new(r"\b(?:100|[1-9]\d?)\b").unwrap(),
        ),
        (
            PatternCategory::Gender,
            Regex::new(r"(?i)\b(?:male|female|man|woman|boy|girl|he|she|him|her|his|hers)\b")
                .unwrap(),
        ),
    ]
});

/// Every non-overlapping match of a built-in category, in order of occurrence.
pub fn find_matches(category: PatternCategory, text: &str) -> Vec<String> {
    BUILTIN_PATTERNS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, regex)| collect_matches(regex, text))
        .unwrap_or_default()
}

fn collect_matches(regex: &Regex, text: &str) -> Vec<String> {
    regex
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

enum Matcher {
    Builtin(PatternCategory),
    Custom(Regex),
}

/// Named sensitive-data matchers: the built-in categories plus any custom
/// rules registered at startup. Lookups never touch the matcher code itself,
/// so new categories only need a `register` call.
pub struct PatternRegistry {
    matchers: BTreeMap<String, Matcher>,
}

impl PatternRegistry {
    pub fn builtin() -> Self {
        let matchers = PatternCategory::ALL
            .iter()
            .map(|c| (c.as_str().to_string(), Matcher::Builtin(*c)))
            .collect();
        Self { matchers }
    }

    /// Built-ins plus `custom` (name -> regex). Custom names may not shadow built-ins.
    pub fn with_custom(custom: &BTreeMap<String, String>) -> Result<Self> {
        let mut registry = Self::builtin();
        for (name, pattern) in custom {
            registry.register(name, pattern)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, name: &str, pattern: &str) -> Result<()> {
        let key = normalize_category_name(name);
        if key.is_empty() {
            return Err(Error::Config("pattern name cannot be empty".into()));
        }
        if PatternCategory::parse(&key).is_some() {
            return Err(Error::Config(format!(
                "pattern '{key}' would shadow a built-in category"
            )));
        }
        let regex = Regex::new(pattern)
            .map_err(|e| Error::Config(format!("invalid regex for pattern '{key}': {e}")))?;
        self.matchers.insert(key, Matcher::Custom(regex));
        Ok(())
    }

    /// Matches for the named category; unknown names fail with `InvalidCategory`.
    pub fn find(&self, name: &str, text: &str) -> Result<Vec<String>> {
        let key = normalize_category_name(name);
        let matcher = self
            .matchers
            .get(&key)
            .ok_or_else(|| Error::InvalidCategory(name.to_string()))?;

        let found = match matcher {
            Matcher::Builtin(category) => find_matches(*category, text),
            Matcher::Custom(regex) => collect_matches(regex, text),
        };
        debug!(category = %key, matches = found.len(), "sensitive data scan");
        Ok(found)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.matchers.keys().map(String::as_str)
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
