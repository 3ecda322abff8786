// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use crate::config::IntentConfig;

/// Known users and subscription services. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceData {
    users: Vec<String>,
    subscription_services: Vec<String>,
}

impl ReferenceData {
    pub fn new(users: Vec<String>, subscription_services: Vec<String>) -> Self {
        Self {
            users,
            subscription_services,
        }
    }

    pub fn from_config(config: &IntentConfig) -> Self {
        Self::new(config.users.clone(), config.subscription_services.clone())
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn subscription_services(&self) -> &[String] {
        &self.subscription_services
    }

    pub fn is_known_user(&self, name: &str) -> bool {
        self.users.iter().any(|u| u.eq_ignore_ascii_case(name.trim()))
    }

    pub fn offers(&self, service: &str) -> bool {
        self.subscription_services
            .iter()
            .any(|s| s.eq_ignore_ascii_case(service.trim()))
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::from_config(&IntentConfig::default())
    }
}
