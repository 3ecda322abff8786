// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{DispatchResult, Intent, ReferenceData, ServiceKind};

const REGISTRATION_FORM: &str = "([Registration form](http://xbcbank.com?ajb87u))";
const AUTHORIZATION_FORM: &str = "([Authorization form](http://xbcbank.com?uiue))";

/// Executes a simulated banking operation for an [`Intent`].
///
/// Nothing is moved or stored: every branch only renders a reply, so the
/// same intent always yields the same message.
#[derive(Debug, Clone)]
pub struct ServiceDispatcher {
    reference: Arc<ReferenceData>,
}

impl ServiceDispatcher {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self { reference }
    }

    pub fn dispatch(&self, intent: &Intent) -> DispatchResult {
        let message = match intent.service {
            ServiceKind::Transfer => {
                transfer(intent.receiver_or_user.as_deref(), intent.amount)
            }
            ServiceKind::Subscribe => self.subscribe(intent.subscription_service.as_deref()),
            ServiceKind::Add => self.add(intent.receiver_or_user.as_deref()),
            ServiceKind::Remove => self.remove(intent.receiver_or_user.as_deref()),
            ServiceKind::Unknown => {
                "Invalid request, can you please explain what you are looking for?".to_string()
            }
        };

        debug!(service = %intent.service, "intent dispatched");
        DispatchResult::new(message)
    }

    fn subscribe(&self, service: Option<&str>) -> String {
        match service {
            Some(name) if self.reference.offers(name) => {
                "Subscription completed successfully!".to_string()
            }
            other => format!(
                "I am afraid we do not offer {} as a service, can you please verify if you are requesting a valid banking service?",
                other.unwrap_or("the requested service")
            ),
        }
    }

    fn add(&self, user: Option<&str>) -> String {
        match user {
            Some(name) if self.reference.is_known_user(name) => format!(
                "I see that {name} is a valid user and can be added to your account. Can you authorize the completed registration form {AUTHORIZATION_FORM} for me to complete the request?"
            ),
            other => format!(
                "{} is not eligible for this service, can you please check and reach out to the bank for further assistance!",
                user_subject(other)
            ),
        }
    }

    fn remove(&self, user: Option<&str>) -> String {
        match user {
            Some(name) if self.reference.is_known_user(name) => {
                format!("The user {name} removed successfully from your account!")
            }
            other => format!(
                "{} is not registered for this service, can you please check and reach out to the bank for further assistance!",
                user_subject(other)
            ),
        }
    }
}

// "The user mallory", or a neutral subject when no name was given
fn user_subject(user: Option<&str>) -> String {
    match user.map(str::trim) {
        Some(name) if !name.is_empty() => format!("The user {name}"),
        _ => "The requested user".to_string(),
    }
}

impl Default for ServiceDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(ReferenceData::default()))
    }
}

// Receivers are not checked against the reference list here; only the three
// scripted names get special replies.
fn transfer(receiver: Option<&str>, amount: Option<Decimal>) -> String {
    let amount = match amount {
        Some(a) if a > Decimal::ZERO => a,
        _ => return "Please enter a valid amount to transfer".to_string(),
    };

    let Some(receiver) = receiver else {
        return format!("Amount ${amount} transferred successfully!");
    };

    match receiver.to_lowercase().as_str() {
        "joseph" => format!(
            "Joseph is not registered as a receiver in your account, I have created a registration form for you, please authorize the registration using this form {REGISTRATION_FORM}"
        ),
        "peter" => "Insufficient funds to complete the transfer".to_string(),
        "ram" => format!(
            "Amount ${amount} transferred successfully to {receiver}, I see that you make this transaction every month, you want me to add this as a recurring payment?"
        ),
        _ => format!("Amount ${amount} transferred successfully to {receiver}!"),
    }
}
