// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::str::FromStr;
use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;

use riskdesk::config::IntentConfig;
use riskdesk::domain::{ReferenceData, ServiceKind};
use riskdesk::error::Error;
use riskdesk::services::intent::{IntentExtractor, parse_amount};

fn extractor() -> IntentExtractor {
    IntentExtractor::from_config(&IntentConfig::default())
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ─── Service keywords ────────────────────────────────────────────────────────

#[test]
fn transfer_with_receiver_and_amount() {
    let intent = extractor().extract("please transfer $50 to ram").unwrap();
    assert_eq!(intent.service, ServiceKind::Transfer);
    assert_eq!(intent.receiver_or_user.as_deref(), Some("ram"));
    assert_eq!(intent.amount, Some(dec("50")));
    assert_eq!(intent.subscription_service, None);
}

#[test]
fn subscribe_to_known_service() {
    let intent = extractor()
        .extract("I want to subscribe to mutual funds")
        .unwrap();
    assert_eq!(intent.service, ServiceKind::Subscribe);
    assert_eq!(intent.subscription_service.as_deref(), Some("mutual funds"));
}

#[test]
fn add_user() {
    let intent = extractor().extract("please add john to my account").unwrap();
    assert_eq!(intent.service, ServiceKind::Add);
    assert_eq!(intent.receiver_or_user.as_deref(), Some("john"));
}

#[test]
fn remove_user() {
    let intent = extractor()
        .extract("please remove carole from my account")
        .unwrap();
    assert_eq!(intent.service, ServiceKind::Remove);
    assert_eq!(intent.receiver_or_user.as_deref(), Some("carole"));
}

#[test]
fn no_keyword_is_unknown() {
    let intent = extractor().extract("what is the weather like").unwrap();
    assert_eq!(intent.service, ServiceKind::Unknown);
    assert_eq!(intent.receiver_or_user, None);
    assert_eq!(intent.amount, None);
}

#[test]
fn matching_is_case_insensitive() {
    let intent = extractor().extract("Please TRANSFER $20 to RAM").unwrap();
    assert_eq!(intent.service, ServiceKind::Transfer);
    assert_eq!(intent.receiver_or_user.as_deref(), Some("ram"));
}

// ─── Last-match-wins ─────────────────────────────────────────────────────────

#[test]
fn later_keyword_in_scan_order_wins() {
    // "add" is scanned after "transfer"
    let intent = extractor()
        .extract("I want to transfer money and add john")
        .unwrap();
    assert_eq!(intent.service, ServiceKind::Add);
}

#[test]
fn later_user_in_reference_list_wins() {
    let intent = extractor()
        .extract("please transfer $5 to john and ram")
        .unwrap();
    assert_eq!(intent.receiver_or_user.as_deref(), Some("ram"));
}

#[test]
fn last_dollar_token_wins() {
    let intent = extractor()
        .extract("please transfer $5 or maybe $10 to ram")
        .unwrap();
    assert_eq!(intent.amount, Some(dec("10")));
}

// ─── Leading match rule ──────────────────────────────────────────────────────

#[test]
fn keyword_at_start_is_ignored_by_default() {
    let intent = extractor().extract("transfer $5 to ram").unwrap();
    assert_eq!(intent.service, ServiceKind::Unknown);
    assert_eq!(intent.receiver_or_user.as_deref(), Some("ram"));
}

#[test]
fn keyword_at_start_counts_when_disabled() {
    let extractor = IntentExtractor::new(Arc::new(ReferenceData::default()), false);
    let intent = extractor.extract("transfer $5 to ram").unwrap();
    assert_eq!(intent.service, ServiceKind::Transfer);
}

#[test]
fn leading_keyword_prompts_with_leading_match_enabled() {
    let extractor = IntentExtractor::new(Arc::new(ReferenceData::default()), false);

    let intent = extractor.extract("subscribe to mutual funds").unwrap();
    assert_eq!(intent.service, ServiceKind::Subscribe);
    assert_eq!(intent.subscription_service.as_deref(), Some("mutual funds"));

    let intent = extractor.extract("add john to my account").unwrap();
    assert_eq!(intent.service, ServiceKind::Add);
    assert_eq!(intent.receiver_or_user.as_deref(), Some("john"));
}

#[test]
fn leading_keyword_prompts_by_default() {
    // Only the keyword sits at index 0; the names further in still count
    let intent = extractor().extract("subscribe to mutual funds").unwrap();
    assert_eq!(intent.service, ServiceKind::Unknown);
    assert_eq!(intent.subscription_service.as_deref(), Some("mutual funds"));

    let intent = extractor().extract("add john to my account").unwrap();
    assert_eq!(intent.service, ServiceKind::Unknown);
    assert_eq!(intent.receiver_or_user.as_deref(), Some("john"));
}

#[test]
fn custom_reference_data() {
    let reference = ReferenceData::new(vec!["alice".into()], vec!["gold card".into()]);
    let extractor = IntentExtractor::new(Arc::new(reference), true);
    let intent = extractor
        .extract("please subscribe alice to the gold card")
        .unwrap();
    assert_eq!(intent.receiver_or_user.as_deref(), Some("alice"));
    assert_eq!(intent.subscription_service.as_deref(), Some("gold card"));
}

// ─── Amounts ─────────────────────────────────────────────────────────────────

#[test]
fn zero_amount_parses() {
    let intent = extractor().extract("please transfer $0 to peter").unwrap();
    assert_eq!(intent.amount, Some(Decimal::ZERO));
}

#[test]
fn decimal_amount_keeps_scale() {
    assert_eq!(parse_amount("$12.50").unwrap().to_string(), "12.50");
}

#[test]
fn unparseable_amount_fails() {
    let err = extractor()
        .extract("please transfer $lots to ram")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidAmount(token) if token == "$lots"));
}

#[test]
fn negative_amount_fails() {
    assert!(matches!(
        parse_amount("$-5"),
        Err(Error::InvalidAmount(_))
    ));
}

#[test]
fn lone_dollar_sign_fails() {
    assert!(parse_amount("$").is_err());
}

// ─── Service kind parsing ────────────────────────────────────────────────────

#[test]
fn service_kind_parse() {
    assert_eq!(ServiceKind::parse("TRANSFER"), ServiceKind::Transfer);
    assert_eq!(ServiceKind::parse(" remove "), ServiceKind::Remove);
    assert_eq!(ServiceKind::parse("withdraw"), ServiceKind::Unknown);
    assert_eq!(ServiceKind::Subscribe.to_string(), "SUBSCRIBE");
}

#[test]
fn intent_serializes_uppercase_service() {
    let intent = extractor().extract("please add john").unwrap();
    let json = serde_json::to_value(&intent).unwrap();
    assert_eq!(json["service"], "ADD");
    assert_eq!(json["receiver_or_user"], "john");
}

// ─── Property tests ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn extraction_is_idempotent(prompt in any::<String>()) {
        let extractor = extractor();
        let first = extractor.extract(&prompt);
        let second = extractor.extract(&prompt);
        prop_assert_eq!(first.is_ok(), second.is_ok());
        prop_assert_eq!(first.ok(), second.ok());
    }

    #[test]
    fn prompts_without_dollar_never_fail(prompt in "[a-zA-Z0-9 ,.!?]{0,120}") {
        prop_assert!(extractor().extract(&prompt).is_ok());
    }
}
