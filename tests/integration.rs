// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

//! Integration tests for LLM providers and the assistant pipeline.
//!
//! Uses `wiremock` to mock HTTP endpoints so no real LLM servers are needed.

mod helpers;

use std::sync::Arc;

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use riskdesk::config::{Config, IntentConfig, Provider};
use riskdesk::error::Error;
use riskdesk::services::assistant::{
    Assistant, CLOSING_LINE, QUESTION_MARKER, build_prompt, revise_answer,
};
use riskdesk::services::dispatcher::ServiceDispatcher;
use riskdesk::services::intent::IntentExtractor;
use riskdesk::services::llm::ollama::OllamaProvider;
use riskdesk::services::llm::openai::OpenAiProvider;
use riskdesk::services::llm::{LlmProvider, SYSTEM_PROMPT, create_provider};

use helpers::StubLlm;

// ─── Test helpers ────────────────────────────────────────────────────────────

fn ollama_config(server_url: &str) -> Config {
    Config {
        provider: Provider::Ollama,
        model: "llama2:7b-chat".into(),
        ollama_host: server_url.to_string(),
        timeout_secs: 5,
        ..Config::default()
    }
}

fn openai_config(server_url: &str) -> Config {
    Config {
        provider: Provider::OpenAI,
        model: "gpt-4o-mini".into(),
        openai_base_url: Some(server_url.to_string()),
        api_key: Some("test-key".into()),
        timeout_secs: 5,
        ..Config::default()
    }
}

fn assistant_with(llm: Arc<StubLlm>) -> Assistant {
    let extractor = IntentExtractor::from_config(&IntentConfig::default());
    let dispatcher = ServiceDispatcher::new(extractor.reference().clone());
    Assistant::new(llm, extractor, dispatcher)
}

const RAM_REPLY: &str = "Amount $50 transferred successfully to ram, I see that you make this transaction every month, you want me to add this as a recurring payment?";

// ─── Ollama ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ollama_generate_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama2:7b-chat",
            "system": SYSTEM_PROMPT,
            "prompt": "hello",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "  Hi there!  ",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(&ollama_config(&server.uri()));
    assert_eq!(provider.generate("hello").await.unwrap(), "Hi there!");
    assert_eq!(provider.name(), "ollama");
}

#[tokio::test]
async fn ollama_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(&ollama_config(&server.uri()));
    let err = provider.generate("hello").await.unwrap_err();
    match err {
        Error::UpstreamUnavailable { upstream, message } => {
            assert_eq!(upstream, "ollama");
            assert!(message.contains("500"), "message: {message}");
        }
        other => panic!("expected UpstreamUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn ollama_connection_refused() {
    let provider = OllamaProvider::new(&ollama_config("http://127.0.0.1:1"));
    assert!(matches!(
        provider.generate("hello").await,
        Err(Error::UpstreamUnavailable { .. })
    ));
}

// ─── OpenAI-compatible ───────────────────────────────────────────────────────

#[tokio::test]
async fn openai_generate_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": "hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": " Hello! "}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&openai_config(&server.uri()));
    assert_eq!(provider.generate("hello").await.unwrap(), "Hello!");
}

#[tokio::test]
async fn openai_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&openai_config(&server.uri()));
    let err = provider.generate("hello").await.unwrap_err();
    assert!(
        matches!(err, Error::UpstreamUnavailable { ref message, .. } if message == "invalid API key"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn openai_empty_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": []
        })))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(&openai_config(&server.uri()));
    assert!(provider.generate("hello").await.is_err());
}

#[test]
fn create_provider_follows_config() {
    assert_eq!(create_provider(&ollama_config("http://localhost:1")).name(), "ollama");
    assert_eq!(create_provider(&openai_config("http://localhost:1")).name(), "openai");
}

// ─── Prompt building and answer revision ─────────────────────────────────────

#[test]
fn prompt_wraps_question_in_markers() {
    let prompt = build_prompt("Subscription completed successfully!", "subscribe me");
    assert!(prompt.contains("```\nSubscription completed successfully!\n```"));
    assert!(prompt.contains(&format!("{QUESTION_MARKER}subscribe me{QUESTION_MARKER}")));
    assert!(prompt.ends_with("Answer:"));
}

#[test]
fn revise_keeps_direct_answer() {
    let revised = revise_answer("ctx", "Your subscription is active.");
    assert_eq!(revised, format!("Your subscription is active.\n{CLOSING_LINE}"));
}

#[test]
fn revise_replaces_hedged_answer_with_context() {
    let revised = revise_answer("Transfer done.", "As just an AI, I need proper authorization.");
    assert_eq!(revised, format!("Transfer done.\n{CLOSING_LINE}"));
}

#[test]
fn revise_markers_are_case_insensitive() {
    let revised = revise_answer("ctx", "HOWEVER, I cannot help");
    assert!(revised.starts_with("ctx\n"));
}

// ─── Assistant ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn assistant_grounds_answer_in_service_reply() {
    let llm = Arc::new(StubLlm::answering("Done, $50 went to Ram."));
    let assistant = assistant_with(llm.clone());

    let reply = assistant
        .assist("please transfer $50 to ram", true)
        .await
        .unwrap();

    assert_eq!(reply.context.as_deref(), Some(RAM_REPLY));
    assert_eq!(reply.answer, format!("Done, $50 went to Ram.\n{CLOSING_LINE}"));

    let sent = llm.last_prompt().unwrap();
    assert!(sent.contains(RAM_REPLY));
    assert!(sent.contains("[][][][]please transfer $50 to ram[][][][]"));
}

#[tokio::test]
async fn assistant_falls_back_when_model_hedges() {
    let llm = Arc::new(StubLlm::answering(
        "I'm just an AI, can you confirm you have consent?",
    ));
    let assistant = assistant_with(llm);

    let reply = assistant
        .assist("please transfer $20 to peter", true)
        .await
        .unwrap();
    assert_eq!(
        reply.answer,
        format!("Insufficient funds to complete the transfer\n{CLOSING_LINE}")
    );
}

#[tokio::test]
async fn assistant_without_context_passes_prompt_through() {
    let llm = Arc::new(StubLlm::answering("**Markdown** answer"));
    let assistant = assistant_with(llm.clone());

    let reply = assistant.assist("what is a mutual fund?", false).await.unwrap();
    assert_eq!(reply.answer, "**Markdown** answer");
    assert_eq!(reply.context, None);
    assert_eq!(llm.last_prompt().as_deref(), Some("what is a mutual fund?"));
}

#[tokio::test]
async fn assistant_rejects_empty_prompt() {
    let assistant = assistant_with(Arc::new(StubLlm::answering("unused")));
    let err = assistant.assist(" ", true).await.unwrap_err();
    assert!(matches!(err, Error::MissingInput { field: "prompt" }));
}

#[tokio::test]
async fn assistant_surfaces_invalid_amount() {
    let assistant = assistant_with(Arc::new(StubLlm::answering("unused")));
    let err = assistant
        .assist("please transfer $abc to ram", true)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidAmount(_)));
}
