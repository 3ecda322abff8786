// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::sync::Arc;

use tracing::debug;

use crate::domain::AssistantReply;
use crate::error::{Error, Result};
use crate::services::dispatcher::ServiceDispatcher;
use crate::services::intent::IntentExtractor;
use crate::services::llm::LlmProvider;

/// Delimits the user's question inside the context prompt.
pub const QUESTION_MARKER: &str = "[][][][]";

pub const CLOSING_LINE: &str =
    "Hope I have fulfilled your request. Is there anything else I can do for you?";

/// Phrases that signal the model hedged or refused instead of answering.
const REFUSAL_MARKERS: &[&str] = &[
    "however",
    "just an ai",
    "proper authorization",
    "consent",
    "ethical",
    "security",
    "can you",
    "please provide",
];

pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Use the following pieces of context enclosed by triple backquotes to answer the question at the end.\n\n\
         Context:\n```\n{context}\n```\n\n\
         Question: {QUESTION_MARKER}{question}{QUESTION_MARKER}\n\n\
         Answer:"
    )
}

/// Falls back to the service reply when the model hedged, then appends the closing line.
pub fn revise_answer(context: &str, answer: &str) -> String {
    let lowered = answer.to_lowercase();
    let hedged = REFUSAL_MARKERS.iter().any(|m| lowered.contains(m));
    let body = if hedged { context } else { answer };
    format!("{body}\n{CLOSING_LINE}")
}

/// Single-turn banking assistant. Keeps no conversation state.
#[derive(Clone)]
pub struct Assistant {
    llm: Arc<dyn LlmProvider>,
    extractor: IntentExtractor,
    dispatcher: ServiceDispatcher,
}

impl Assistant {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        extractor: IntentExtractor,
        dispatcher: ServiceDispatcher,
    ) -> Self {
        Self {
            llm,
            extractor,
            dispatcher,
        }
    }

    pub async fn assist(&self, prompt: &str, with_context: bool) -> Result<AssistantReply> {
        if prompt.trim().is_empty() {
            return Err(Error::MissingInput { field: "prompt" });
        }

        if !with_context {
            let answer = self.llm.generate(prompt).await?;
            return Ok(AssistantReply {
                answer,
                context: None,
            });
        }

        let intent = self.extractor.extract(prompt)?;
        let context = self.dispatcher.dispatch(&intent).message;
        let answer = self.llm.generate(&build_prompt(&context, prompt)).await?;
        debug!(provider = self.llm.name(), answer_chars = answer.len(), "assistant answered");

        Ok(AssistantReply {
            answer: revise_answer(&context, &answer),
            context: Some(context),
        })
    }
}
