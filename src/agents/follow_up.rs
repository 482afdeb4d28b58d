//! Follow-up detection: does the newest user message depend on prior turns?
//!
//! Only meaningful with at least 3 history entries (previous question,
//! previous answer, current question); the orchestrator enforces that gate.
//! Fallback policy is uniform: transport failure and unparseable model
//! output both resolve to `false`.

use crate::agents::format_transcript;
use crate::core::Completion;
use crate::storage::Message;
use std::sync::Arc;

const CLASSIFIER_PROMPT: &str = r#"You are a sophisticated AI agent specializing in determining if a user's message is a follow-up question to a previous conversation. A follow-up question is a question that refers to or builds upon a previous question or response in the conversation. For example, if a user asks about a product and then asks about its price, the second question is a follow-up question.

Analyze the conversation history and determine if the last user message is a follow-up question. Return only a JSON boolean value (true or false) as plain text, without any line breaks, including the "\n" character, HTML elements, special characters, or trailing newline characters. Ensure the output is a continuous string of text."#;

pub struct FollowUpClassifier {
    completion: Arc<dyn Completion>,
}

impl FollowUpClassifier {
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self { completion }
    }

    pub async fn classify(&self, history: &[Message]) -> bool {
        let transcript = format_transcript(history);
        let user_prompt = format!(
            "Here is the conversation history:\n{}\n\nIs the last user message a follow-up question?",
            transcript
        );

        match self.completion.complete(CLASSIFIER_PROMPT, &user_prompt).await {
            Ok(raw) => match parse_bool(&raw) {
                Some(value) => value,
                None => {
                    tracing::warn!(
                        "[FollowUpClassifier] Non-boolean model output: {:?}, assuming false",
                        raw
                    );
                    false
                }
            },
            Err(e) => {
                tracing::warn!("[FollowUpClassifier] Completion failed: {}", e);
                false
            }
        }
    }
}

/// Strict boolean parse: exactly "true" or "false" after trimming,
/// case-insensitive. Anything else is a protocol violation.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
