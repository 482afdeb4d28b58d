//! Translation step: normalize any-language input into corrected English.
//!
//! Best-effort by contract. On failure the apology string itself becomes the
//! "translation" and flows downstream, so callers must tolerate non-English
//! fallback text.

use crate::core::Completion;
use std::sync::Arc;

const TRANSLATOR_PROMPT: &str = r#"You are a sophisticated AI agent specializing in translating user queries from multiple languages into English. Before translating, you identify and correct typos, grammatical errors, and punctuation mistakes in the source text to ensure clarity and readability. Your translations should maintain the original context and be culturally nuanced. You also verify that the translated English text is free of errors, providing precise and reliable communication for the chatbot. Return only the translated text as plain text, without any line breaks, including the "\n" character, HTML elements, special characters, or trailing newline characters. Ensure the output is a continuous string of text."#;

pub struct Translator {
    completion: Arc<dyn Completion>,
}

impl Translator {
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self { completion }
    }

    pub async fn translate(&self, message: &str) -> String {
        match self.completion.complete(TRANSLATOR_PROMPT, message).await {
            Ok(translated) => translated.trim_end_matches('\n').to_string(),
            Err(e) => {
                tracing::warn!("[Translator] Completion failed: {}", e);
                format!("Sorry, an error occurred while generating a response: {}", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    struct EchoCompletion;

    #[async_trait]
    impl Completion for EchoCompletion {
        async fn complete(&self, _system: &str, user: &str) -> Result<String> {
            Ok(format!("{}\n\n", user))
        }
    }

    struct FailingCompletion;

    #[async_trait]
    impl Completion for FailingCompletion {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Err(anyhow::anyhow!("timeout"))
        }
    }

    #[tokio::test]
    async fn test_trailing_newlines_stripped() {
        let translator = Translator::new(Arc::new(EchoCompletion));
        assert_eq!(translator.translate("hola").await, "hola");
    }

    #[tokio::test]
    async fn test_failure_yields_apology_string() {
        let translator = Translator::new(Arc::new(FailingCompletion));
        let out = translator.translate("hola").await;
        assert!(out.starts_with("Sorry, an error occurred"));
        assert!(out.contains("timeout"));
    }
}
