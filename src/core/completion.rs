//! Text-completion collaborator interface and the OpenRouter implementation.
//!
//! Every classification step (translation, categorization, follow-up
//! detection) and the response composer talk to a hosted model through the
//! same narrow `Completion` seam, each with its own system prompt.

use crate::config::Settings;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Single-shot completion: one system prompt, one user prompt, one text reply.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// OpenRouter chat-completions client.
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    site_url: String,
    app_title: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, settings: &Settings) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: settings.llm.endpoint.clone(),
            model: settings.llm.model.clone(),
            site_url: settings.llm.site_url.clone(),
            app_title: settings.llm.app_title.clone(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Completion for OpenRouterClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", &self.app_title)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!("API error {}: {}", status, error_text));
        }

        let chat_response = response.json::<ChatResponse>().await?;
        let content = chat_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("Completion response contained no choices"))?;

        Ok(content.trim_end_matches('\n').to_string())
    }
}
