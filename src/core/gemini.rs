//! Gemini client: response generation with a system instruction, plus
//! fixed-dimension text embeddings for retrieval.

use crate::config::Settings;
use crate::core::completion::Completion;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Embedding,
}

#[derive(Debug, Deserialize)]
struct Embedding {
    values: Vec<f32>,
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    embedding_model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, settings: &Settings) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: settings.gemini.endpoint.clone(),
            model: settings.gemini.model.clone(),
            embedding_model: settings.gemini.embedding_model.clone(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Generate text with a system instruction steering the model.
    pub async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<String> {
        let body = json!({
            "system_instruction": {
                "parts": [{"text": system_instruction}]
            },
            "contents": [
                {"role": "user", "parts": [{"text": prompt}]}
            ]
        });

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!("Gemini error {}: {}", status, error_text));
        }

        let generated = response.json::<GenerateResponse>().await?;
        generated
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| anyhow::anyhow!("Gemini response contained no candidates"))
    }

    /// Produce an embedding vector for the given text.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = json!({
            "content": {"parts": [{"text": text}]}
        });

        let response = self
            .client
            .post(format!(
                "{}/models/{}:embedContent",
                self.base_url, self.embedding_model
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Gemini embedding error {}: {}",
                status,
                error_text
            ));
        }

        let embedded = response.json::<EmbedResponse>().await?;
        Ok(embedded.embedding.values)
    }
}

#[async_trait]
impl Completion for GeminiClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.generate(system_prompt, user_prompt).await
    }
}
