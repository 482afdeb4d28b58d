//! Weaviate hybrid-search collaborator.
//!
//! Information Hiding:
//! - GraphQL payload construction and query sanitization hidden from callers
//! - Product records exposed as opaque JSON values

use crate::config::Settings;
use crate::core::gemini::GeminiClient;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;

/// Vector-store collaborator: text embedding plus hybrid similarity search.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Hybrid (lexical + vector) search returning up to `limit` product
    /// records, best match first.
    async fn hybrid_search(
        &self,
        query: &str,
        vector: &[f32],
        alpha: f64,
        limit: usize,
    ) -> Result<Vec<Value>>;
}

/// Make query text safe for inline inclusion in a GraphQL string:
/// truncate to 100 characters, drop punctuation and quotes, trim.
pub fn sanitize_query(query: &str) -> String {
    query
        .chars()
        .take(100)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect::<String>()
        .trim()
        .to_string()
}

pub struct WeaviateClient {
    client: Client,
    base_url: String,
    api_key: String,
    class_name: String,
    embedder: Arc<GeminiClient>,
}

impl WeaviateClient {
    pub fn new(
        base_url: String,
        api_key: String,
        settings: &Settings,
        embedder: Arc<GeminiClient>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            class_name: settings.search.class_name.clone(),
            embedder,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl VectorStore for WeaviateClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embedder.embed(text).await
    }

    async fn hybrid_search(
        &self,
        query: &str,
        vector: &[f32],
        alpha: f64,
        limit: usize,
    ) -> Result<Vec<Value>> {
        let clean_query = sanitize_query(query);
        let vector_json = serde_json::to_string(vector)?;

        let graphql = format!(
            r#"{{
  Get {{
    {class} (
      hybrid: {{
        query: "{query}"
        alpha: {alpha},
        vector: {vector},
      }}
      limit: {limit}
    ) {{
      data
      _additional {{ score }}
    }}
  }}
}}"#,
            class = self.class_name,
            query = clean_query,
            alpha = alpha,
            vector = vector_json,
            limit = limit,
        );

        tracing::debug!("[WeaviateClient] Hybrid search for \"{}\"", clean_query);

        let response = self
            .client
            .post(format!("{}/v1/graphql", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&json!({"query": graphql}))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!("Weaviate error {}: {}", status, error_text));
        }

        let body: Value = response.json().await?;
        let items = body["data"]["Get"][&self.class_name]
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Weaviate response missing Get.{}", self.class_name))?;

        // Older schemas store the product as a string-encoded JSON blob;
        // normalize to a parsed value here so downstream code sees one shape.
        let products = items
            .iter()
            .map(|item| {
                let data = item["data"].clone();
                match data {
                    Value::String(s) => serde_json::from_str(&s).unwrap_or(Value::String(s)),
                    other => other,
                }
            })
            .collect();

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_sanitize_query_strips_punctuation() {
        assert_eq!(
            sanitize_query("What's the \"best\" laptop?!"),
            "Whats the best laptop"
        );
    }

    #[test]
    fn test_sanitize_query_truncates_to_100_chars() {
        let long = "a".repeat(250);
        assert_eq!(sanitize_query(&long).len(), 100);
    }

    #[test]
    fn test_sanitize_query_handles_multibyte_boundaries() {
        let text = "ürün önerisi ça va 番号".repeat(20);
        let clean = sanitize_query(&text);
        assert!(clean.chars().count() <= 100);
    }

    #[tokio::test]
    async fn test_hybrid_search_parses_string_encoded_products() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"Get": {"Ecommerce": [
                    {"data": "{\"id\": 5, \"title\": \"MacBook Pro\"}",
                     "_additional": {"score": "0.91"}},
                    {"data": {"id": 7, "title": "ThinkPad X1"},
                     "_additional": {"score": "0.80"}}
                ]}}
            })))
            .mount(&mock_server)
            .await;

        let settings = Settings::default();
        let embedder = Arc::new(GeminiClient::new("k".to_string(), &settings));
        let client = WeaviateClient::new(
            "http://unused".to_string(),
            "test-key".to_string(),
            &settings,
            embedder,
        )
        .with_base_url(mock_server.uri());

        let products = client
            .hybrid_search("laptop", &[0.1, 0.2], 0.5, 3)
            .await
            .unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0]["title"], "MacBook Pro");
        assert_eq!(products[1]["id"], 7);
    }

    #[tokio::test]
    async fn test_hybrid_search_errors_on_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .mount(&mock_server)
            .await;

        let settings = Settings::default();
        let embedder = Arc::new(GeminiClient::new("k".to_string(), &settings));
        let client = WeaviateClient::new(
            "http://unused".to_string(),
            "test-key".to_string(),
            &settings,
            embedder,
        )
        .with_base_url(mock_server.uri());

        assert!(client.hybrid_search("q", &[0.1], 0.5, 3).await.is_err());
    }
}
