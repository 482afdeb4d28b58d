//! Shopchat - retrieval-augmented chat backend for e-commerce product support
//!
//! Receives a user message, classifies and translates it, retrieves relevant
//! products from a vector database, asks a hosted model to compose an answer,
//! and persists the conversation history. All non-trivial capabilities are
//! delegated to hosted APIs; the value here is the orchestration pipeline and
//! the marker protocol between the composer and the orchestrator.

pub mod agents;
pub mod cli;
mod config;
pub mod core;
pub mod pipeline;
pub mod products;
pub mod server;
pub mod storage;
pub mod utils;

pub use config::Settings;
pub use pipeline::{ChatError, ChatPipeline, ChatReply};
pub use server::AppState;

use crate::core::{GeminiClient, OpenRouterClient, VectorStore, WeaviateClient};
use crate::storage::{ConversationStore, FileStore, MemoryStore};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Wire up the production pipeline from settings and environment
/// credentials. Fails fast with an explicit message when a credential is
/// missing; no component is constructed half-configured.
pub async fn build_pipeline(settings: &Settings) -> Result<ChatPipeline> {
    let openrouter: Arc<dyn core::Completion> = Arc::new(OpenRouterClient::new(
        Settings::openrouter_api_key()?,
        settings,
    ));
    let gemini = Arc::new(GeminiClient::new(Settings::gemini_api_key()?, settings));
    let vector: Arc<dyn VectorStore> = Arc::new(WeaviateClient::new(
        Settings::weaviate_url()?,
        Settings::weaviate_api_key()?,
        settings,
        Arc::clone(&gemini),
    ));

    let store: Arc<dyn ConversationStore> = match settings.storage.backend.as_str() {
        "file" => Arc::new(FileStore::new(PathBuf::from(&settings.storage.path)).await?),
        "memory" => Arc::new(MemoryStore::new()),
        other => {
            return Err(anyhow::anyhow!(
                "Unknown storage backend '{}' (expected 'memory' or 'file')",
                other
            ))
        }
    };

    Ok(ChatPipeline::new(
        openrouter,
        gemini as Arc<dyn core::Completion>,
        vector,
        store,
        settings,
    ))
}
