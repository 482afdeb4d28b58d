//! In-Memory Conversation Storage
//!
//! Information Hiding:
//! - HashMap storage structure hidden from users
//! - Thread-safe access via RwLock hidden behind async interface
//! - Suitable for testing and single-process deployments

use super::{Conversation, ConversationStore, Message, Role};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory store using a HashMap keyed by conversation id
/// Data is lost when the process terminates
pub struct MemoryStore {
    conversations: Arc<RwLock<HashMap<String, Conversation>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn create(&self, title: Option<&str>) -> Result<Conversation> {
        let conversation = Conversation::new(title);
        let mut conversations = self.conversations.write().await;
        conversations.insert(conversation.id.clone(), conversation.clone());
        tracing::debug!("[MemoryStore] Created conversation '{}'", conversation.id);
        Ok(conversation)
    }

    async fn get(&self, id: &str) -> Result<Option<Conversation>> {
        let conversations = self.conversations.read().await;
        Ok(conversations.get(id).cloned())
    }

    async fn append_message(&self, id: &str, role: Role, content: &str) -> Result<Conversation> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(id)
            .ok_or_else(|| anyhow::anyhow!("Conversation not found with ID: {}", id))?;

        conversation.messages.push(Message::new(role, content));
        conversation.updated_at = Utc::now();

        tracing::debug!(
            "[MemoryStore] Appended {} message to '{}' ({} total)",
            role.as_str(),
            id,
            conversation.messages.len()
        );
        Ok(conversation.clone())
    }

    async fn list_all(&self) -> Result<Vec<Conversation>> {
        let conversations = self.conversations.read().await;
        let mut all: Vec<Conversation> = conversations.values().cloned().collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(all)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut conversations = self.conversations.write().await;
        let existed = conversations.remove(id).is_some();
        tracing::debug!("[MemoryStore] Deleted conversation '{}': {}", id, existed);
        Ok(existed)
    }
}
