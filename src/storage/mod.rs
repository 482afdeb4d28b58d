//! Conversation Storage Abstraction
//!
//! Information Hiding:
//! - Storage backend implementation details hidden behind trait
//! - Allows swapping between memory and filesystem backends without API changes
//! - Conversations are append-only; callers never mutate messages in place

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod filesystem;
pub mod memory;

pub use filesystem::FileStore;
pub use memory::MemoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single chat turn. Immutable once appended to a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A persisted, append-only ordered list of chat turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(title: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.unwrap_or("New Conversation").to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trait defining conversation storage interface
/// Implementations can use different backends (memory, file, database)
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Create a new conversation with an optional title
    async fn create(&self, title: Option<&str>) -> Result<Conversation>;

    /// Look up a conversation by id
    /// Returns None if the id is unknown
    async fn get(&self, id: &str) -> Result<Option<Conversation>>;

    /// Append a message to an existing conversation
    /// Fails if the conversation does not exist
    async fn append_message(&self, id: &str, role: Role, content: &str) -> Result<Conversation>;

    /// List all conversations, most recently updated first
    async fn list_all(&self) -> Result<Vec<Conversation>>;

    /// Delete a conversation, returning whether it existed
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Return the trailing `limit` messages of a conversation
    async fn recent_messages(&self, id: &str, limit: usize) -> Result<Vec<Message>> {
        let conversation = self
            .get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Conversation not found with ID: {}", id))?;

        let start = conversation.messages.len().saturating_sub(limit);
        Ok(conversation.messages[start..].to_vec())
    }
}
