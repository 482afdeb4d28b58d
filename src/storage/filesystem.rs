//! File System Conversation Storage
//!
//! Information Hiding:
//! - File paths and JSON serialization format hidden from users
//! - Directory structure management hidden behind interface
//! - Persistence mechanism independent of storage trait users

use super::{Conversation, ConversationStore, Message, Role};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use tokio::fs;

/// File system store - each conversation is a JSON file
/// Files are stored as {base_path}/{conversation_id}.json
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub async fn new(base_path: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_path)
            .await
            .context("Failed to create storage directory")?;

        Ok(Self { base_path })
    }

    fn conversation_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    // Ids come straight from callers; reject anything that could escape the base dir
    fn id_is_safe(id: &str) -> bool {
        !id.contains('/') && !id.contains("..")
    }

    async fn write_conversation(&self, conversation: &Conversation) -> Result<()> {
        let path = self.conversation_path(&conversation.id);
        let json = serde_json::to_string_pretty(conversation)
            .context("Failed to serialize conversation")?;

        fs::write(&path, json)
            .await
            .context(format!("Failed to write conversation file: {:?}", path))?;
        Ok(())
    }

    async fn read_conversation(&self, id: &str) -> Result<Option<Conversation>> {
        let path = self.conversation_path(id);

        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .await
            .context(format!("Failed to read conversation file: {:?}", path))?;

        let conversation: Conversation =
            serde_json::from_str(&json).context("Failed to deserialize conversation")?;
        Ok(Some(conversation))
    }
}

#[async_trait]
impl ConversationStore for FileStore {
    async fn create(&self, title: Option<&str>) -> Result<Conversation> {
        let conversation = Conversation::new(title);
        self.write_conversation(&conversation).await?;
        tracing::debug!(
            "[FileStore] Created conversation '{}' in {:?}",
            conversation.id,
            self.base_path
        );
        Ok(conversation)
    }

    async fn get(&self, id: &str) -> Result<Option<Conversation>> {
        if !Self::id_is_safe(id) {
            return Ok(None);
        }
        self.read_conversation(id).await
    }

    async fn append_message(&self, id: &str, role: Role, content: &str) -> Result<Conversation> {
        let mut conversation = self
            .get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Conversation not found with ID: {}", id))?;

        conversation.messages.push(Message::new(role, content));
        conversation.updated_at = Utc::now();
        self.write_conversation(&conversation).await?;

        tracing::debug!(
            "[FileStore] Appended {} message to '{}' ({} total)",
            role.as_str(),
            id,
            conversation.messages.len()
        );
        Ok(conversation)
    }

    async fn list_all(&self) -> Result<Vec<Conversation>> {
        let mut all = Vec::new();
        let mut entries = fs::read_dir(&self.base_path)
            .await
            .context("Failed to read storage directory")?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path.file_stem().and_then(|s| s.to_str()) {
                if let Some(conversation) = self.read_conversation(id).await? {
                    all.push(conversation);
                }
            }
        }

        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(all)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        if !Self::id_is_safe(id) {
            return Ok(false);
        }
        let path = self.conversation_path(id);

        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path)
            .await
            .context(format!("Failed to delete conversation file: {:?}", path))?;
        tracing::debug!("[FileStore] Deleted conversation '{}'", id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf()).await.unwrap();

        let created = store.create(Some("File test")).await.unwrap();
        let loaded = store.get(&created.id).await.unwrap().unwrap();

        assert_eq!(loaded.id, created.id);
        assert_eq!(loaded.title, "File test");
    }

    #[tokio::test]
    async fn test_append_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf()).await.unwrap();

        let conversation = store.create(None).await.unwrap();
        store
            .append_message(&conversation.id, Role::User, "Hello")
            .await
            .unwrap();
        store
            .append_message(&conversation.id, Role::Assistant, "Hi there")
            .await
            .unwrap();

        let loaded = store.get(&conversation.id).await.unwrap().unwrap();
        assert_eq!(loaded.messages.len(), 2);
        assert_eq!(loaded.messages[0].content, "Hello");
        assert_eq!(loaded.messages[1].content, "Hi there");
    }

    #[tokio::test]
    async fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_path_buf();

        let id = {
            let store = FileStore::new(path.clone()).await.unwrap();
            let conversation = store.create(None).await.unwrap();
            store
                .append_message(&conversation.id, Role::User, "Persistent message")
                .await
                .unwrap();
            conversation.id
        };

        let store = FileStore::new(path).await.unwrap();
        let loaded = store.get(&id).await.unwrap().unwrap();
        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(loaded.messages[0].content, "Persistent message");
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf()).await.unwrap();

        let first = store.create(Some("first")).await.unwrap();
        let _second = store.create(Some("second")).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 2);

        assert!(store.delete(&first.id).await.unwrap());
        assert!(!store.delete(&first.id).await.unwrap());
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_path_traversal_id_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf()).await.unwrap();

        assert!(store.get("../outside").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_rejects_path_traversal_ids() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("conversations");
        let store = FileStore::new(base).await.unwrap();

        // A sibling file outside the storage directory must survive a traversal id
        let sibling = temp_dir.path().join("sibling.json");
        std::fs::write(&sibling, "{}").unwrap();

        assert!(!store.delete("../sibling").await.unwrap());
        assert!(sibling.exists());
        assert!(!store.delete("a/b").await.unwrap());
    }
}
