//! The conversation orchestration pipeline.
//!
//! Sequences one incoming message through categorization, conversation
//! resolution, translation, follow-up detection, retrieval, response
//! composition, marker post-processing, and persistence. Stateless across
//! requests; all conversation state lives in the store.

use crate::agents::{Categorizer, FollowUpClassifier, ResponseComposer, Translator};
use crate::config::Settings;
use crate::core::{Completion, VectorStore};
use crate::products::{format_product_info, product_id, ResponseMarkers};
use crate::storage::{Conversation, ConversationStore, Role};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message is required")]
    EmptyMessage,
    #[error("An error occurred while processing the message: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub conversation_id: String,
    pub timestamp: DateTime<Utc>,
}

pub struct ChatPipeline {
    categorizer: Categorizer,
    translator: Translator,
    classifier: FollowUpClassifier,
    composer: ResponseComposer,
    vector: Arc<dyn VectorStore>,
    store: Arc<dyn ConversationStore>,
    alpha: f64,
    search_limit: usize,
    history_limit: usize,
}

impl ChatPipeline {
    /// `completion` backs the classification agents; `responder` backs the
    /// final response composition. In production these are OpenRouter and
    /// Gemini respectively.
    pub fn new(
        completion: Arc<dyn Completion>,
        responder: Arc<dyn Completion>,
        vector: Arc<dyn VectorStore>,
        store: Arc<dyn ConversationStore>,
        settings: &Settings,
    ) -> Self {
        Self {
            categorizer: Categorizer::new(Arc::clone(&completion)),
            translator: Translator::new(Arc::clone(&completion)),
            classifier: FollowUpClassifier::new(completion),
            composer: ResponseComposer::new(responder),
            vector,
            store,
            alpha: settings.search.alpha,
            search_limit: settings.search.limit,
            history_limit: settings.chat.history_limit,
        }
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    /// Process one chat message end to end.
    ///
    /// Every internal step degrades rather than aborts; the only failure
    /// paths out of here are an empty message and storage errors on the
    /// conversation appends.
    pub async fn process(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatReply, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        tracing::info!("[ChatPipeline] Incoming message: {:?}", message);

        let category = self.categorizer.categorize(message).await;
        tracing::info!("[ChatPipeline] Message category: {}", category);

        let conversation = self.resolve_conversation(conversation_id).await?;
        self.store
            .append_message(&conversation.id, Role::User, message)
            .await?;

        let history = self
            .store
            .recent_messages(&conversation.id, self.history_limit)
            .await?;

        let translated = self.translator.translate(message).await;
        tracing::debug!("[ChatPipeline] Translated message: {:?}", translated);

        // Previous user question, bot response, and current question
        let is_follow_up = if history.len() >= 3 {
            self.classifier.classify(&history).await
        } else {
            false
        };

        let search_query = if is_follow_up {
            self.expand_query(&history, &translated).await
        } else {
            translated.clone()
        };
        tracing::debug!("[ChatPipeline] Search query: {:?}", search_query);

        let products = self.retrieve(&search_query).await;

        let context = if products.is_empty() {
            json!({"message": "No relevant product information found."}).to_string()
        } else {
            serde_json::to_string(&products).map_err(anyhow::Error::from)?
        };

        let raw = self
            .composer
            .compose(message, &context, category, &history)
            .await;
        let markers = ResponseMarkers::parse(&raw);

        // The persisted assistant turn is always the marker-free text;
        // rendered product cards go only to the caller.
        self.store
            .append_message(&conversation.id, Role::Assistant, &markers.cleaned_text)
            .await?;

        let response = if markers.show_product_info && !products.is_empty() {
            let shown: Vec<Value> = match &markers.referenced_ids {
                Some(ids) => products
                    .iter()
                    .filter(|p| product_id(p).is_some_and(|id| ids.contains(&id)))
                    .cloned()
                    .collect(),
                None => products.clone(),
            };
            format!("{}{}", markers.cleaned_text, format_product_info(&shown))
        } else {
            markers.cleaned_text
        };

        Ok(ChatReply {
            response,
            conversation_id: conversation.id,
            timestamp: Utc::now(),
        })
    }

    /// Load the requested conversation, silently creating a fresh one when
    /// the id is missing, unknown, or the lookup fails.
    async fn resolve_conversation(&self, id: Option<&str>) -> Result<Conversation, ChatError> {
        if let Some(id) = id {
            match self.store.get(id).await {
                Ok(Some(conversation)) => return Ok(conversation),
                Ok(None) => {
                    tracing::info!(
                        "[ChatPipeline] Conversation not found with ID: {}, creating new",
                        id
                    );
                }
                Err(e) => {
                    tracing::warn!("[ChatPipeline] Conversation lookup failed: {}", e);
                }
            }
        }

        Ok(self.store.create(None).await?)
    }

    /// For follow-ups, widen the retrieval query with the previous user
    /// question. Skipped when the window holds fewer than two user turns.
    async fn expand_query(&self, history: &[crate::storage::Message], translated: &str) -> String {
        let user_messages: Vec<&crate::storage::Message> = history
            .iter()
            .filter(|msg| msg.role == Role::User)
            .collect();

        if user_messages.len() < 2 {
            return translated.to_string();
        }

        let previous = &user_messages[user_messages.len() - 2].content;
        let previous_translated = self.translator.translate(previous).await;
        format!("{} {}", previous_translated, translated)
    }

    /// Embed the query and run the hybrid search. Any failure is treated as
    /// "no relevant products" rather than an error.
    async fn retrieve(&self, query: &str) -> Vec<Value> {
        let vector = match self.vector.embed(query).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!("[ChatPipeline] Embedding failed: {}", e);
                return Vec::new();
            }
        };

        match self
            .vector
            .hybrid_search(query, &vector, self.alpha, self.search_limit)
            .await
        {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!("[ChatPipeline] Hybrid search failed: {}", e);
                Vec::new()
            }
        }
    }
}
