//! HTTP surface: the chat endpoint plus conversation management routes.
//!
//! JSON error payloads mirror the chat widget's wire contract; every
//! failure mode maps to a status code plus an `{ "error": ... }` body.

use crate::config::ServerConfig;
use crate::pipeline::{ChatError, ChatPipeline};
use crate::storage::ConversationStore;
use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub struct AppState {
    pub pipeline: ChatPipeline,
    pub store: Arc<dyn ConversationStore>,
}

#[derive(Debug, Deserialize)]
struct ChatRequestBody {
    message: Option<String>,
    #[serde(rename = "conversationId")]
    conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatResponseBody {
    response: String,
    #[serde(rename = "conversationId")]
    conversation_id: String,
    timestamp: String,
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({"error": message.into()}))).into_response()
}

async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequestBody>,
) -> Response {
    let message = body.message.unwrap_or_default();

    match state
        .pipeline
        .process(&message, body.conversation_id.as_deref())
        .await
    {
        Ok(reply) => Json(ChatResponseBody {
            response: reply.response,
            conversation_id: reply.conversation_id,
            timestamp: reply.timestamp.to_rfc3339(),
        })
        .into_response(),
        Err(e @ ChatError::EmptyMessage) => error_body(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e @ ChatError::Internal(_)) => {
            tracing::error!("[Server] Chat processing error: {}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn list_conversations(State(state): State<Arc<AppState>>) -> Response {
    match state.store.list_all().await {
        Ok(conversations) => Json(conversations).into_response(),
        Err(e) => error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.store.get(&id).await {
        Ok(Some(conversation)) => Json(conversation).into_response(),
        Ok(None) => error_body(StatusCode::NOT_FOUND, "Conversation not found"),
        Err(e) => error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.store.delete(&id).await {
        Ok(existed) => Json(json!({"success": existed})).into_response(),
        Err(e) => error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    if config.development {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/conversations", get(list_conversations))
        .route(
            "/api/conversations/{id}",
            get(get_conversation).delete(delete_conversation),
        )
        .layer(cors_layer(config))
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, config: &ServerConfig) -> Result<()> {
    let app = router(state, config);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("[Server] Listening on port {}", config.port);
    axum::serve(listener, app).await?;
    Ok(())
}
