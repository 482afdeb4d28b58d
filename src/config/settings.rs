use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub llm: LlmConfig,
    pub gemini: GeminiConfig,
    pub search: SearchConfig,
    pub chat: ChatConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// OpenRouter-backed completion model used by the classification agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub endpoint: String,
    pub site_url: String,
    pub app_title: String,
}

/// Gemini models used for response composition and embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub model: String,
    pub embedding_model: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub class_name: String,
    pub alpha: f64,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// How many trailing messages are loaded as context for each request.
    pub history_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// "memory" or "file"
    pub backend: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub development: bool,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let config = Config::builder()
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn openrouter_api_key() -> Result<String> {
        env::var("OPENROUTER_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENROUTER_API_KEY environment variable not set"))
    }

    pub fn gemini_api_key() -> Result<String> {
        env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY environment variable not set"))
    }

    pub fn weaviate_api_key() -> Result<String> {
        env::var("WEAVIATE_API_KEY")
            .map_err(|_| anyhow::anyhow!("WEAVIATE_API_KEY environment variable not set"))
    }

    pub fn weaviate_url() -> Result<String> {
        env::var("WEAVIATE_URL")
            .map_err(|_| anyhow::anyhow!("WEAVIATE_URL environment variable not set"))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                model: "google/gemini-2.0-flash-001".to_string(),
                endpoint: "https://openrouter.ai/api/v1".to_string(),
                site_url: "http://localhost:3000".to_string(),
                app_title: "AI Chatbot".to_string(),
            },
            gemini: GeminiConfig {
                model: "gemini-2.0-flash".to_string(),
                embedding_model: "text-embedding-004".to_string(),
                endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            },
            search: SearchConfig {
                class_name: "Ecommerce".to_string(),
                alpha: 0.5,
                limit: 3,
            },
            chat: ChatConfig { history_limit: 4 },
            storage: StorageConfig {
                backend: "memory".to_string(),
                path: "./conversations".to_string(),
            },
            server: ServerConfig {
                port: 3000,
                development: true,
                allowed_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_sane() {
        let settings = Settings::default();
        assert_eq!(settings.search.alpha, 0.5);
        assert_eq!(settings.search.limit, 3);
        assert_eq!(settings.chat.history_limit, 4);
        assert_eq!(settings.storage.backend, "memory");
    }
}
