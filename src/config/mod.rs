mod settings;

pub use settings::{
    ChatConfig, GeminiConfig, LlmConfig, LoggingConfig, SearchConfig, ServerConfig, Settings,
    StorageConfig,
};
