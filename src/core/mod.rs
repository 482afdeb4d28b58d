pub mod completion;
pub mod gemini;
pub mod weaviate;

pub use completion::{Completion, OpenRouterClient};
pub use gemini::GeminiClient;
pub use weaviate::{VectorStore, WeaviateClient};
