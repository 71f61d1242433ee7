// Re-export needed modules for testing
pub mod assistant;
pub mod config;
pub mod models;
pub mod seed;
pub mod store;

// Re-export main types for convenience
pub use assistant::{GeminiClient, GenerateError, TextGenerator};
pub use models::*;
pub use store::{
    ChatStore, StatusDelays, StoreUpdate, ASSISTANT_CHAT_ID, ASSISTANT_FALLBACK_REPLY,
};
