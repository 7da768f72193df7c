// src/config/ai.rs
use serde::{Deserialize, Serialize};

pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_OPENROUTER_MODEL: &str = "mistralai/mistral-7b-instruct:free";

/// Chat-completion endpoint used to rewrite the headline sections.
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_OPENROUTER_MODEL.to_string(),
            endpoint: DEFAULT_OPENROUTER_URL.to_string(),
        }
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for OpenRouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterConfig")
            .field("api_key_len", &self.api_key.len())
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
