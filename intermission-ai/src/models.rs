use std::path::PathBuf;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the generative backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for authentication. May be empty; requests will then fail and be logged.
    pub api_key: String,

    /// Base URL for API requests
    pub api_base: Option<String>,

    /// Model used for text generation
    pub chat_model: String,

    pub temperature: f32,

    /// Root directory under which base64 images are written (`<log_dir>/images/`)
    pub log_dir: PathBuf,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 1.2,
            log_dir: log_dir.into(),
        }
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}
