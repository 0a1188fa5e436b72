use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{error, warn};

use intermission_common::traits::{GenerativeBackend, ImageResult};

use crate::models::ProviderConfig;

const CHAT_TIMEOUT: Duration = Duration::from_secs(30);
const IMAGE_TIMEOUT: Duration = Duration::from_secs(60);

pub const NO_IMAGE_DATA: &str = "No image data returned.";
pub const IMAGE_FAILED: &str = "Image generation failed.";

/// What the image endpoint handed back for the first result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    Url(String),
    Base64(String),
    Empty,
}

/// OpenAI-compatible chat + image backend.
pub struct OpenAiBackend {
    config: ProviderConfig,
    client: Client,
}

impl OpenAiBackend {
    pub fn new(config: ProviderConfig) -> Self {
        if config.api_key.is_empty() {
            warn!("OPENAI_API_KEY is not set; generative commands will fail");
        }
        Self { config, client: Client::new() }
    }

    async fn chat_request(&self, prompt: &str) -> Result<Value, reqwest::Error> {
        let response = self.client
            .post(format!("{}/chat/completions", self.config.api_base()))
            .bearer_auth(&self.config.api_key)
            .timeout(CHAT_TIMEOUT)
            .json(&json!({
                "model": self.config.chat_model,
                "messages": [{ "role": "system", "content": prompt }],
                "temperature": self.config.temperature,
            }))
            .send()
            .await?
            .error_for_status()?;

        response.json::<Value>().await
    }

    async fn image_request(&self, prompt: &str, size: &str) -> Result<Value, reqwest::Error> {
        let response = self.client
            .post(format!("{}/images/generations", self.config.api_base()))
            .bearer_auth(&self.config.api_key)
            .timeout(IMAGE_TIMEOUT)
            .json(&json!({
                "prompt": prompt,
                "size": size,
                "n": 1,
            }))
            .send()
            .await?
            .error_for_status()?;

        response.json::<Value>().await
    }
}

#[async_trait]
impl GenerativeBackend for OpenAiBackend {
    async fn generate_text(&self, prompt: &str) -> Option<String> {
        match self.chat_request(prompt).await {
            Ok(data) => {
                let text = extract_chat_text(&data);
                if text.is_none() {
                    error!("OpenAI chat response had no choices: {}", data);
                }
                text
            }
            Err(e) => {
                error!("OpenAI chat error: {}", e);
                None
            }
        }
    }

    async fn generate_image(&self, prompt: &str, size: &str) -> ImageResult {
        let data = match self.image_request(prompt, size).await {
            Ok(d) => d,
            Err(e) => {
                error!("OpenAI image error: {}", e);
                return Err(IMAGE_FAILED.to_string());
            }
        };

        match extract_image_payload(&data) {
            ImagePayload::Url(url) => Ok(Some(url)),
            ImagePayload::Base64(b64) => {
                match save_base64_image(&self.config.log_dir, &b64).await {
                    Ok(path) => Ok(Some(path.display().to_string())),
                    Err(e) => {
                        error!("Failed to save generated image: {}", e);
                        Err(IMAGE_FAILED.to_string())
                    }
                }
            }
            ImagePayload::Empty => Err(NO_IMAGE_DATA.to_string()),
        }
    }
}

/// Pulls `choices[0].message.content`, trimmed. A null content becomes an empty string.
pub fn extract_chat_text(data: &Value) -> Option<String> {
    let first = data["choices"].as_array()?.first()?;
    let content = first["message"]["content"].as_str().unwrap_or_default();
    Some(content.trim().to_string())
}

/// Prefers a hosted URL over an inline base64 payload.
pub fn extract_image_payload(data: &Value) -> ImagePayload {
    let Some(first) = data["data"].as_array().and_then(|a| a.first()) else {
        return ImagePayload::Empty;
    };
    if let Some(url) = first["url"].as_str().filter(|u| !u.is_empty()) {
        return ImagePayload::Url(url.to_string());
    }
    if let Some(b64) = first["b64_json"].as_str().filter(|b| !b.is_empty()) {
        return ImagePayload::Base64(b64.to_string());
    }
    ImagePayload::Empty
}

/// Decodes and writes `<log_dir>/images/image_<YYYYmmdd_HHMMSS>.png`.
pub async fn save_base64_image(log_dir: &Path, b64: &str) -> std::io::Result<PathBuf> {
    let bytes = STANDARD
        .decode(b64)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let dir = log_dir.join("images");
    tokio::fs::create_dir_all(&dir).await?;

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("image_{stamp}.png"));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
