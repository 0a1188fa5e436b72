use async_trait::async_trait;

pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// Outcome of an image request.
///
/// * `Ok(Some(location))` - a hosted URL or a local file path.
/// * `Ok(None)` - the backend answered but produced nothing.
/// * `Err(message)` - a short, chat-safe failure message.
pub type ImageResult = Result<Option<String>, String>;

/// The generative text/image service the builtin commands lean on.
///
/// Implementations log their own failures; callers only see the soft outcome.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Returns the generated text, or `None` when generation failed.
    async fn generate_text(&self, prompt: &str) -> Option<String>;

    async fn generate_image(&self, prompt: &str, size: &str) -> ImageResult;
}
