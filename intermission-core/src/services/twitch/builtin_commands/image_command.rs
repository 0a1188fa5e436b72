use intermission_common::traits::{GenerativeBackend, DEFAULT_IMAGE_SIZE};

pub const IMAGE_USAGE_REPLY: &str =
    "🖼️ Please provide a description! Example: `$image a cyberpunk ramen shop at night`";
pub const NO_IMAGE_REPLY: &str = "⚠️ No image returned.";

/// Image generation. Unlike the text commands, every outcome produces a reply.
pub async fn handle_image(backend: &dyn GenerativeBackend, argument: &str) -> Option<String> {
    let description = argument.trim();
    if description.is_empty() {
        return Some(IMAGE_USAGE_REPLY.to_string());
    }

    let reply = match backend.generate_image(description, DEFAULT_IMAGE_SIZE).await {
        Err(err) => format!("⚠️ {err}"),
        Ok(Some(location)) if location.starts_with("http") => {
            format!("🖼️ Here’s your creation: {location}")
        }
        Ok(Some(location)) if !location.is_empty() => {
            format!("🖼️ Image saved locally: {location}")
        }
        Ok(_) => NO_IMAGE_REPLY.to_string(),
    };
    Some(reply)
}
