use std::sync::Arc;
use tracing::{debug, warn};

use crate::Error;
use crate::platforms::twitch_helix::HelixApi;

/// Posts command replies back into chat.
pub struct ReplySender {
    helix: Arc<dyn HelixApi>,
}

impl ReplySender {
    pub fn new(helix: Arc<dyn HelixApi>) -> Self {
        Self { helix }
    }

    /// One POST per reply. Failures are logged here and still returned to the caller.
    pub async fn send_reply(&self, channel_id: &str, sender_id: &str, text: &str) -> Result<(), Error> {
        debug!("Sending reply to channel_id={} ({} chars)", channel_id, text.chars().count());
        if let Err(e) = self.helix.send_chat_message(channel_id, sender_id, text).await {
            warn!("Failed to send reply to channel_id={}: {}", channel_id, e);
            return Err(e);
        }
        Ok(())
    }
}
