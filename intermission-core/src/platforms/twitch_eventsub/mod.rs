pub mod events;
pub mod runtime;

use async_trait::async_trait;
use serde_json::Value;

pub use events::{parse_frame, EventSubFrame, EventSubNotificationEnvelope, SubscriptionData};
pub use runtime::{EventSubSession, SessionState, EVENTSUB_WS_URL};

/// Receives the raw `event` object of every `channel.chat.message` notification.
///
/// Implementations must not fail: anything that goes wrong is logged and the
/// message dropped, so the receive loop keeps running.
#[async_trait]
pub trait ChatEventHandler: Send + Sync {
    async fn on_chat_event(&self, event: &Value);
}
