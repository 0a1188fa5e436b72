// tests/test_utils/mod.rs
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::protocol::Message;

use intermission_common::models::CommandContext;
use intermission_common::traits::{GenerativeBackend, ImageResult};
use intermission_core::platforms::twitch_eventsub::ChatEventHandler;
use intermission_core::platforms::twitch_helix::{HelixApi, SubscriptionRequest, UserData};
use intermission_core::services::twitch::CommandHandler;
use intermission_core::Error;

mock! {
    pub Helix {}
    #[async_trait]
    impl HelixApi for Helix {
        async fn get_users_by_login(&self, logins: &[String]) -> Result<Vec<UserData>, Error>;
        async fn is_stream_live(&self, user_id: &str) -> Result<bool, Error>;
        async fn send_chat_message(&self, broadcaster_id: &str, sender_id: &str, message: &str) -> Result<(), Error>;
        async fn create_eventsub_subscription(&self, request: &SubscriptionRequest) -> Result<String, Error>;
    }
}

/// Collects every chat event the session hands over.
#[derive(Default)]
pub struct RecordingHandler {
    pub events: Mutex<Vec<Value>>,
}

#[async_trait]
impl ChatEventHandler for RecordingHandler {
    async fn on_chat_event(&self, event: &Value) {
        self.events.lock().push(event.clone());
    }
}

/// Generative backend returning canned answers and counting calls.
pub struct FakeBackend {
    pub text: Option<String>,
    pub image: ImageResult,
    pub text_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new(text: Option<&str>, image: ImageResult) -> Arc<Self> {
        Arc::new(Self {
            text: text.map(String::from),
            image,
            text_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
        })
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeBackend for FakeBackend {
    async fn generate_text(&self, _prompt: &str) -> Option<String> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.text.clone()
    }

    async fn generate_image(&self, _prompt: &str, _size: &str) -> ImageResult {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.image.clone()
    }
}

/// Command handler that counts invocations and answers with a fixed result.
pub struct CountingHandler {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl CountingHandler {
    pub fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), fail })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandHandler for CountingHandler {
    async fn handle(&self, _ctx: &CommandContext, argument: &str) -> Result<Option<String>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Platform("handler failed".into()));
        }
        Ok(Some(format!("pong {argument}").trim_end().to_string()))
    }
}

pub fn user(id: &str, login: &str) -> UserData {
    UserData { id: id.into(), login: login.into(), display_name: login.into() }
}

pub fn chat_event(channel: &str, channel_id: &str, user: &str, text: &str) -> Value {
    json!({
        "broadcaster_user_id": channel_id,
        "broadcaster_user_login": channel,
        "broadcaster_user_name": channel,
        "chatter_user_id": "5000",
        "chatter_user_login": user,
        "chatter_user_name": user,
        "message_id": "msg-1",
        "message": { "text": text, "fragments": [] },
        "message_type": "text"
    })
}

pub fn welcome_frame(session_id: &str, keepalive_secs: u64) -> Message {
    Message::text(
        json!({
            "metadata": { "message_id": "w", "message_type": "session_welcome", "message_timestamp": "2024-01-01T00:00:00Z" },
            "payload": { "session": {
                "id": session_id,
                "status": "connected",
                "keepalive_timeout_seconds": keepalive_secs,
                "reconnect_url": null
            } }
        })
        .to_string(),
    )
}

pub fn keepalive_frame() -> Message {
    Message::text(json!({ "metadata": { "message_type": "session_keepalive" }, "payload": {} }).to_string())
}

pub fn notification_frame(sub_type: &str, event: Value) -> Message {
    Message::text(
        json!({
            "metadata": { "message_type": "notification", "subscription_type": sub_type },
            "payload": {
                "subscription": { "id": "sub-x", "type": sub_type, "version": "1", "status": "enabled" },
                "event": event
            }
        })
        .to_string(),
    )
}

pub fn revocation_frame(sub_id: &str) -> Message {
    Message::text(
        json!({
            "metadata": { "message_type": "revocation" },
            "payload": { "subscription": { "id": sub_id, "type": "channel.chat.message", "status": "user_removed" } }
        })
        .to_string(),
    )
}
