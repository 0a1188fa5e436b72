use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, warn};

use intermission_common::models::CommandContext;

use crate::cache::LiveStatusCache;
use crate::platforms::twitch_eventsub::ChatEventHandler;
use crate::services::activity::BotActivity;
use crate::services::chat_log::ChatLogWriter;
use crate::services::message_sender::ReplySender;
use crate::services::twitch::command_registry::CommandRegistry;

/// Fields the bot needs out of a `channel.chat.message` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessageEvent {
    pub channel_login: String,
    pub broadcaster_id: String,
    pub user_login: String,
    pub text: String,
}

/// The dotted path of the first key that was missing (or not a string).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField(pub &'static str);

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing key '{}'", self.0)
    }
}

impl ChatMessageEvent {
    pub fn from_event(event: &Value) -> Result<Self, MissingField> {
        fn field(event: &Value, pointer: &str, name: &'static str) -> Result<String, MissingField> {
            event
                .pointer(pointer)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(MissingField(name))
        }

        Ok(Self {
            channel_login: field(event, "/broadcaster_user_login", "broadcaster_user_login")?,
            broadcaster_id: field(event, "/broadcaster_user_id", "broadcaster_user_id")?,
            user_login: field(event, "/chatter_user_login", "chatter_user_login")?,
            text: field(event, "/message/text", "message.text")?,
        })
    }

    pub fn context(&self) -> CommandContext {
        CommandContext::new(&self.broadcaster_id, &self.channel_login, &self.user_login)
    }
}

/// Glue between the EventSub session and the command system.
///
/// Holds only shared handles; every step that can fail is logged and ends
/// processing of that one message.
pub struct ChatMessageBridge {
    registry: Arc<CommandRegistry>,
    live_status: Arc<LiveStatusCache>,
    sender: Arc<ReplySender>,
    chat_log: Arc<ChatLogWriter>,
    activity: Arc<BotActivity>,
    bot_user_id: String,
}

impl ChatMessageBridge {
    pub fn new(
        registry: Arc<CommandRegistry>,
        live_status: Arc<LiveStatusCache>,
        sender: Arc<ReplySender>,
        chat_log: Arc<ChatLogWriter>,
        activity: Arc<BotActivity>,
        bot_user_id: &str,
    ) -> Self {
        Self {
            registry,
            live_status,
            sender,
            chat_log,
            activity,
            bot_user_id: bot_user_id.to_string(),
        }
    }

    pub async fn handle_message(&self, msg: ChatMessageEvent) {
        info!("[{} ({})] {}: {}", msg.channel_login, msg.broadcaster_id, msg.user_login, msg.text);

        if !self.activity.is_active() {
            return;
        }

        if let Err(e) = self.chat_log.log_line(&msg.channel_login, &msg.user_login, &msg.text).await {
            warn!("[bridge] could not write chat log for #{}: {}", msg.channel_login, e);
        }

        if msg.text.is_empty() {
            return;
        }

        if self.activity.suppress_when_live() {
            match self.live_status.is_live(&msg.broadcaster_id).await {
                Ok(false) => {}
                Ok(true) => {
                    info!("#{} is live, command suppressed.", msg.channel_login);
                    return;
                }
                Err(e) => {
                    warn!("[bridge] live check failed for #{}, dropping message: {}", msg.channel_login, e);
                    return;
                }
            }
        }

        let ctx = msg.context();
        let reply = match self.registry.dispatch(&ctx, &msg.text).await {
            Ok(Some(reply)) if !reply.is_empty() => reply,
            Ok(_) => return,
            Err(e) => {
                error!("[bridge] command dispatch error: {}", e);
                return;
            }
        };

        if let Err(e) = self.sender.send_reply(&msg.broadcaster_id, &self.bot_user_id, &reply).await {
            error!("[bridge] failed to send reply to #{}: {}", msg.channel_login, e);
        }
    }
}

#[async_trait]
impl ChatEventHandler for ChatMessageBridge {
    async fn on_chat_event(&self, event: &Value) {
        match ChatMessageEvent::from_event(event) {
            Ok(msg) => self.handle_message(msg).await,
            Err(missing) => warn!("[bridge] {} in event payload. Event: {}", missing, event),
        }
    }
}
