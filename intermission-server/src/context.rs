//! intermission-server/src/context.rs
//!
//! The application context: every long-lived service, built once at startup.

use std::sync::Arc;

use intermission_ai::{OpenAiBackend, ProviderConfig};
use intermission_common::traits::GenerativeBackend;
use intermission_core::cache::LiveStatusCache;
use intermission_core::services::twitch::builtin_commands::register_builtins;
use intermission_core::services::twitch::{ChatMessageBridge, CommandRegistry};
use intermission_core::services::{BotActivity, ChatLogWriter, ReplySender};
use intermission_core::{EventSubSession, Error, HelixApi, TwitchHelixClient};

use crate::config::BotConfig;

pub struct BotContext {
    pub config: BotConfig,
    pub helix: Arc<dyn HelixApi>,
    pub registry: Arc<CommandRegistry>,
    pub bridge: Arc<ChatMessageBridge>,
}

impl BotContext {
    pub async fn new(config: BotConfig) -> Result<Self, Error> {
        let helix: Arc<dyn HelixApi> =
            Arc::new(TwitchHelixClient::new(&config.access_token, &config.client_id));

        let chat_log = Arc::new(ChatLogWriter::new(&config.log_dir));
        chat_log.ensure_images_dir().await?;

        let mut provider = ProviderConfig::new(config.openai_api_key.clone(), config.log_dir.clone());
        provider.chat_model = config.openai_chat_model.clone();
        let backend: Arc<dyn GenerativeBackend> = Arc::new(OpenAiBackend::new(provider));

        let mut registry = CommandRegistry::new(config.prefixes.iter().cloned());
        register_builtins(&mut registry, backend)?;
        let registry = Arc::new(registry);

        let live_status = Arc::new(LiveStatusCache::new(helix.clone()));
        let reply_sender = Arc::new(ReplySender::new(helix.clone()));
        let activity = Arc::new(BotActivity::new(config.suppress_when_live));

        let bridge = Arc::new(ChatMessageBridge::new(
            registry.clone(),
            live_status,
            reply_sender,
            chat_log,
            activity,
            &config.bot_user_id,
        ));

        Ok(Self {
            config,
            helix,
            registry,
            bridge,
        })
    }

    pub fn eventsub_session(&self) -> EventSubSession {
        EventSubSession::new(self.helix.clone(), &self.config.bot_user_id, self.bridge.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intermission_core::SessionState;

    fn config(log_dir: &std::path::Path) -> BotConfig {
        BotConfig {
            client_id: "cid".into(),
            access_token: "tok".into(),
            bot_user_id: "999".into(),
            channels: vec!["alpha".into()],
            prefixes: vec!["!".into()],
            log_dir: log_dir.to_path_buf(),
            openai_api_key: String::new(),
            openai_chat_model: "gpt-4o-mini".into(),
            suppress_when_live: true,
        }
    }

    #[tokio::test]
    async fn builds_registry_and_idle_session() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let ctx = BotContext::new(config(dir.path())).await?;

        assert!(dir.path().join("images").is_dir());
        assert_eq!(ctx.registry.prefixes(), vec!["!".to_string()]);
        let commands = ctx.registry.list_commands();
        assert!(commands.contains(&"image".to_string()));
        assert!(commands.contains(&"help".to_string()));

        let session = ctx.eventsub_session();
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(session.channels().is_empty());
        Ok(())
    }
}
