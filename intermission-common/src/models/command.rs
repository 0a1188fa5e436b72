use serde::{Deserialize, Serialize};

/// Who invoked a command and where. Built fresh for every chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandContext {
    pub broadcaster_id: String,
    pub channel_login: String,
    pub user_login: String,
}

impl CommandContext {
    pub fn new(
        broadcaster_id: impl Into<String>,
        channel_login: impl Into<String>,
        user_login: impl Into<String>,
    ) -> Self {
        Self {
            broadcaster_id: broadcaster_id.into(),
            channel_login: channel_login.into(),
            user_login: user_login.into(),
        }
    }
}
