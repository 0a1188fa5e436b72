use std::time::Duration;
use serde::{Deserialize, Serialize};

/// A channel login resolved to its stable numeric id.
///
/// Built once by the identity resolver and never changed for the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelIdentity {
    /// Lowercase login, the unique key.
    pub login: String,
    pub numeric_id: String,
}

impl ChannelIdentity {
    pub fn new(login: impl Into<String>, numeric_id: impl Into<String>) -> Self {
        Self {
            login: login.into().to_lowercase(),
            numeric_id: numeric_id.into(),
        }
    }
}

/// Data carried by the `session_welcome` frame. One per websocket connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub session_id: String,
    pub keepalive_timeout: Duration,
}

/// A server-side registration that routes one channel's chat into our session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub channel_login: String,
    pub channel_id: String,
    pub subscription_id: String,
}
