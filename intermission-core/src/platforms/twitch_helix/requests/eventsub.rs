// ========================================================
// File: src/platforms/twitch_helix/requests/eventsub.rs
// ========================================================
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::platforms::twitch_helix::client::{check_status, TwitchHelixClient};

pub const CHAT_MESSAGE_TYPE: &str = "channel.chat.message";
const SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionRequest {
    #[serde(rename = "type")]
    pub sub_type: String,
    pub version: String,
    pub condition: SubscriptionCondition,
    pub transport: SubscriptionTransport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionCondition {
    pub broadcaster_user_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionTransport {
    pub method: String,
    pub session_id: String,
}

impl SubscriptionRequest {
    /// `channel.chat.message` v1 for one channel, read as `bot_user_id`, delivered to `session_id`.
    pub fn chat_message(broadcaster_user_id: &str, bot_user_id: &str, session_id: &str) -> Self {
        Self {
            sub_type: CHAT_MESSAGE_TYPE.to_string(),
            version: "1".to_string(),
            condition: SubscriptionCondition {
                broadcaster_user_id: broadcaster_user_id.to_string(),
                user_id: bot_user_id.to_string(),
            },
            transport: SubscriptionTransport {
                method: "websocket".to_string(),
                session_id: session_id.to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateSubscriptionResponse {
    data: Vec<CreatedSubscription>,
}

#[derive(Debug, Deserialize)]
struct CreatedSubscription {
    id: String,
}

pub(crate) fn subscribe_request(client: &TwitchHelixClient, body: &SubscriptionRequest) -> RequestBuilder {
    client
        .request(Method::POST, "/eventsub/subscriptions")
        .json(body)
        .timeout(SUBSCRIBE_TIMEOUT)
}

pub async fn create_subscription(
    client: &TwitchHelixClient,
    body: &SubscriptionRequest,
) -> Result<String, Error> {
    let resp = subscribe_request(client, body).send().await?;
    let resp = check_status(resp, "create eventsub subscription").await?;
    let parsed: CreateSubscriptionResponse = resp.json().await?;
    parsed
        .data
        .into_iter()
        .next()
        .map(|s| s.id)
        .ok_or_else(|| Error::Platform("subscription response had no data".into()))
}
