// ========================================================
// File: src/platforms/twitch_helix/requests/chat.rs
// ========================================================
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Error;
use crate::platforms::twitch_helix::client::{check_status, TwitchHelixClient};

const SEND_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
pub struct SendChatMessageBody<'a> {
    pub broadcaster_id: &'a str,
    pub sender_id: &'a str,
    pub message: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendChatMessageResponse {
    #[serde(default)]
    data: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    #[serde(default)]
    is_sent: bool,
    #[serde(default)]
    drop_reason: Option<serde_json::Value>,
}

pub(crate) fn send_request(
    client: &TwitchHelixClient,
    broadcaster_id: &str,
    sender_id: &str,
    message: &str,
) -> RequestBuilder {
    client
        .request(Method::POST, "/chat/messages")
        .json(&SendChatMessageBody { broadcaster_id, sender_id, message })
        .timeout(SEND_TIMEOUT)
}

/// POST /chat/messages. A 2xx with `is_sent = false` is only warned about.
pub async fn send_chat_message(
    client: &TwitchHelixClient,
    broadcaster_id: &str,
    sender_id: &str,
    message: &str,
) -> Result<(), Error> {
    let resp = send_request(client, broadcaster_id, sender_id, message).send().await?;
    let resp = check_status(resp, "send chat message").await?;

    if let Ok(body) = resp.json::<SendChatMessageResponse>().await {
        for sent in body.data.iter().filter(|m| !m.is_sent) {
            warn!(
                "[helix] message to broadcaster_id={} was dropped: {:?}",
                broadcaster_id, sent.drop_reason
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_has_the_three_fields() {
        let client = TwitchHelixClient::with_base_url("t", "c", "http://h/helix");
        let req = send_request(&client, "10", "99", "hi chat").build().unwrap();

        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.url().path(), "/helix/chat/messages");
        let bytes = req.body().and_then(|b| b.as_bytes()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"broadcaster_id": "10", "sender_id": "99", "message": "hi chat"})
        );
    }
}
