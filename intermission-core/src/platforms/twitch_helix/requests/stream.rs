// ========================================================
// File: src/platforms/twitch_helix/requests/stream.rs
// ========================================================
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use crate::Error;
use crate::platforms::twitch_helix::client::{check_status, TwitchHelixClient};

const STREAMS_TIMEOUT: Duration = Duration::from_secs(10);

/// Response from "Get Streams" endpoint. The records themselves are never inspected.
#[derive(Debug, Deserialize)]
pub struct StreamsResponse {
    #[serde(default)]
    pub data: Vec<Value>,
}

impl StreamsResponse {
    pub fn is_live(&self) -> bool {
        !self.data.is_empty()
    }
}

pub(crate) fn streams_request(client: &TwitchHelixClient, user_id: &str) -> RequestBuilder {
    client
        .request(Method::GET, "/streams")
        .query(&[("user_id", user_id)])
        .timeout(STREAMS_TIMEOUT)
}

pub async fn fetch_is_live(client: &TwitchHelixClient, user_id: &str) -> Result<bool, Error> {
    let resp = streams_request(client, user_id).send().await?;
    let resp = check_status(resp, "get streams").await?;
    let body: StreamsResponse = resp.json().await?;
    trace!("[helix] user_id={} live={}", user_id, body.is_live());
    Ok(body.is_live())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_data_means_live() {
        let live: StreamsResponse = serde_json::from_str(r#"{"data":[{"type":"live"}]}"#).unwrap();
        let offline: StreamsResponse = serde_json::from_str(r#"{"data":[],"pagination":{}}"#).unwrap();
        assert!(live.is_live());
        assert!(!offline.is_live());
    }

    #[test]
    fn streams_query_uses_user_id() {
        let client = TwitchHelixClient::with_base_url("t", "c", "http://h/helix");
        let req = streams_request(&client, "1234").build().unwrap();
        assert_eq!(req.url().path(), "/helix/streams");
        assert_eq!(req.url().query(), Some("user_id=1234"));
        assert_eq!(req.timeout(), Some(&STREAMS_TIMEOUT));
    }
}
