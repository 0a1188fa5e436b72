// File: src/platforms/twitch_helix/client.rs

use std::sync::Arc;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::warn;
use crate::Error;

pub const HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

/// A small wrapper client for calling the Helix endpoints the bot uses.
///
/// The request functions in `requests::*` all go through [`TwitchHelixClient::request`]
/// so the `Client-Id` / bearer headers are attached in one place.
pub struct TwitchHelixClient {
    http: Arc<ReqwestClient>,
    bearer_token: String,
    client_id: String,
    base_url: String,
}

impl TwitchHelixClient {
    /// - `bearer_token`: user access token, without any `oauth:` prefix
    /// - `client_id`: the application id the token was issued to
    pub fn new(bearer_token: &str, client_id: &str) -> Self {
        Self::with_base_url(bearer_token, client_id, HELIX_BASE_URL)
    }

    pub fn with_base_url(bearer_token: &str, client_id: &str, base_url: &str) -> Self {
        Self {
            http: Arc::new(ReqwestClient::new()),
            bearer_token: bearer_token.to_string(),
            client_id: client_id.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Starts an authenticated request against `<base_url><path>`.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header("Client-Id", &self.client_id)
            .bearer_auth(&self.bearer_token)
    }
}

/// Passes 2xx responses through. Anything else is logged with its body and
/// turned into `Error::HttpStatus`.
pub(crate) async fn check_status(resp: Response, what: &str) -> Result<Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    warn!("[helix] {}: HTTP {} => {}", what, status, body);
    Err(Error::HttpStatus { status, body })
}
