// ========================================================
// File: src/platforms/twitch_helix/requests/users.rs
// ========================================================
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

use crate::Error;
use crate::platforms::twitch_helix::client::{check_status, TwitchHelixClient};

const USERS_TIMEOUT: Duration = Duration::from_secs(15);

/// Response from "Get Users" endpoint.
#[derive(Debug, Deserialize)]
pub struct UsersResponse {
    pub data: Vec<UserData>,
}

/// Single user record. Only the fields we read are kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserData {
    pub id: String,
    pub login: String,
    #[serde(default)]
    pub display_name: String,
}

pub(crate) fn users_request(client: &TwitchHelixClient, logins: &[String]) -> RequestBuilder {
    let query: Vec<(&str, &str)> = logins.iter().map(|l| ("login", l.as_str())).collect();
    client
        .request(Method::GET, "/users")
        .query(&query)
        .timeout(USERS_TIMEOUT)
}

pub async fn fetch_users_by_login(
    client: &TwitchHelixClient,
    logins: &[String],
) -> Result<Vec<UserData>, Error> {
    let resp = users_request(client, logins).send().await?;
    let resp = check_status(resp, "get users").await?;
    let body: UsersResponse = resp.json().await?;
    debug!("[helix] resolved {} of {} logins", body.data.len(), logins.len());
    Ok(body.data)
}
