// File: src/platforms/twitch_helix/mod.rs

pub mod client;
pub mod requests;

use async_trait::async_trait;

use crate::Error;
pub use client::TwitchHelixClient;
pub use requests::eventsub::SubscriptionRequest;
pub use requests::users::UserData;

/// The slice of the Helix REST API the bot needs.
///
/// Every non-2xx response is logged by the implementation and surfaced as
/// `Error::HttpStatus`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HelixApi: Send + Sync {
    /// One batched `GET /users` with a repeated `login` parameter.
    async fn get_users_by_login(&self, logins: &[String]) -> Result<Vec<UserData>, Error>;

    /// `true` when `GET /streams?user_id=` returns at least one stream.
    async fn is_stream_live(&self, user_id: &str) -> Result<bool, Error>;

    async fn send_chat_message(
        &self,
        broadcaster_id: &str,
        sender_id: &str,
        message: &str,
    ) -> Result<(), Error>;

    /// Returns the id of the created subscription.
    async fn create_eventsub_subscription(&self, request: &SubscriptionRequest) -> Result<String, Error>;
}

#[async_trait]
impl HelixApi for TwitchHelixClient {
    async fn get_users_by_login(&self, logins: &[String]) -> Result<Vec<UserData>, Error> {
        requests::users::fetch_users_by_login(self, logins).await
    }

    async fn is_stream_live(&self, user_id: &str) -> Result<bool, Error> {
        requests::stream::fetch_is_live(self, user_id).await
    }

    async fn send_chat_message(
        &self,
        broadcaster_id: &str,
        sender_id: &str,
        message: &str,
    ) -> Result<(), Error> {
        requests::chat::send_chat_message(self, broadcaster_id, sender_id, message).await
    }

    async fn create_eventsub_subscription(&self, request: &SubscriptionRequest) -> Result<String, Error> {
        requests::eventsub::create_subscription(self, request).await
    }
}
