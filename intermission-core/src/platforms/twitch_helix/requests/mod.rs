pub mod users;
pub mod stream;
pub mod chat;
pub mod eventsub;
