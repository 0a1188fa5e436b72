// src/lib.rs

pub mod platforms;
pub mod cache;
pub mod services;

pub use intermission_common::error::Error;
pub use platforms::twitch_helix::{HelixApi, TwitchHelixClient};
pub use platforms::twitch_eventsub::{ChatEventHandler, EventSubSession, SessionState};
