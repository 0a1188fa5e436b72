// File: intermission-common/src/models/mod.rs
pub mod channel;
pub mod command;

pub use channel::{ChannelIdentity, SessionInfo, Subscription};
pub use command::CommandContext;
