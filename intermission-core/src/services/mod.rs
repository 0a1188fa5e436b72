pub mod activity;
pub mod chat_log;
pub mod message_sender;
pub mod twitch;

pub use activity::BotActivity;
pub use chat_log::ChatLogWriter;
pub use message_sender::ReplySender;
