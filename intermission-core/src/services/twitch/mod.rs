pub mod builtin_commands;
pub mod chat_bridge;
pub mod command_registry;
pub mod identity_resolver;

pub use chat_bridge::{ChatMessageBridge, ChatMessageEvent, MissingField};
pub use command_registry::{CommandHandler, CommandRegistry, ParsedCommand};
pub use identity_resolver::IdentityResolver;
