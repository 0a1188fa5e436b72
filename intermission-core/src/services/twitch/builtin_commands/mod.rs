// File: src/services/twitch/builtin_commands/mod.rs
//! Built-in chat commands: `about`, `inputs`, `touchgrass`, `joke`, `nickname`,
//! `story`, `trivia` and `image`. Each lives in a themed file; this module owns the
//! shared state and wires everything into a [`CommandRegistry`].

pub mod history;
pub mod info_commands;
pub mod generative_commands;
pub mod image_command;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use intermission_common::models::CommandContext;
use intermission_common::traits::GenerativeBackend;

use crate::Error;
use crate::services::twitch::command_registry::{CommandHandler, CommandRegistry};
use history::RecentOutputHistory;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    About,
    Inputs,
    Touchgrass,
    Joke,
    Nickname,
    Story,
    Trivia,
    Image,
}

impl BuiltinKind {
    pub const ALL: [BuiltinKind; 8] = [
        BuiltinKind::About,
        BuiltinKind::Inputs,
        BuiltinKind::Touchgrass,
        BuiltinKind::Joke,
        BuiltinKind::Nickname,
        BuiltinKind::Story,
        BuiltinKind::Trivia,
        BuiltinKind::Image,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinKind::About => "about",
            BuiltinKind::Inputs => "inputs",
            BuiltinKind::Touchgrass => "touchgrass",
            BuiltinKind::Joke => "joke",
            BuiltinKind::Nickname => "nickname",
            BuiltinKind::Story => "story",
            BuiltinKind::Trivia => "trivia",
            BuiltinKind::Image => "image",
        }
    }
}

/// Holds the generative backend and one recent-output history per text command.
pub struct BuiltinCommands {
    backend: Arc<dyn GenerativeBackend>,
    jokes: Mutex<RecentOutputHistory>,
    nicknames: Mutex<RecentOutputHistory>,
    stories: Mutex<RecentOutputHistory>,
    trivia: Mutex<RecentOutputHistory>,
}

impl BuiltinCommands {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self::with_history_capacity(backend, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(backend: Arc<dyn GenerativeBackend>, capacity: usize) -> Self {
        Self {
            backend,
            jokes: Mutex::new(RecentOutputHistory::new(capacity)),
            nicknames: Mutex::new(RecentOutputHistory::new(capacity)),
            stories: Mutex::new(RecentOutputHistory::new(capacity)),
            trivia: Mutex::new(RecentOutputHistory::new(capacity)),
        }
    }

    pub async fn run(
        &self,
        kind: BuiltinKind,
        _ctx: &CommandContext,
        argument: &str,
    ) -> Result<Option<String>, Error> {
        let backend = self.backend.as_ref();
        let reply = match kind {
            BuiltinKind::About => info_commands::handle_about(),
            BuiltinKind::Inputs => info_commands::handle_inputs(),
            BuiltinKind::Touchgrass => info_commands::handle_touchgrass(),
            BuiltinKind::Joke => generative_commands::handle_joke(backend, &self.jokes).await,
            BuiltinKind::Nickname => generative_commands::handle_nickname(backend, &self.nicknames).await,
            BuiltinKind::Story => generative_commands::handle_story(backend, &self.stories).await,
            BuiltinKind::Trivia => {
                generative_commands::handle_trivia(backend, &self.trivia, argument).await
            }
            BuiltinKind::Image => image_command::handle_image(backend, argument).await,
        };
        Ok(reply)
    }

    /// Snapshot of the history behind a text command, oldest first. Empty for the others.
    pub fn recent(&self, kind: BuiltinKind) -> Vec<String> {
        let history = match kind {
            BuiltinKind::Joke => &self.jokes,
            BuiltinKind::Nickname => &self.nicknames,
            BuiltinKind::Story => &self.stories,
            BuiltinKind::Trivia => &self.trivia,
            _ => return Vec::new(),
        };
        history.lock().iter().map(str::to_string).collect()
    }
}

/// Registry adapter: one per builtin name, all sharing the same [`BuiltinCommands`].
pub struct BuiltinHandler {
    commands: Arc<BuiltinCommands>,
    kind: BuiltinKind,
}

#[async_trait]
impl CommandHandler for BuiltinHandler {
    async fn handle(&self, ctx: &CommandContext, argument: &str) -> Result<Option<String>, Error> {
        self.commands.run(self.kind, ctx, argument).await
    }
}

/// Registers every builtin plus the `help` and `commands` aliases for `inputs`.
pub fn register_builtins(
    registry: &mut CommandRegistry,
    backend: Arc<dyn GenerativeBackend>,
) -> Result<Arc<BuiltinCommands>, Error> {
    let commands = Arc::new(BuiltinCommands::new(backend));

    for kind in BuiltinKind::ALL {
        let handler = BuiltinHandler { commands: commands.clone(), kind };
        registry.register(kind.name(), Arc::new(handler))?;
    }
    registry.add_alias("help", BuiltinKind::Inputs.name())?;
    registry.add_alias("commands", BuiltinKind::Inputs.name())?;

    Ok(commands)
}
