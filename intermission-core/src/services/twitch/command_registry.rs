use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};

use intermission_common::models::CommandContext;

use crate::Error;

pub const DEFAULT_PREFIX: &str = "$";

/// A chat command. `argument` is everything after the command token, already trimmed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext, argument: &str) -> Result<Option<String>, Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lowercased command token.
    pub name: String,
    pub argument: String,
}

/// Name -> handler table plus the prefixes that mark a command.
///
/// Aliases are plain extra keys that share the target's `Arc`.
pub struct CommandRegistry {
    prefixes: Vec<String>,
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Empty prefixes are dropped; with none left the registry falls back to `$`.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut prefixes: Vec<String> = prefixes
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.is_empty())
            .collect();
        if prefixes.is_empty() {
            prefixes.push(DEFAULT_PREFIX.to_string());
        }
        Self { prefixes, handlers: HashMap::new() }
    }

    /// Registers (or silently replaces) `name`.
    pub fn register(&mut self, name: &str, handler: Arc<dyn CommandHandler>) -> Result<(), Error> {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return Err(Error::InvalidCommandName(name.to_string()));
        }
        trace!("Registering command '{}'", key);
        self.handlers.insert(key, handler);
        Ok(())
    }

    pub fn add_alias(&mut self, alias: &str, target: &str) -> Result<(), Error> {
        let alias_key = alias.trim().to_lowercase();
        let target_key = target.trim().to_lowercase();
        if alias_key.is_empty() {
            return Err(Error::InvalidCommandName(alias.to_string()));
        }
        let handler = self
            .handlers
            .get(&target_key)
            .cloned()
            .ok_or_else(|| Error::UnknownCommand(target.to_string()))?;
        self.handlers.insert(alias_key, handler);
        Ok(())
    }

    /// Splits `text` into command token and argument using the first matching prefix.
    pub fn parse(&self, text: &str) -> Option<ParsedCommand> {
        let prefix = self.prefixes.iter().find(|p| text.starts_with(p.as_str()))?;
        let rest = text[prefix.len()..].trim();
        if rest.is_empty() {
            return None;
        }

        let (name, argument) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim_start()),
            None => (rest, ""),
        };

        Some(ParsedCommand {
            name: name.to_lowercase(),
            argument: argument.to_string(),
        })
    }

    /// Unmatched text and unknown commands yield `Ok(None)`. Handler errors are returned untouched.
    pub async fn dispatch(&self, ctx: &CommandContext, text: &str) -> Result<Option<String>, Error> {
        let Some(parsed) = self.parse(text) else {
            return Ok(None);
        };
        let Some(handler) = self.handlers.get(&parsed.name).cloned() else {
            trace!("No handler for '{}'", parsed.name);
            return Ok(None);
        };

        debug!(
            "Dispatching '{}' for user={} in #{}",
            parsed.name, ctx.user_login, ctx.channel_login
        );
        handler.handle(ctx, &parsed.argument).await
    }

    /// All registered names, aliases included, sorted.
    pub fn list_commands(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn handler(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(&name.trim().to_lowercase()).cloned()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new([DEFAULT_PREFIX])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn ctx() -> CommandContext {
        CommandContext::new("123", "somechannel", "viewer")
    }

    fn parsed(name: &str, argument: &str) -> Option<ParsedCommand> {
        Some(ParsedCommand { name: name.into(), argument: argument.into() })
    }

    fn replying(text: &'static str) -> Arc<dyn CommandHandler> {
        let mut h = MockCommandHandler::new();
        h.expect_handle().returning(move |_, _| Ok(Some(text.to_string())));
        Arc::new(h)
    }

    #[test]
    fn parse_splits_command_and_argument() {
        let reg = CommandRegistry::default();
        assert_eq!(reg.parse("$Trivia   space  facts "), parsed("trivia", "space  facts"));
        assert_eq!(reg.parse("$joke"), parsed("joke", ""));
        assert_eq!(reg.parse("$  about"), parsed("about", ""));
        assert_eq!(reg.parse("$image A Cat\tin space"), parsed("image", "A Cat\tin space"));
    }

    #[test]
    fn parse_rejects_unprefixed_and_bare_prefix() {
        let reg = CommandRegistry::default();
        assert_eq!(reg.parse(""), None);
        assert_eq!(reg.parse("hello $joke"), None);
        assert_eq!(reg.parse("$"), None);
        assert_eq!(reg.parse("$   "), None);
        assert_eq!(reg.parse("!joke"), None);
    }

    #[test]
    fn first_configured_prefix_wins() {
        let reg = CommandRegistry::new(["$", "$$"]);
        assert_eq!(reg.parse("$$joke"), parsed("$joke", ""));

        let reg = CommandRegistry::new(["$$", "$"]);
        assert_eq!(reg.parse("$$joke"), parsed("joke", ""));
        assert_eq!(reg.parse("$joke"), parsed("joke", ""));
    }

    #[test]
    fn empty_prefixes_fall_back_to_default() {
        let reg = CommandRegistry::new(["", ""]);
        assert_eq!(reg.prefixes(), ["$".to_string()]);
        let reg = CommandRegistry::new(["!", "", "?"]);
        assert_eq!(reg.prefixes(), ["!".to_string(), "?".to_string()]);
    }

    #[test]
    fn register_normalizes_and_rejects_empty() {
        let mut reg = CommandRegistry::default();
        reg.register("  JOKE ", replying("x")).unwrap();
        assert_eq!(reg.list_commands(), vec!["joke".to_string()]);

        let err = reg.register("   ", replying("x")).unwrap_err();
        assert!(matches!(err, Error::InvalidCommandName(_)));
    }

    #[test]
    fn alias_shares_the_handler() {
        let mut reg = CommandRegistry::default();
        reg.register("inputs", replying("list")).unwrap();
        reg.add_alias("Help", "INPUTS").unwrap();

        let a = reg.handler("help").unwrap();
        let b = reg.handler("inputs").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(reg.list_commands(), vec!["help".to_string(), "inputs".to_string()]);
    }

    #[test]
    fn alias_to_missing_target_fails() {
        let mut reg = CommandRegistry::default();
        let err = reg.add_alias("help", "inputs").unwrap_err();
        assert!(matches!(err, Error::UnknownCommand(t) if t == "inputs"));
        assert!(reg.list_commands().is_empty());
    }

    #[tokio::test]
    async fn dispatch_passes_argument_and_returns_reply() -> Result<(), Error> {
        let mut h = MockCommandHandler::new();
        h.expect_handle()
            .withf(|c: &CommandContext, arg: &str| c.user_login == "viewer" && arg == "a cat")
            .times(2)
            .returning(|_, arg| Ok(Some(format!("got {arg}"))));

        let mut reg = CommandRegistry::default();
        reg.register("image", Arc::new(h))?;
        reg.add_alias("img", "image")?;

        let direct = reg.dispatch(&ctx(), "$image a cat").await?;
        let aliased = reg.dispatch(&ctx(), "$img a cat").await?;
        assert_eq!(direct, Some("got a cat".to_string()));
        assert_eq!(direct, aliased);
        Ok(())
    }

    #[tokio::test]
    async fn dispatch_ignores_noise() -> Result<(), Error> {
        let mut h = MockCommandHandler::new();
        h.expect_handle().times(0);
        let mut reg = CommandRegistry::default();
        reg.register("joke", Arc::new(h))?;

        assert_eq!(reg.dispatch(&ctx(), "just chatting").await?, None);
        assert_eq!(reg.dispatch(&ctx(), "$").await?, None);
        assert_eq!(reg.dispatch(&ctx(), "$unknown thing").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn dispatch_surfaces_handler_errors() {
        let mut h = MockCommandHandler::new();
        h.expect_handle()
            .with(eq(ctx()), eq("boom"))
            .returning(|_, _| Err(Error::Platform("handler blew up".into())));
        let mut reg = CommandRegistry::default();
        reg.register("fail", Arc::new(h)).unwrap();

        let res = reg.dispatch(&ctx(), "$fail boom").await;
        assert!(matches!(res, Err(Error::Platform(_))));
    }

    #[tokio::test]
    async fn handler_none_is_returned_verbatim() -> Result<(), Error> {
        let mut h = MockCommandHandler::new();
        h.expect_handle().times(1).returning(|_, _| Ok(None));
        let mut reg = CommandRegistry::default();
        reg.register("quiet", Arc::new(h))?;
        assert_eq!(reg.dispatch(&ctx(), "$quiet").await?, None);
        Ok(())
    }
}
