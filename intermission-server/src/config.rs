// File: intermission-server/src/config.rs

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use intermission_core::Error;

pub const DEFAULT_ENV_FILE: &str = "resources/appSettings.env";
pub const DEFAULT_PREFIX: &str = "$";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Everything the bot reads from the environment, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub client_id: String,
    /// User access token with any `oauth:` prefix removed.
    pub access_token: String,
    pub bot_user_id: String,
    pub channels: Vec<String>,
    pub prefixes: Vec<String>,
    pub log_dir: PathBuf,
    pub openai_api_key: String,
    pub openai_chat_model: String,
    pub suppress_when_live: bool,
}

/// Splits on `,` or `;`, trims, drops a leading `#` and lowercases. Empty tokens are skipped.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.replace(';', ",")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_start_matches('#').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl BotConfig {
    /// Builds the config from a key lookup. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let client_id = get("TWITCH_CLIENT_ID");
        let access_token = get("TWITCH_ACCESS_TOKEN")
            .map(|t| t.strip_prefix("oauth:").unwrap_or(&t).to_string())
            .filter(|t| !t.is_empty());
        let bot_user_id = get("TWITCH_BOT_ID");

        let missing: Vec<&str> = [
            ("TWITCH_CLIENT_ID", client_id.is_none()),
            ("TWITCH_ACCESS_TOKEN", access_token.is_none()),
            ("TWITCH_BOT_ID", bot_user_id.is_none()),
        ]
        .into_iter()
        .filter_map(|(k, absent)| absent.then_some(k))
        .collect();
        if !missing.is_empty() {
            return Err(Error::Config(format!("Missing required env keys: {}", missing.join(", "))));
        }

        let channels = get("INITIAL_CHANNELS").map(|v| split_list(&v)).unwrap_or_default();
        if channels.is_empty() {
            return Err(Error::Config("INITIAL_CHANNELS has no channels".into()));
        }

        let mut prefixes = get("PREFIX").map(|v| split_list(&v)).unwrap_or_default();
        if prefixes.is_empty() {
            prefixes.push(DEFAULT_PREFIX.to_string());
        }

        let suppress_when_live = match get("SUPPRESS_WHEN_LIVE") {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                Error::Config(format!("SUPPRESS_WHEN_LIVE must be true/false, got '{raw}'"))
            })?,
        };

        Ok(Self {
            client_id: client_id.unwrap_or_default(),
            access_token: access_token.unwrap_or_default(),
            bot_user_id: bot_user_id.unwrap_or_default(),
            channels,
            prefixes,
            log_dir: PathBuf::from(get("LOG_DIRECTORY").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())),
            openai_api_key: get("OPENAI_API_KEY").unwrap_or_default(),
            openai_chat_model: get("OPENAI_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            suppress_when_live,
        })
    }

    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// Loads `path` into the process environment. A missing file only warns.
pub fn load_env_file(path: &Path) -> Result<(), Error> {
    if !path.exists() {
        warn!("env file not found at {}. Using shell environment only.", path.display());
        return Ok(());
    }
    dotenv::from_path(path).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    info!("Loaded settings from {}", path.display());
    Ok(())
}

pub fn load_config(env_file: &Path) -> Result<BotConfig, Error> {
    load_env_file(env_file)?;
    BotConfig::from_env()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("TWITCH_CLIENT_ID", "cid"),
        ("TWITCH_ACCESS_TOKEN", "oauth:tok"),
        ("TWITCH_BOT_ID", "999"),
        ("INITIAL_CHANNELS", "#Alpha; beta ,, #GAMMA"),
    ];

    #[test]
    fn split_list_normalizes_tokens() {
        assert_eq!(split_list("#Alpha; beta ,, #GAMMA"), vec!["alpha", "beta", "gamma"]);
        assert_eq!(split_list(""), Vec::<String>::new());
        assert_eq!(split_list(" ; , "), Vec::<String>::new());
        assert_eq!(split_list("$,!"), vec!["$", "!"]);
    }

    #[test]
    fn defaults_apply() -> Result<(), Error> {
        let cfg = BotConfig::from_lookup(lookup(&REQUIRED))?;
        assert_eq!(cfg.access_token, "tok");
        assert_eq!(cfg.channels, vec!["alpha", "beta", "gamma"]);
        assert_eq!(cfg.prefixes, vec!["$"]);
        assert_eq!(cfg.log_dir, PathBuf::from("logs"));
        assert_eq!(cfg.openai_chat_model, "gpt-4o-mini");
        assert!(cfg.suppress_when_live);
        Ok(())
    }

    #[test]
    fn overrides_are_read() -> Result<(), Error> {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PREFIX", "!;$"),
            ("LOG_DIRECTORY", "/tmp/chat"),
            ("SUPPRESS_WHEN_LIVE", "no"),
            ("OPENAI_API_KEY", "sk-test"),
        ]);
        let cfg = BotConfig::from_lookup(lookup(&pairs))?;
        assert_eq!(cfg.prefixes, vec!["!", "$"]);
        assert_eq!(cfg.log_dir, PathBuf::from("/tmp/chat"));
        assert!(!cfg.suppress_when_live);
        assert_eq!(cfg.openai_api_key, "sk-test");
        Ok(())
    }

    #[test]
    fn missing_credentials_are_all_named() {
        let err = BotConfig::from_lookup(lookup(&[("TWITCH_CLIENT_ID", "cid"), ("TWITCH_BOT_ID", " ")]))
            .unwrap_err();
        match err {
            Error::Config(msg) => {
                assert!(msg.contains("TWITCH_ACCESS_TOKEN"));
                assert!(msg.contains("TWITCH_BOT_ID"));
                assert!(!msg.contains("TWITCH_CLIENT_ID"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_channel_list_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs[3] = ("INITIAL_CHANNELS", " ; # ");
        assert!(matches!(BotConfig::from_lookup(lookup(&pairs)), Err(Error::Config(_))));
    }

    #[test]
    fn bad_bool_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SUPPRESS_WHEN_LIVE", "sometimes"));
        assert!(matches!(BotConfig::from_lookup(lookup(&pairs)), Err(Error::Config(_))));
    }

    #[test]
    fn env_file_is_optional() -> Result<(), Error> {
        let tmp = tempfile::tempdir()?;
        load_env_file(&tmp.path().join("nope.env"))
    }
}
