// File: src/services/twitch/builtin_commands/generative_commands.rs
//! `joke`, `nickname`, `story` and `trivia`: text generation with a "don't repeat these" list.

use parking_lot::Mutex;
use rand::seq::IndexedRandom;
use tracing::debug;

use intermission_common::traits::GenerativeBackend;

use super::history::RecentOutputHistory;

pub const TRIVIA_TOPICS: [&str; 11] = [
    "history",
    "internet",
    "culture",
    "movies",
    "Twitch",
    "science",
    "nature",
    "space",
    "technology",
    "music",
    "games",
];

pub fn joke_prompt(recent: &str) -> String {
    format!(
        "You are a stand-up comic performing for Twitch chat. \
         Deliver one fresh, original, Twitch-friendly joke (1–2 lines). \
         Avoid stock jokes and anything mean-spirited. \
         Do not repeat any of these recent jokes:\n{recent}"
    )
}

pub fn nickname_prompt(recent: &str) -> String {
    format!(
        "You are a playful nickname generator for Twitch chat. \
         Output ONE short, creative, positive nickname only—no extra text. \
         Avoid generic terms (buddy, pal) and anything rude. \
         Do not repeat any of these recent nicknames:\n{recent}"
    )
}

pub fn story_prompt(recent: &str) -> String {
    format!(
        "Write an original micro-story under 150 characters. \
         Make it a complete moment (not advice or a quote). \
         Avoid clichés. \
         Do not repeat any of these recent stories:\n{recent}"
    )
}

pub fn trivia_prompt(topic: &str, recent: &str) -> String {
    format!(
        "Give ONE surprising {topic} trivia fact in ≤150 characters. \
         Keep it Twitch-friendly and punchy. \
         Make chat say 'Whoa!'. \
         Do not repeat any of these:\n{recent}"
    )
}

/// Explicit argument if given, otherwise a uniformly random topic.
pub fn pick_trivia_topic(argument: &str) -> String {
    let arg = argument.trim();
    if !arg.is_empty() {
        return arg.to_string();
    }
    TRIVIA_TOPICS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or("history")
        .to_string()
}

/// Builds the prompt from the current history, asks the backend, and records a
/// non-empty result. The lock is released before the backend call.
async fn generate_fresh(
    backend: &dyn GenerativeBackend,
    history: &Mutex<RecentOutputHistory>,
    build_prompt: impl FnOnce(&str) -> String,
) -> Option<String> {
    let prompt = {
        let guard = history.lock();
        build_prompt(&guard.joined())
    };

    let text = backend.generate_text(&prompt).await.filter(|t| !t.is_empty())?;
    history.lock().push(text.clone());
    Some(text)
}

pub async fn handle_joke(
    backend: &dyn GenerativeBackend,
    history: &Mutex<RecentOutputHistory>,
) -> Option<String> {
    generate_fresh(backend, history, joke_prompt).await
}

pub async fn handle_nickname(
    backend: &dyn GenerativeBackend,
    history: &Mutex<RecentOutputHistory>,
) -> Option<String> {
    let name = generate_fresh(backend, history, nickname_prompt).await?;
    Some(format!("🎭 Your new nickname: {name}"))
}

pub async fn handle_story(
    backend: &dyn GenerativeBackend,
    history: &Mutex<RecentOutputHistory>,
) -> Option<String> {
    let story = generate_fresh(backend, history, story_prompt).await?;
    Some(format!("📖 {story}"))
}

pub async fn handle_trivia(
    backend: &dyn GenerativeBackend,
    history: &Mutex<RecentOutputHistory>,
    argument: &str,
) -> Option<String> {
    let topic = pick_trivia_topic(argument);
    debug!("Trivia topic: {}", topic);
    let fact = generate_fresh(backend, history, |recent| trivia_prompt(&topic, recent)).await?;
    Some(format!("🤓 {fact}"))
}
