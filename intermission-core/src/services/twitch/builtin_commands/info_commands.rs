//! Constant replies. No state, no backend calls.

pub const ABOUT_REPLY: &str = "HeyGuys 👋 I’m an AI-powered chatbot built with ChatGPT-5.  \
I hang out in offline chat to keep things lively — ask me for $joke, $trivia, $story, $nickname, or $image. ✨";

pub const INPUTS_REPLY: &str =
    "📋 Commands: $about, $inputs, $joke, $nickname, $story, $touchgrass, $trivia, $image";

pub const TOUCHGRASS_REPLY: &str = "🌱 Touch grass break: breathe, stretch, and look at something far away. \
Your brain will thank you. 😎";

pub fn handle_about() -> Option<String> {
    Some(ABOUT_REPLY.to_string())
}

pub fn handle_inputs() -> Option<String> {
    Some(INPUTS_REPLY.to_string())
}

pub fn handle_touchgrass() -> Option<String> {
    Some(TOUCHGRASS_REPLY.to_string())
}
