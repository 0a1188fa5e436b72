pub mod twitch_helix;
pub mod twitch_eventsub;
