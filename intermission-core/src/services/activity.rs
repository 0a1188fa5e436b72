use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::info;

/// Global on/off switch for command handling plus the live-suppression policy.
#[derive(Debug)]
pub struct BotActivity {
    active: AtomicBool,
    suppress_when_live: bool,
}

impl BotActivity {
    pub fn new(suppress_when_live: bool) -> Self {
        Self {
            active: AtomicBool::new(true),
            suppress_when_live,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    pub fn suppress_when_live(&self) -> bool {
        self.suppress_when_live
    }

    /// Goes inactive for `duration`, then back to active.
    pub async fn pause_for(&self, duration: Duration) {
        info!("Bot paused for {:?}", duration);
        self.set_active(false);
        tokio::time::sleep(duration).await;
        self.set_active(true);
        info!("Bot active again");
    }
}

impl Default for BotActivity {
    fn default() -> Self {
        Self::new(true)
    }
}
