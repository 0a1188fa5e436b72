use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::Error;
use crate::platforms::twitch_helix::HelixApi;

pub const LIVE_STATUS_FRESHNESS: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy)]
pub struct LiveStatusEntry {
    pub is_live: bool,
    pub checked_at: Instant,
}

/// Short-lived "is this channel broadcasting" cache, keyed by numeric channel id.
///
/// Entries are only ever replaced whole. There is no eviction; the key set is the
/// configured channel list.
pub struct LiveStatusCache {
    helix: Arc<dyn HelixApi>,
    freshness: Duration,
    entries: Mutex<HashMap<String, LiveStatusEntry>>,
}

impl LiveStatusCache {
    pub fn new(helix: Arc<dyn HelixApi>) -> Self {
        Self::with_freshness(helix, LIVE_STATUS_FRESHNESS)
    }

    pub fn with_freshness(helix: Arc<dyn HelixApi>, freshness: Duration) -> Self {
        Self {
            helix,
            freshness,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn is_live(&self, channel_id: &str) -> Result<bool, Error> {
        if let Some(entry) = self.cached(channel_id) {
            return Ok(entry.is_live);
        }

        let is_live = self.helix.is_stream_live(channel_id).await?;
        debug!("Live status refreshed for channel_id={} => {}", channel_id, is_live);

        self.entries.lock().insert(
            channel_id.to_string(),
            LiveStatusEntry { is_live, checked_at: Instant::now() },
        );
        Ok(is_live)
    }

    /// The entry for `channel_id` if it is still inside the freshness window.
    pub fn cached(&self, channel_id: &str) -> Option<LiveStatusEntry> {
        let guard = self.entries.lock();
        guard
            .get(channel_id)
            .filter(|e| e.checked_at.elapsed() < self.freshness)
            .copied()
    }
}
