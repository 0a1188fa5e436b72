pub mod live_status;

pub use live_status::{LiveStatusCache, LiveStatusEntry, LIVE_STATUS_FRESHNESS};
