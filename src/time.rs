//! Wall clock helpers.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Returns the current UNIX timestamp in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or(Duration::from_secs(0)).as_secs()
}
