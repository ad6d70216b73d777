//! Definitions for the ROS2 `builtin_interfaces` package.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A point in time, expressed as seconds and nanoseconds since the epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub sec: i32,
    pub nanosec: u32,
}

impl Time {
    /// Current wall-clock time. Clocks before the epoch clamp to zero.
    pub fn now() -> Self {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Time {
            sec: elapsed.as_secs() as i32,
            nanosec: elapsed.subsec_nanos(),
        }
    }
}
