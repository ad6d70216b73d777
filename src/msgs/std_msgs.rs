//! Definitions for the ROS2 `std_msgs` package.

use serde::{Deserialize, Serialize};

use super::builtin_interfaces::Time;

/// Standard metadata for stamped data types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// The time at which the data was produced.
    #[serde(default)]
    pub stamp: Time,

    /// The frame the data is associated with.
    pub frame_id: String,
}
