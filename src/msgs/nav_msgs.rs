//! Definitions for the ROS2 `nav_msgs` package.

use serde::{Deserialize, Serialize};

use super::geometry_msgs::{PoseWithCovariance, TwistWithCovariance};
use super::std_msgs::Header;

/// An estimate of a position and velocity in free space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Odometry {
    #[serde(default)]
    pub header: Header,

    /// Frame id of the robot body the twist refers to.
    #[serde(default)]
    pub child_frame_id: String,

    /// Estimated pose relative to the frame named in the header.
    pub pose: PoseWithCovariance,

    /// Estimated linear and angular velocity relative to `child_frame_id`.
    #[serde(default)]
    pub twist: TwistWithCovariance,
}
