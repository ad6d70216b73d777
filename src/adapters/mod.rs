//! Inbound message normalizers
//!
//! Thin translators from the wire message shapes to the internal [`Pose`]
//! type. Values are copied out; nothing here holds on to middleware-owned
//! data. Messages with non-finite components are rejected and the caller
//! drops them.

use thiserror::Error;

use crate::common::Pose;
use crate::msgs::{geometry_msgs, nav_msgs};

/// Why an inbound message was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdapterError {
    #[error("non-finite component in {0}")]
    NonFinite(&'static str),
}

fn pose_from_wire(pose: &geometry_msgs::Pose, what: &'static str) -> Result<Pose, AdapterError> {
    let converted = Pose::new(
        pose.position.x,
        pose.position.y,
        pose.position.z,
        pose.orientation.x,
        pose.orientation.y,
        pose.orientation.z,
        pose.orientation.w,
    );
    if converted.is_finite() {
        Ok(converted)
    } else {
        Err(AdapterError::NonFinite(what))
    }
}

/// Normalize a goal announcement into the internal pose type.
pub fn goal_pose(msg: &geometry_msgs::Pose) -> Result<Pose, AdapterError> {
    pose_from_wire(msg, "goal announcement")
}

/// Extract the robot pose embedded in an odometry message.
pub fn odom_pose(msg: &nav_msgs::Odometry) -> Result<Pose, AdapterError> {
    pose_from_wire(&msg.pose.pose, "odometry")
}
