//! ROS2-shaped wire message definitions.
//!
//! The node's middleware boundary speaks these types as JSON; they follow
//! the field layout of the corresponding ROS2 interface packages so that a
//! bridge to a real middleware is a direct field-for-field mapping.

pub mod builtin_interfaces;
pub mod geometry_msgs;
pub mod nav_msgs;
pub mod std_msgs;
pub mod visualization_msgs;
