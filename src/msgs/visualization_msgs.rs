//! Definitions for the ROS2 `visualization_msgs` package.

use serde::{Deserialize, Serialize};

use super::geometry_msgs::{Pose, Vector3};
use super::std_msgs::Header;

/// An RGBA color; each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// A displayable marker for visualization tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(default)]
    pub header: Header,

    /// Namespace; together with `id` this forms the marker's identity.
    pub ns: String,

    /// Identifier within the namespace. Publishing the same (ns, id)
    /// replaces the prior marker in the viewer.
    pub id: i32,

    /// Shape of the marker, one of the type constants below.
    #[serde(rename = "type")]
    pub kind: i32,

    /// What to do with the marker, one of the action constants below.
    pub action: i32,

    pub pose: Pose,

    /// Side length per axis, meters.
    pub scale: Vector3,

    pub color: ColorRgba,
}

impl Marker {
    pub const ARROW: i32 = 0;
    pub const CUBE: i32 = 1;
    pub const SPHERE: i32 = 2;
    pub const CYLINDER: i32 = 3;

    pub const ADD: i32 = 0;
    pub const MODIFY: i32 = 0;
    pub const DELETE: i32 = 2;
}
