//! Ownership of the single visualization marker

use crate::common::Pose;
use crate::msgs::builtin_interfaces::Time;
use crate::msgs::geometry_msgs::Vector3;
use crate::msgs::visualization_msgs::{ColorRgba, Marker};

/// Frame every marker publication is expressed in.
pub const MARKER_FRAME: &str = "map";

/// Namespace half of the marker identity.
pub const MARKER_NS: &str = "add_markers";

/// Id half of the marker identity.
pub const MARKER_ID: i32 = 0;

/// Cube side length, meters.
const MARKER_SCALE: f64 = 0.4;

/// Owns the process-wide marker singleton.
///
/// Identity, shape, scale and RGB color are fixed at construction; only the
/// pose and the alpha channel change over a mission, and only the mission
/// state machine calls the mutators. The publisher reads via [`snapshot`].
///
/// [`snapshot`]: MarkerModel::snapshot
#[derive(Debug)]
pub struct MarkerModel {
    marker: Marker,
}

impl MarkerModel {
    /// Create the marker: a hidden cube at the origin.
    pub fn new() -> Self {
        let marker = Marker {
            header: crate::msgs::std_msgs::Header {
                stamp: Time::now(),
                frame_id: MARKER_FRAME.to_string(),
            },
            ns: MARKER_NS.to_string(),
            id: MARKER_ID,
            kind: Marker::CUBE,
            action: Marker::ADD,
            pose: Default::default(),
            scale: Vector3::splat(MARKER_SCALE),
            color: ColorRgba {
                r: 0.3,
                g: 0.5,
                b: 0.7,
                a: 0.0,
            },
        };
        MarkerModel { marker }
    }

    /// Move the marker to `pose`.
    ///
    /// Only x, y and the quaternion w component are taken over; the marker
    /// stays in the ground plane with the remaining components at their
    /// initial values.
    pub fn set_pose(&mut self, pose: &Pose) {
        self.marker.pose.position.x = pose.position.x;
        self.marker.pose.position.y = pose.position.y;
        self.marker.pose.orientation.w = pose.orientation.w;
    }

    /// Make the marker visible.
    pub fn show(&mut self) {
        self.marker.color.a = 1.0;
    }

    /// Hide the marker.
    pub fn hide(&mut self) {
        self.marker.color.a = 0.0;
    }

    /// Whether the marker is currently visible.
    pub fn is_visible(&self) -> bool {
        self.marker.color.a > 0.0
    }

    /// An owned copy of the marker for publishing.
    pub fn snapshot(&self) -> Marker {
        self.marker.clone()
    }
}

impl Default for MarkerModel {
    fn default() -> Self {
        MarkerModel::new()
    }
}
