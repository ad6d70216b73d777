//! Common types and geometry helpers for the add_markers agent

use nalgebra::{Point3, Quaternion};

/// Distance (meters) under which the robot counts as having reached a target.
pub const DIST_THRESHOLD: f64 = 0.4;

/// A 3D pose: position in meters plus an orientation quaternion.
///
/// The quaternion is carried through as received and is not renormalized;
/// the arrival predicate only looks at position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Point3<f64>,
    pub orientation: Quaternion<f64>,
}

impl Pose {
    /// Create a pose from raw position and quaternion components.
    pub fn new(x: f64, y: f64, z: f64, qx: f64, qy: f64, qz: f64, qw: f64) -> Self {
        Pose {
            position: Point3::new(x, y, z),
            orientation: Quaternion::new(qw, qx, qy, qz),
        }
    }

    /// The origin with identity orientation (0, 0, 0, 1).
    pub fn identity() -> Self {
        Pose {
            position: Point3::origin(),
            orientation: Quaternion::identity(),
        }
    }

    /// True when every position and orientation component is finite.
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|v| v.is_finite())
            && self.orientation.coords.iter().all(|v| v.is_finite())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose::identity()
    }
}

/// Euclidean distance between two pose positions; orientation is ignored.
pub fn distance(a: &Pose, b: &Pose) -> f64 {
    nalgebra::distance(&a.position, &b.position)
}

/// Whether the robot at `pos` has arrived at `target`.
///
/// Strict comparison: a distance exactly equal to [`DIST_THRESHOLD`] is not
/// an arrival. NaN components make the comparison false, so undefined poses
/// never count as arrived.
pub fn arrived(pos: &Pose, target: &Pose) -> bool {
    distance(pos, target) < DIST_THRESHOLD
}
