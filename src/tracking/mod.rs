//! Latest-wins tracking of the robot pose

use crate::common::Pose;

/// Holds the most recently observed robot pose.
///
/// A single cell with most-recent-wins semantics: no queueing, no history,
/// no timestamps. Freshness is implicit in the overwrite.
#[derive(Debug, Default)]
pub struct PoseTracker {
    latest: Option<Pose>,
}

impl PoseTracker {
    /// Create a tracker that has not yet seen a pose.
    pub fn new() -> Self {
        PoseTracker { latest: None }
    }

    /// Overwrite the tracked pose. Always succeeds.
    pub fn update(&mut self, pose: Pose) {
        self.latest = Some(pose);
    }

    /// The last observed pose, or `None` if no pose was ever received.
    pub fn current(&self) -> Option<Pose> {
        self.latest
    }
}
