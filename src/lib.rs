pub mod adapters;
pub mod common;
pub mod marker;
pub mod mission;
pub mod msgs;
pub mod node;
pub mod tracking;

use log::info;

use crate::common::Pose;
use crate::marker::MarkerModel;
use crate::mission::{MissionEvent, MissionMachine, MissionSignal, MissionState};
use crate::msgs::visualization_msgs::Marker;
use crate::tracking::PoseTracker;

/// Core state of the add_markers node.
///
/// Aggregates the pose tracker, the mission state machine and the marker
/// singleton. The event loop in [`node`] feeds it [`MissionEvent`]s and
/// publishes its snapshots; nothing else mutates it.
#[derive(Debug, Default)]
pub struct AddMarkersAgent {
    tracker: PoseTracker,
    machine: MissionMachine,
    marker: MarkerModel,
}

impl AddMarkersAgent {
    /// Create the agent with a hidden marker and no goal.
    pub fn new() -> Self {
        info!("Waiting for a goal location");
        AddMarkersAgent {
            tracker: PoseTracker::new(),
            machine: MissionMachine::new(),
            marker: MarkerModel::new(),
        }
    }

    /// Apply one mission event.
    ///
    /// Pose updates overwrite the tracker before the state machine sees
    /// them. The returned signal, if any, asks the scheduler to arm the
    /// pickup dwell timer.
    pub fn handle_event(&mut self, event: MissionEvent) -> Option<MissionSignal> {
        if let MissionEvent::PoseUpdated(pose) = event {
            self.tracker.update(pose);
        }
        self.machine.handle(event, &mut self.marker)
    }

    /// An owned copy of the marker for publishing.
    pub fn snapshot(&self) -> Marker {
        self.marker.snapshot()
    }

    /// Current mission phase.
    pub fn state(&self) -> MissionState {
        self.machine.state()
    }

    /// The most recently observed robot pose, if any.
    pub fn current_pose(&self) -> Option<Pose> {
        self.tracker.current()
    }
}
