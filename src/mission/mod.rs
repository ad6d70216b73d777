//! Two-phase pick-and-place mission state machine
//!
//! Couples goal announcements, pose updates and the pickup dwell timer into
//! a visibility schedule for the marker. The machine is deterministic for a
//! fixed interleaving of events and is the only mutator of [`MarkerModel`].

use crate::common::{arrived, Pose};
use crate::marker::MarkerModel;
use log::{debug, info};

/// Phase of the pick-and-place mission.
///
/// Phases only ever advance in declaration order; no phase is re-entered.
/// The derived `Ord` follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MissionState {
    AwaitingPickupGoal,
    EnRouteToPickup,
    AtPickup,
    EnRouteToDropoff,
    AtDropoff,
}

impl MissionState {
    pub fn name(&self) -> &'static str {
        match self {
            MissionState::AwaitingPickupGoal => "awaiting_pickup_goal",
            MissionState::EnRouteToPickup => "en_route_to_pickup",
            MissionState::AtPickup => "at_pickup",
            MissionState::EnRouteToDropoff => "en_route_to_dropoff",
            MissionState::AtDropoff => "at_dropoff",
        }
    }
}

/// An input to the mission state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MissionEvent {
    /// A goal announcement arrived.
    GoalReceived(Pose),
    /// A pose update arrived.
    PoseUpdated(Pose),
    /// The pickup dwell timer fired.
    DwellExpired,
}

/// A request from the machine back to its scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionSignal {
    /// Arm the pickup dwell timer and feed back
    /// [`MissionEvent::DwellExpired`] when it fires.
    StartDwell,
}

/// The mission state machine.
///
/// Advances through [`MissionState`] on [`MissionEvent`]s, mutating the
/// marker as a side effect. Events that do not match the current phase are
/// ignored; the machine never moves backwards.
#[derive(Debug)]
pub struct MissionMachine {
    state: MissionState,
    /// Target of the current leg. `Some` in every state past
    /// `AwaitingPickupGoal`.
    goal: Option<Pose>,
    /// Dropoff goal announced while the pickup dwell was still running.
    pending_dropoff: Option<Pose>,
    /// Whether the pickup dwell has completed.
    dwell_elapsed: bool,
}

impl MissionMachine {
    pub fn new() -> Self {
        MissionMachine {
            state: MissionState::AwaitingPickupGoal,
            goal: None,
            pending_dropoff: None,
            dwell_elapsed: false,
        }
    }

    /// Current mission phase.
    pub fn state(&self) -> MissionState {
        self.state
    }

    /// Target of the current leg, if one has been announced.
    pub fn goal(&self) -> Option<Pose> {
        self.goal
    }

    /// Apply one event, mutating `marker` per the transition's side effects.
    pub fn handle(
        &mut self,
        event: MissionEvent,
        marker: &mut MarkerModel,
    ) -> Option<MissionSignal> {
        use MissionEvent::*;
        use MissionState::*;

        match (self.state, event) {
            (AwaitingPickupGoal, GoalReceived(goal)) => {
                info!("Robot is on the way to pick up the object");
                self.goal = Some(goal);
                marker.set_pose(&goal);
                marker.show();
                self.state = EnRouteToPickup;
                None
            }

            (EnRouteToPickup, PoseUpdated(pose)) => match self.goal {
                Some(goal) if arrived(&pose, &goal) => {
                    info!("Robot is picking up the object");
                    marker.hide();
                    self.state = AtPickup;
                    self.dwell_elapsed = false;
                    Some(MissionSignal::StartDwell)
                }
                _ => None,
            },

            (EnRouteToPickup, GoalReceived(_)) => {
                // The first pickup goal is honored; later ones are dropped.
                debug!("ignoring goal announcement while en route to pickup");
                None
            }

            (AtPickup, GoalReceived(goal)) => {
                if self.dwell_elapsed {
                    self.depart_for_dropoff(goal, marker);
                } else {
                    // The pickup pause is still running; hold the dropoff
                    // goal and install it when the dwell expires.
                    debug!("holding drop off goal until pickup completes");
                    self.pending_dropoff = Some(goal);
                }
                None
            }

            (AtPickup, DwellExpired) => {
                self.dwell_elapsed = true;
                if let Some(goal) = self.pending_dropoff.take() {
                    self.depart_for_dropoff(goal, marker);
                }
                None
            }

            (EnRouteToDropoff, PoseUpdated(pose)) => {
                if let Some(goal) = self.goal {
                    if arrived(&pose, &goal) {
                        info!("Drop the object at the drop off point");
                        marker.set_pose(&goal);
                        marker.show();
                        self.state = AtDropoff;
                    }
                }
                None
            }

            (EnRouteToDropoff, GoalReceived(_)) => {
                // The dropoff goal is final for this mission.
                debug!("ignoring goal announcement while en route to drop off");
                None
            }

            // The mission is complete; everything else is a no-op. This also
            // swallows pose updates that carry no decision in the current
            // phase and stray dwell expiries.
            _ => None,
        }
    }

    fn depart_for_dropoff(&mut self, goal: Pose, marker: &mut MarkerModel) {
        info!("Robot is on the way to the drop off zone");
        self.goal = Some(goal);
        marker.set_pose(&goal);
        // Still hidden while the object is carried.
        marker.hide();
        self.state = MissionState::EnRouteToDropoff;
    }
}

impl Default for MissionMachine {
    fn default() -> Self {
        MissionMachine::new()
    }
}
