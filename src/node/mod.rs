//! Cooperative event loop for the add_markers node
//!
//! Single-task scheduler that multiplexes the inbound goal and odometry
//! channels, the pickup dwell timer and the fixed-rate publish tick over
//! one `select!` loop. Inbound channels are depth-1 latest-wins cells; the
//! publisher keeps ticking regardless of input arrival.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Result;
use log::{debug, warn};
use tokio::sync::watch;
use tokio::time::{interval, sleep, Sleep};

use crate::adapters;
use crate::mission::{MissionEvent, MissionSignal};
use crate::msgs::{geometry_msgs, nav_msgs, visualization_msgs::Marker};
use crate::AddMarkersAgent;

/// Outbound visualization channel.
///
/// The loop publishes an owned snapshot, so implementations never observe
/// the model itself. A failed publish is logged and retried implicitly on
/// the next tick.
pub trait MarkerSink {
    fn publish(&mut self, marker: &Marker) -> Result<()>;
}

/// Timing parameters of the node.
#[derive(Debug, Clone, Copy)]
pub struct NodeConfig {
    /// Publish cadence for marker snapshots.
    pub publish_period: Duration,
    /// Pause simulating the object pickup.
    pub pickup_dwell: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            publish_period: Duration::from_millis(20), // 50 Hz
            pickup_dwell: Duration::from_secs(5),
        }
    }
}

/// Latest-wins receiver for goal announcements.
pub type GoalReceiver = watch::Receiver<Option<geometry_msgs::Pose>>;

/// Latest-wins receiver for odometry updates.
pub type OdomReceiver = watch::Receiver<Option<nav_msgs::Odometry>>;

/// Run the node until `shutdown` resolves.
///
/// Each loop iteration services, in priority order: shutdown, the dwell
/// timer, the two inbound channels, then the publish tick. Malformed
/// inbound messages are dropped with a debug log; a closed inbound channel
/// disables that arm but never stops the loop.
pub async fn run<S: MarkerSink>(
    config: NodeConfig,
    agent: &mut AddMarkersAgent,
    mut goal_rx: GoalReceiver,
    mut odom_rx: OdomReceiver,
    sink: &mut S,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let mut ticker = interval(config.publish_period);
    let mut dwell: Option<Pin<Box<Sleep>>> = None;
    let mut goal_open = true;
    let mut odom_open = true;

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                debug!("shutdown observed, stopping publisher");
                return Ok(());
            }

            _ = async { if let Some(timer) = dwell.as_mut() { timer.await } }, if dwell.is_some() => {
                dwell = None;
                agent.handle_event(MissionEvent::DwellExpired);
            }

            changed = goal_rx.changed(), if goal_open => match changed {
                Ok(()) => {
                    let msg = goal_rx.borrow_and_update().clone();
                    if let Some(msg) = msg {
                        match adapters::goal_pose(&msg) {
                            Ok(goal) => {
                                if let Some(MissionSignal::StartDwell) =
                                    agent.handle_event(MissionEvent::GoalReceived(goal))
                                {
                                    dwell = Some(Box::pin(sleep(config.pickup_dwell)));
                                }
                            }
                            Err(err) => debug!("dropping goal announcement: {err}"),
                        }
                    }
                }
                Err(_) => goal_open = false,
            },

            changed = odom_rx.changed(), if odom_open => match changed {
                Ok(()) => {
                    let msg = odom_rx.borrow_and_update().clone();
                    if let Some(msg) = msg {
                        match adapters::odom_pose(&msg) {
                            Ok(pose) => {
                                if let Some(MissionSignal::StartDwell) =
                                    agent.handle_event(MissionEvent::PoseUpdated(pose))
                                {
                                    dwell = Some(Box::pin(sleep(config.pickup_dwell)));
                                }
                            }
                            Err(err) => debug!("dropping odometry update: {err}"),
                        }
                    }
                }
                Err(_) => odom_open = false,
            },

            _ = ticker.tick() => {
                let snapshot = agent.snapshot();
                if let Err(err) = sink.publish(&snapshot) {
                    warn!("marker publish failed, retrying next tick: {err}");
                }
            }
        }
    }
}

/// Create a latest-wins goal channel pair.
pub fn goal_channel() -> (watch::Sender<Option<geometry_msgs::Pose>>, GoalReceiver) {
    watch::channel(None)
}

/// Create a latest-wins odometry channel pair.
pub fn odom_channel() -> (watch::Sender<Option<nav_msgs::Odometry>>, OdomReceiver) {
    watch::channel(None)
}
