//! End-to-end mission scenarios.
//!
//! Each test drives the node event loop with scripted goal and odometry
//! traffic under a paused tokio clock, then checks the published marker
//! stream: identity is constant, visibility follows the mission phases,
//! and the publisher keeps ticking regardless of input starvation.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::{oneshot, watch};
use tokio::time::sleep;

use add_markers_core::marker::{MARKER_FRAME, MARKER_ID, MARKER_NS};
use add_markers_core::mission::MissionState;
use add_markers_core::msgs::geometry_msgs::{Point, Pose as WirePose, PoseWithCovariance};
use add_markers_core::msgs::nav_msgs::Odometry;
use add_markers_core::msgs::visualization_msgs::Marker;
use add_markers_core::node::{self, MarkerSink, NodeConfig};
use add_markers_core::AddMarkersAgent;

#[derive(Default)]
struct RecordingSink {
    published: Vec<Marker>,
}

impl MarkerSink for RecordingSink {
    fn publish(&mut self, marker: &Marker) -> Result<()> {
        self.published.push(marker.clone());
        Ok(())
    }
}

fn wire_pose(x: f64, y: f64) -> WirePose {
    WirePose {
        position: Point { x, y, z: 0.0 },
        orientation: Default::default(),
    }
}

fn odom_at(x: f64, y: f64) -> Odometry {
    Odometry {
        pose: PoseWithCovariance {
            pose: wire_pose(x, y),
            covariance: Vec::new(),
        },
        ..Default::default()
    }
}

/// Collapse the published alpha sequence into its distinct visibility
/// phases, e.g. hidden → visible → hidden becomes `[false, true, false]`.
fn visibility_phases(published: &[Marker]) -> Vec<bool> {
    let mut phases: Vec<bool> = Vec::new();
    for marker in published {
        let visible = marker.color.a > 0.0;
        if phases.last() != Some(&visible) {
            phases.push(visible);
        }
    }
    phases
}

fn assert_constant_identity(published: &[Marker]) {
    assert!(!published.is_empty(), "nothing was published");
    for marker in published {
        assert_eq!(marker.ns, MARKER_NS);
        assert_eq!(marker.id, MARKER_ID);
        assert_eq!(marker.header.frame_id, MARKER_FRAME);
        assert_eq!(marker.kind, Marker::CUBE);
        assert_eq!(marker.scale.x, 0.4);
        assert_eq!((marker.color.r, marker.color.g, marker.color.b), (0.3, 0.5, 0.7));
    }
}

struct Harness {
    agent: AddMarkersAgent,
    sink: RecordingSink,
    goal_tx: watch::Sender<Option<WirePose>>,
    odom_tx: watch::Sender<Option<Odometry>>,
}

impl Harness {
    fn new() -> (
        Self,
        node::GoalReceiver,
        node::OdomReceiver,
        oneshot::Sender<()>,
        oneshot::Receiver<()>,
    ) {
        let (goal_tx, goal_rx) = node::goal_channel();
        let (odom_tx, odom_rx) = node::odom_channel();
        let (stop_tx, stop_rx) = oneshot::channel();
        let harness = Harness {
            agent: AddMarkersAgent::new(),
            sink: RecordingSink::default(),
            goal_tx,
            odom_tx,
        };
        (harness, goal_rx, odom_rx, stop_tx, stop_rx)
    }
}

/// Give the event loop a beat to drain the channels between sends.
const BEAT: Duration = Duration::from_millis(30);

#[tokio::test(start_paused = true)]
async fn happy_path_pickup_then_dropoff() {
    let (mut h, goal_rx, odom_rx, stop_tx, stop_rx) = Harness::new();

    let driver = async {
        sleep(Duration::from_millis(50)).await;
        h.goal_tx.send(Some(wire_pose(3.0, 0.0))).unwrap();
        sleep(BEAT).await;

        for x in [0.0, 1.0, 2.0, 3.0] {
            h.odom_tx.send(Some(odom_at(x, 0.0))).unwrap();
            sleep(BEAT).await;
        }

        // Sit out the 5 s pickup dwell, then announce the dropoff.
        sleep(Duration::from_secs(6)).await;
        h.goal_tx.send(Some(wire_pose(3.0, 3.0))).unwrap();
        sleep(BEAT).await;

        for y in [0.0, 1.5, 3.0] {
            h.odom_tx.send(Some(odom_at(3.0, y))).unwrap();
            sleep(BEAT).await;
        }

        sleep(Duration::from_millis(100)).await;
        let _ = stop_tx.send(());
    };

    let run = node::run(
        NodeConfig::default(),
        &mut h.agent,
        goal_rx,
        odom_rx,
        &mut h.sink,
        async {
            let _ = stop_rx.await;
        },
    );
    let (result, ()) = tokio::join!(run, driver);
    result.unwrap();

    assert_eq!(h.agent.state(), MissionState::AtDropoff);
    assert_constant_identity(&h.sink.published);
    assert_eq!(
        visibility_phases(&h.sink.published),
        [false, true, false, true],
        "marker must go hidden → pickup → carried → dropoff"
    );

    let last = h.sink.published.last().unwrap();
    assert_eq!(last.pose.position.x, 3.0);
    assert_eq!(last.pose.position.y, 3.0);
    assert_eq!(last.color.a, 1.0);
}

#[tokio::test(start_paused = true)]
async fn arrival_at_exact_threshold_keeps_marker_at_pickup() {
    let (mut h, goal_rx, odom_rx, stop_tx, stop_rx) = Harness::new();

    let driver = async {
        h.goal_tx.send(Some(wire_pose(0.4, 0.0))).unwrap();
        sleep(BEAT).await;
        h.odom_tx.send(Some(odom_at(0.0, 0.0))).unwrap();
        sleep(BEAT).await;
        let _ = stop_tx.send(());
    };

    let run = node::run(
        NodeConfig::default(),
        &mut h.agent,
        goal_rx,
        odom_rx,
        &mut h.sink,
        async {
            let _ = stop_rx.await;
        },
    );
    let (result, ()) = tokio::join!(run, driver);
    result.unwrap();

    assert_eq!(h.agent.state(), MissionState::EnRouteToPickup);
    let last = h.sink.published.last().unwrap();
    assert_eq!(last.color.a, 1.0);
    assert_eq!(last.pose.position.x, 0.4);
}

#[tokio::test(start_paused = true)]
async fn duplicate_pickup_goals_keep_the_first() {
    let (mut h, goal_rx, odom_rx, stop_tx, stop_rx) = Harness::new();

    let driver = async {
        h.goal_tx.send(Some(wire_pose(1.0, 0.0))).unwrap();
        sleep(BEAT).await;
        h.goal_tx.send(Some(wire_pose(2.0, 0.0))).unwrap();
        sleep(BEAT).await;
        let _ = stop_tx.send(());
    };

    let run = node::run(
        NodeConfig::default(),
        &mut h.agent,
        goal_rx,
        odom_rx,
        &mut h.sink,
        async {
            let _ = stop_rx.await;
        },
    );
    let (result, ()) = tokio::join!(run, driver);
    result.unwrap();

    assert_eq!(h.agent.state(), MissionState::EnRouteToPickup);
    let last = h.sink.published.last().unwrap();
    assert_eq!(last.pose.position.x, 1.0);
}

#[tokio::test(start_paused = true)]
async fn publisher_ticks_through_goal_starvation() {
    let (mut h, goal_rx, odom_rx, stop_tx, stop_rx) = Harness::new();

    let driver = async {
        // More than 50 tick periods with no traffic at all.
        sleep(Duration::from_millis(1050)).await;
        h.goal_tx.send(Some(wire_pose(5.0, 5.0))).unwrap();
        sleep(BEAT).await;
        let _ = stop_tx.send(());
    };

    let run = node::run(
        NodeConfig::default(),
        &mut h.agent,
        goal_rx,
        odom_rx,
        &mut h.sink,
        async {
            let _ = stop_rx.await;
        },
    );
    let (result, ()) = tokio::join!(run, driver);
    result.unwrap();

    let hidden = h
        .sink
        .published
        .iter()
        .take_while(|m| m.color.a == 0.0)
        .count();
    assert!(hidden >= 50, "expected at least 50 hidden ticks, got {hidden}");
    assert_constant_identity(&h.sink.published);

    let last = h.sink.published.last().unwrap();
    assert_eq!(last.color.a, 1.0);
    assert_eq!(last.pose.position.x, 5.0);
    assert_eq!(last.pose.position.y, 5.0);
}

#[tokio::test(start_paused = true)]
async fn poses_before_goal_then_instant_pickup() {
    let (mut h, goal_rx, odom_rx, stop_tx, stop_rx) = Harness::new();

    let driver = async {
        for _ in 0..10 {
            h.odom_tx.send(Some(odom_at(5.0, 5.0))).unwrap();
            sleep(BEAT).await;
        }
        h.goal_tx.send(Some(wire_pose(5.0, 5.0))).unwrap();
        sleep(BEAT).await;
        h.odom_tx.send(Some(odom_at(5.0, 5.0))).unwrap();
        sleep(BEAT).await;
        let _ = stop_tx.send(());
    };

    let run = node::run(
        NodeConfig::default(),
        &mut h.agent,
        goal_rx,
        odom_rx,
        &mut h.sink,
        async {
            let _ = stop_rx.await;
        },
    );
    let (result, ()) = tokio::join!(run, driver);
    result.unwrap();

    assert_eq!(h.agent.state(), MissionState::AtPickup);
    assert_eq!(
        visibility_phases(&h.sink.published),
        [false, true, false],
        "visibility must flip hidden → visible → hidden"
    );
}

#[tokio::test(start_paused = true)]
async fn dropoff_is_terminal_for_later_traffic() {
    let (mut h, goal_rx, odom_rx, stop_tx, stop_rx) = Harness::new();

    let driver = async {
        h.goal_tx.send(Some(wire_pose(1.0, 0.0))).unwrap();
        sleep(BEAT).await;
        h.odom_tx.send(Some(odom_at(1.0, 0.0))).unwrap();
        sleep(Duration::from_secs(6)).await;
        h.goal_tx.send(Some(wire_pose(2.0, 2.0))).unwrap();
        sleep(BEAT).await;
        h.odom_tx.send(Some(odom_at(2.0, 2.0))).unwrap();
        sleep(BEAT).await;

        // Mission is over; these must change nothing.
        h.goal_tx.send(Some(wire_pose(9.0, 9.0))).unwrap();
        sleep(BEAT).await;
        h.odom_tx.send(Some(odom_at(9.0, 9.0))).unwrap();
        sleep(BEAT).await;
        let _ = stop_tx.send(());
    };

    let run = node::run(
        NodeConfig::default(),
        &mut h.agent,
        goal_rx,
        odom_rx,
        &mut h.sink,
        async {
            let _ = stop_rx.await;
        },
    );
    let (result, ()) = tokio::join!(run, driver);
    result.unwrap();

    assert_eq!(h.agent.state(), MissionState::AtDropoff);
    let last = h.sink.published.last().unwrap();
    assert_eq!(last.color.a, 1.0);
    assert_eq!(last.pose.position.x, 2.0);
    assert_eq!(last.pose.position.y, 2.0);
}

#[tokio::test(start_paused = true)]
async fn shutdown_during_dwell_terminates_promptly() {
    let (mut h, goal_rx, odom_rx, stop_tx, stop_rx) = Harness::new();
    let started = tokio::time::Instant::now();

    let driver = async {
        h.goal_tx.send(Some(wire_pose(1.0, 0.0))).unwrap();
        sleep(BEAT).await;
        h.odom_tx.send(Some(odom_at(1.0, 0.0))).unwrap();
        // One second into the five second dwell, shut down.
        sleep(Duration::from_secs(1)).await;
        let _ = stop_tx.send(());
    };

    let run = node::run(
        NodeConfig::default(),
        &mut h.agent,
        goal_rx,
        odom_rx,
        &mut h.sink,
        async {
            let _ = stop_rx.await;
        },
    );
    let (result, ()) = tokio::join!(run, driver);
    result.unwrap();

    assert_eq!(h.agent.state(), MissionState::AtPickup);
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "loop must not run out the dwell after shutdown"
    );
    assert_eq!(h.sink.published.last().unwrap().color.a, 0.0);
}

#[tokio::test(start_paused = true)]
async fn malformed_traffic_is_dropped_without_state_change() {
    let (mut h, goal_rx, odom_rx, stop_tx, stop_rx) = Harness::new();

    let driver = async {
        let mut bad_goal = wire_pose(1.0, 0.0);
        bad_goal.position.x = f64::NAN;
        h.goal_tx.send(Some(bad_goal)).unwrap();
        sleep(BEAT).await;

        let mut bad_odom = odom_at(0.0, 0.0);
        bad_odom.pose.pose.orientation.w = f64::INFINITY;
        h.odom_tx.send(Some(bad_odom)).unwrap();
        sleep(BEAT).await;
        let _ = stop_tx.send(());
    };

    let run = node::run(
        NodeConfig::default(),
        &mut h.agent,
        goal_rx,
        odom_rx,
        &mut h.sink,
        async {
            let _ = stop_rx.await;
        },
    );
    let (result, ()) = tokio::join!(run, driver);
    result.unwrap();

    assert_eq!(h.agent.state(), MissionState::AwaitingPickupGoal);
    assert!(h.agent.current_pose().is_none());
    assert!(h.sink.published.iter().all(|m| m.color.a == 0.0));
}
