//! add_markers node: pick-and-place marker visualization.
//!
//! Reads goal announcements and odometry as JSON lines on stdin and
//! publishes marker snapshots as JSON lines on stdout at 50 Hz:
//!
//! ```text
//! {"topic": "target", "msg": {"position": {...}, "orientation": {...}}}
//! {"topic": "odom",   "msg": {"pose": {"pose": {...}}, ...}}
//! ```
//!
//! Runs until Ctrl-C. Set `RUST_LOG` to control log verbosity.

use std::io::Write;

use anyhow::{Context as _, Result};
use log::debug;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use add_markers_core::msgs::{geometry_msgs, nav_msgs, visualization_msgs::Marker};
use add_markers_core::node::{self, MarkerSink, NodeConfig};
use add_markers_core::AddMarkersAgent;

/// One line of inbound traffic, tagged by topic.
#[derive(Debug, Deserialize)]
#[serde(tag = "topic", content = "msg", rename_all = "snake_case")]
enum Inbound {
    Target(geometry_msgs::Pose),
    Odom(nav_msgs::Odometry),
}

/// Publishes marker snapshots as JSON lines on stdout.
struct StdoutSink;

impl MarkerSink for StdoutSink {
    fn publish(&mut self, marker: &Marker) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer(&mut stdout, marker)?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

/// Forward stdin lines into the latest-wins inbound channels.
async fn read_inputs(
    goal_tx: watch::Sender<Option<geometry_msgs::Pose>>,
    odom_tx: watch::Sender<Option<nav_msgs::Odometry>>,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Inbound>(&line) {
            Ok(Inbound::Target(msg)) => {
                let _ = goal_tx.send(Some(msg));
            }
            Ok(Inbound::Odom(msg)) => {
                let _ = odom_tx.send(Some(msg));
            }
            Err(err) => debug!("dropping malformed input line: {err}"),
        }
    }
    debug!("input stream closed");
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize runtime")?;

    runtime.block_on(async {
        let (goal_tx, goal_rx) = node::goal_channel();
        let (odom_tx, odom_rx) = node::odom_channel();

        tokio::spawn(read_inputs(goal_tx, odom_tx));

        let mut agent = AddMarkersAgent::new();
        let mut sink = StdoutSink;
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
        };

        node::run(
            NodeConfig::default(),
            &mut agent,
            goal_rx,
            odom_rx,
            &mut sink,
            shutdown,
        )
        .await
    })
}
