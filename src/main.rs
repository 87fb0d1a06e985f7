mod config;    // brings `config.rs` in as `crate::config`
mod scheduler; // brings `scheduler.rs` in as `crate::scheduler`
mod sink;      // brings `sink.rs` in as `crate::sink`

use crate::scheduler::{OpenLoopRunner, RunOutcome};
use crate::sink::TracingSink;

use openloop_profile::{MotionPlan, ProfileKind};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Open-loop drive controller started");

    // One-time parameter loading; any invalid input aborts here, before a
    // single tick is scheduled.
    let settings = config::load_settings()?;
    let kind = ProfileKind::from_selection(settings.run.profile)?;
    let plan = MotionPlan::new(settings.run.distance, kind)?;

    info!(
        profile = %plan.kind(),
        distance_m = plan.distance(),
        expected_travel_time_s = plan.total_time(),
        "planned open-loop move"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let mut runner = OpenLoopRunner::new(
        plan,
        TracingSink::default(),
        Duration::from_secs_f64(settings.control.tick_interval_s),
    );

    match runner.run(shutdown_rx).await? {
        RunOutcome::Completed => info!("Run finished: robot has reached the goal"),
        RunOutcome::Aborted => warn!("Run aborted before the goal time elapsed"),
    }

    Ok(())
}
