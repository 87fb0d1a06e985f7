//! The owned periodic loop that drives a single open-loop run.
//!
//! Replaces a self-rescheduling one-shot timer with one `tokio` interval
//! task: the tick cadence is owned here, the run state is owned here, and
//! the loop exits cleanly on the terminal state or an external stop request.

use crate::sink::CommandSink;
use openloop_profile::{MotionPlan, RunState};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The goal time elapsed and the terminal zero command was issued.
    Completed,
    /// An external stop request ended the run early; a final zero command
    /// was issued.
    Aborted,
}

/// Drives one motion plan to completion against a periodic tick.
///
/// `RunState` is touched only inside [`run`](OpenLoopRunner::run); ticks
/// cannot overlap, so no locking is needed around it.
pub struct OpenLoopRunner<S: CommandSink> {
    plan: MotionPlan,
    sink: S,
    tick_interval: Duration,
}

impl<S: CommandSink> OpenLoopRunner<S> {
    pub fn new(plan: MotionPlan, sink: S, tick_interval: Duration) -> Self {
        OpenLoopRunner {
            plan,
            sink,
            tick_interval,
        }
    }

    /// Run the plan until the goal time elapses or `shutdown` fires.
    ///
    /// At most one tick is ever pending (`MissedTickBehavior::Delay`), and
    /// no tick fires after the terminal state or an abort. On a stepper
    /// error the runner fails closed: one zero-velocity command is issued
    /// before the error is returned.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<RunOutcome> {
        // Put the base at rest before the run starts.
        self.sink.send(0.0)?;

        let mut tick = time::interval(self.tick_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first interval tick completes immediately, so the run starts
        // at elapsed ~= 0.
        let started_at = Instant::now();
        let mut state = RunState::new();

        info!(
            profile = %self.plan.kind(),
            total_time_s = self.plan.total_time(),
            "starting open-loop run"
        );

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let elapsed = started_at.elapsed().as_secs_f64();
                    let cmd = match self.plan.step(&mut state, elapsed) {
                        Ok(cmd) => cmd,
                        Err(e) => {
                            error!(error = %e, "stepper failed, commanding halt");
                            self.sink.send(0.0)?;
                            return Err(e.into());
                        }
                    };
                    self.sink.send(cmd.velocity)?;
                    if cmd.done {
                        info!(elapsed_s = elapsed, "goal time reached, base halted");
                        return Ok(RunOutcome::Completed);
                    }
                }
                // A dropped sender also lands here; halting is the safe
                // reaction either way.
                _ = shutdown.changed() => {
                    warn!("stop requested, commanding halt");
                    self.sink.send(0.0)?;
                    return Ok(RunOutcome::Aborted);
                }
            }
        }
    }

    /// Read access to the sink for inspecting what a run emitted.
    #[cfg(test)]
    fn sink(&self) -> &S {
        &self.sink
    }
}
