//! Command sink: where computed velocity commands go.

use tracing::trace;

/// Downstream consumer of linear-velocity commands.
///
/// Implementations are expected to be non-blocking and always available; no
/// acknowledgment is returned beyond the error channel.
pub trait CommandSink {
    /// Forward one linear-velocity command (m/s) downstream.
    fn send(&mut self, velocity: f64) -> anyhow::Result<()>;
}

/// Sink that emits each command through `tracing`.
///
/// Stands in for the middleware transport that would publish the command to
/// the drive base.
#[derive(Debug, Default)]
pub struct TracingSink {
    sent: u64,
}

impl CommandSink for TracingSink {
    fn send(&mut self, velocity: f64) -> anyhow::Result<()> {
        self.sent += 1;
        trace!(velocity, seq = self.sent, "cmd_vel");
        Ok(())
    }
}
