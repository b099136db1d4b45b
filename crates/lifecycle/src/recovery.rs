//! Waiting for shard recoveries to drain.
//!
//! Closing, reopening and relocating indices all start shard recoveries. The
//! maintenance pass waits for the cluster to settle before touching the next
//! index so that recoveries never pile up.

use std::time::Duration;

use esmaint_client::{ClusterTransport, ElasticsearchRecovery};
use esmaint_config::constants::DEFAULT_RECOVERY_POLL_SECS;
use tracing::info;

use crate::cancellation::Context;
use crate::error::TaskError;

/// Polls active recoveries until none remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryWaiter {
    interval: Duration,
}

impl Default for RecoveryWaiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_RECOVERY_POLL_SECS))
    }
}

impl RecoveryWaiter {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll immediately, then once per interval, until the cluster reports
    /// no active recoveries.
    ///
    /// # Errors
    ///
    /// A failed poll aborts with its transport error; cancellation aborts with
    /// `Cancelled` or `DeadlineExceeded`.
    pub async fn wait<T: ClusterTransport>(
        &self,
        transport: &T,
        ctx: &Context,
    ) -> Result<(), TaskError> {
        loop {
            let recoveries = ctx.run(transport.list_active_recoveries()).await?;
            if recoveries.is_empty() {
                return Ok(());
            }
            info!(
                "waiting for cluster recoveries: {}",
                describe_recoveries(&recoveries)
            );
            ctx.sleep(self.interval).await?;
        }
    }
}

/// Render recoveries as `a#0 (12.5%); b#1 (80.0%)`.
pub fn describe_recoveries(recoveries: &[ElasticsearchRecovery]) -> String {
    recoveries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
