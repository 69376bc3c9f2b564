//! Deletion waiter
//!
//! Polls a probe for a set of names until none remain or a deadline
//! elapses. The probe answers "does this resource still exist"; the
//! waiter keeps only the names that do and retries on an interval.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

use davit_core::ResourceKind;

use crate::error::{DeployError, Result};

/// Polling cadence for deletion waits.
#[derive(Debug, Clone, Copy)]
pub struct WaitConfig {
    /// Delay between probe rounds.
    pub interval: Duration,
    /// Overall deadline before giving up.
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Wait until every named resource is gone.
///
/// `probe` returns true while the resource still exists. Probe errors
/// abort the wait. On deadline the error carries the names still
/// pending.
pub async fn wait_for_deletion<F, Fut>(
    kind: ResourceKind,
    mut pending: Vec<String>,
    config: &WaitConfig,
    mut probe: F,
) -> Result<()>
where
    F: FnMut(String) -> Fut + Send,
    Fut: Future<Output = Result<bool>> + Send,
{
    let deadline = Instant::now() + config.timeout;
    loop {
        let mut still_pending = Vec::with_capacity(pending.len());
        for name in pending {
            if probe(name.clone()).await? {
                still_pending.push(name);
            }
        }
        pending = still_pending;

        if pending.is_empty() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(DeployError::Timeout { kind, pending });
        }
        debug!(kind = %kind, pending = pending.len(), "waiting for deletion");
        sleep(config.interval).await;
    }
}
