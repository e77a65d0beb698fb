//! Polling-mode driver loop
//!
//! The engine runs one reconciliation tick on a fixed interval:
//!
//! ```text
//! IpSource ── candidate ──▶ reconcile ──▶ RuleStore (read, then
//!                                           conditionally write)
//! ```
//!
//! Per-tick errors are caught and logged at the loop boundary; nothing
//! that happens inside a tick terminates the long-running process.
//! There is deliberately no retry-with-backoff and no caching of the
//! stored value: a failed tick simply waits for the next scheduled
//! attempt, and the stored value is re-fetched every time.

use crate::reconcile::{self, Outcome};
use crate::traits::{IpSource, RuleStore};
use std::time::Duration;
use tracing::{error, info};

/// Fixed-interval reconciliation driver
///
/// Single logical worker; the engine owns its source and store and
/// shares nothing, so no locking discipline is needed.
pub struct SyncEngine {
    /// Source of the candidate IP
    ip_source: Box<dyn IpSource>,

    /// Remote rule store (read + conditional write)
    store: Box<dyn RuleStore>,

    /// Delay between reconciliation ticks
    interval: Duration,
}

impl SyncEngine {
    /// Create a new engine
    pub fn new(ip_source: Box<dyn IpSource>, store: Box<dyn RuleStore>, interval: Duration) -> Self {
        Self {
            ip_source,
            store,
            interval,
        }
    }

    /// Run the polling loop until a shutdown signal (SIGINT) arrives
    pub async fn run(&self) -> Result<(), crate::Error> {
        self.run_internal(None).await
    }

    /// Test-only helper to run the loop with a controlled shutdown signal
    ///
    /// Production code should use [`run()`](Self::run), which manages
    /// shutdown via the OS signal rather than a programmatic channel.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<(), crate::Error> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<(), crate::Error> {
        info!(
            "Starting sync loop (source={}, store={}, interval={:?})",
            self.ip_source.source_name(),
            self.store.store_name(),
            self.interval
        );

        if let Some(mut rx) = shutdown_rx {
            loop {
                self.tick_logged().await;
                tokio::select! {
                    _ = tokio::time::sleep(self.interval) => {}
                    _ = &mut rx => {
                        info!("Shutdown signal received");
                        break;
                    }
                }
            }
        } else {
            loop {
                self.tick_logged().await;
                tokio::select! {
                    _ = tokio::time::sleep(self.interval) => {}
                    _ = tokio::signal::ctrl_c() => {
                        info!("Shutdown signal received");
                        break;
                    }
                }
            }
        }

        info!("Sync loop stopped");
        Ok(())
    }

    /// Run one reconciliation tick
    ///
    /// Obtains a fresh candidate from the IP source and reconciles it
    /// against the stored rule value.
    pub async fn tick(&self) -> Result<Outcome, crate::Error> {
        let candidate = self.ip_source.current().await?.to_string();
        reconcile::reconcile(self.store.as_ref(), &candidate).await
    }

    /// Tick wrapper used by the loop: catches and logs, never propagates
    async fn tick_logged(&self) {
        match self.tick().await {
            Ok(Outcome::Changed { previous }) => {
                info!("Rule updated ({} replaced)", previous);
            }
            Ok(Outcome::Unchanged) | Ok(Outcome::Unresolved) => {}
            Err(e) => {
                error!("Tick failed: {}", e);
            }
        }
    }
}
