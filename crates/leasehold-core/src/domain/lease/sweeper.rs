//! Background reclamation of stale leases
//!
//! The sweeper runs on its own cadence, concurrently with live acquire,
//! renew, release, and interrupt traffic against the same store. It shares
//! nothing with the lock manager beyond the store itself. Each pass deletes
//! every record whose last renewal predates `now - ttl`, without consulting
//! owner or status; liveness detection is entirely renewal-frequency-based.
//!
//! A legitimate holder whose renewal is overdue past the TTL loses to the
//! sweep; operators keep that rare by choosing renewal frequency well below
//! the TTL and the TTL below the sweep interval's worst-case staleness.

use super::repository::LockRepository;
use crate::error::Result;
use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Configuration for the expiry sweeper
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Age beyond which an unrenewed lease is reclaimed
    pub ttl: Duration,

    /// Cadence of the background reclaim pass
    pub interval: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            interval: Duration::from_secs(5),
        }
    }
}

impl SweeperConfig {
    /// Set the lease TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the sweep cadence
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Periodic background task that reclaims stale leases
#[derive(Debug)]
pub struct ExpirySweeper {
    repo: LockRepository,
    config: SweeperConfig,
}

impl ExpirySweeper {
    /// Create a new sweeper over the given store
    pub fn new(repo: LockRepository, config: SweeperConfig) -> Self {
        Self { repo, config }
    }

    /// Get the configuration
    pub fn config(&self) -> &SweeperConfig {
        &self.config
    }

    /// Run a single reclamation pass
    ///
    /// Deletes every record whose last renewal predates `now - ttl`,
    /// regardless of owner or status. Returns the number of leases
    /// reclaimed.
    pub async fn sweep_once(&self) -> Result<u64> {
        let threshold = Utc::now() - chrono::Duration::seconds(self.config.ttl.as_secs() as i64);
        let reclaimed = self.repo.delete_older_than(threshold).await?;

        if reclaimed > 0 {
            info!(reclaimed = reclaimed, "reclaimed expired leases");
        } else {
            debug!("sweep pass found no expired leases");
        }

        Ok(reclaimed)
    }

    /// Spawn the background sweep loop
    ///
    /// The loop runs one pass immediately, then once per configured
    /// interval, until the returned handle is shut down. A pass that hits a
    /// storage fault is logged and skipped; the loop stays alive.
    pub fn start(self) -> SweeperHandle {
        let token = CancellationToken::new();
        let loop_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.interval);

            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => {
                        debug!("expiry sweeper stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(err) = self.sweep_once().await {
                            warn!(error = %err, "expiry sweep failed");
                        }
                    }
                }
            }
        });

        SweeperHandle { token, handle }
    }
}

/// Handle to a running sweeper task
///
/// Dropping the handle without calling `shutdown` leaves the task running
/// until the runtime itself shuts down.
#[derive(Debug)]
pub struct SweeperHandle {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweep loop and wait for the task to finish
    pub async fn shutdown(self) {
        self.token.cancel();
        let _ = self.handle.await;
    }

    /// Whether the sweep task has finished
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
