//! Background prune daemon.
//!
//! Runs eviction on its own periodic task so the hot insert path never
//! pays for it. The daemon prunes the reception cache at the longest
//! configured retention window (per-query overrides filter tighter) and
//! sweeps the local decode buffer at the tactical window.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{LocalDecodeBuffer, ReceptionCache, RetentionConfig};

/// Periodic eviction task for the reception cache and decode buffer.
///
/// Same shape as the refresh daemon: a `tokio::time::interval` loop with
/// a biased `select!` on a [`CancellationToken`] for clean shutdown.
pub struct PruneDaemon {
    cache: Arc<ReceptionCache>,
    decodes: Arc<LocalDecodeBuffer>,
    retention: RetentionConfig,
}

impl PruneDaemon {
    /// Create a daemon over the given cache and decode buffer.
    pub fn new(
        cache: Arc<ReceptionCache>,
        decodes: Arc<LocalDecodeBuffer>,
        retention: RetentionConfig,
    ) -> Self {
        Self {
            cache,
            decodes,
            retention,
        }
    }

    /// One prune pass at `now`. Factored out so tests can drive it with a
    /// synthetic clock instead of waiting on the interval.
    pub fn prune_once(&self, now: Instant) -> usize {
        let removed_spots = self.cache.prune(now, self.retention.longest());
        let removed_decodes = self.decodes.prune(now, self.retention.tactical);
        if removed_spots > 0 || removed_decodes > 0 {
            debug!(
                removed_spots,
                removed_decodes,
                live = self.cache.len(),
                "prune pass"
            );
        }
        removed_spots + removed_decodes
    }

    /// Run until shutdown is signalled.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_ms = self.retention.prune_interval.as_millis() as u64,
            retention_secs = self.retention.longest().as_secs(),
            "prune daemon starting"
        );

        let mut interval = tokio::time::interval(self.retention.prune_interval);
        // Skip the first immediate tick
        interval.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("prune daemon shutting down");
                    break;
                }

                _ = interval.tick() => {
                    self.prune_once(Instant::now());
                }
            }
        }
    }
}
