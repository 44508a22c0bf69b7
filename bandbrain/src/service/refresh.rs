//! Periodic tactical refresh.
//!
//! Recomputes the full assessment on a fixed cadence and publishes it on
//! a watch channel. Watch semantics give coalescing for free: a consumer
//! that falls behind sees only the latest assessment, never a backlog.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Assessment, BandBrainService, BrainError};

/// Receiver side of the published assessments. `None` until the first
/// refresh with a selected target.
pub type AssessmentReceiver = watch::Receiver<Option<Assessment>>;

/// Recomputes and publishes the tactical assessment on an interval.
pub struct RefreshDaemon {
    service: Arc<BandBrainService>,
    interval: Duration,
    tx: watch::Sender<Option<Assessment>>,
}

impl RefreshDaemon {
    /// Create a daemon over `service`, refreshing at the configured
    /// interval. Returns the daemon and the receiver consumers subscribe
    /// to.
    pub fn new(service: Arc<BandBrainService>) -> (Self, AssessmentReceiver) {
        let interval = service.config().refresh_interval;
        let (tx, rx) = watch::channel(None);
        (
            Self {
                service,
                interval,
                tx,
            },
            rx,
        )
    }

    /// One refresh pass at `now`. Factored out so tests can drive it with
    /// a synthetic clock.
    ///
    /// No target selected is the idle state, not a fault: the published
    /// value is cleared so consumers stop displaying a stale assessment.
    pub fn refresh_once(&self, now: Instant) {
        match self.service.assess(now) {
            Ok(assessment) => {
                debug!(
                    target = %assessment.target.call,
                    path = ?assessment.path,
                    competition = assessment.competition.count,
                    recommended_hz = assessment.recommendation.offset_hz,
                    "assessment refreshed"
                );
                self.tx.send_replace(Some(assessment));
            }
            Err(BrainError::NoTarget) => {
                self.tx.send_if_modified(|current| current.take().is_some());
            }
            Err(e) => {
                warn!(error = %e, "assessment failed");
            }
        }
    }

    /// Run until shutdown is signalled.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            "refresh daemon starting"
        );

        let mut interval = tokio::time::interval(self.interval);
        // Skip the first immediate tick
        interval.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("refresh daemon shutting down");
                    break;
                }

                _ = interval.tick() => {
                    self.refresh_once(Instant::now());
                }
            }
        }
    }
}
