//! High-level facade over the tactical components.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use tracing::info;

use crate::cache::{LocalDecodeBuffer, PruneDaemon, ReceptionCache};
use crate::competition::{Competition, CompetitionAnalyzer, PathAnalyzer, PathStatus};
use crate::model::{LocalDecode, Spot, TargetContext};
use crate::perspective::{Perspective, PerspectiveEngine};
use crate::recommend::{Recommendation, RecommendationEngine};

use super::{BrainConfig, BrainError};

/// Everything the refresh cycle produces for the current target.
#[derive(Debug, Clone)]
pub struct Assessment {
    /// The target this assessment was computed for.
    pub target: TargetContext,
    /// Tiered view of what the target's region hears.
    pub perspective: Perspective,
    /// Pileup density around the target's frequency.
    pub competition: Competition,
    /// Status of the path from the operator to the target.
    pub path: PathStatus,
    /// Recommended transmit offset.
    pub recommendation: Recommendation,
}

/// Facade wiring the reception cache, decode buffer, and the three
/// analysis engines behind one ingest-and-query surface.
///
/// Ingest methods never block on analysis; queries compute on demand from
/// whatever the caches currently hold. All methods take `&self` and the
/// facade is shared behind an [`Arc`] between the feed adapter, the
/// refresh daemon, and the prune daemon.
pub struct BandBrainService {
    config: BrainConfig,
    cache: Arc<ReceptionCache>,
    decodes: Arc<LocalDecodeBuffer>,
    perspective: PerspectiveEngine,
    competition: CompetitionAnalyzer,
    path: PathAnalyzer,
    recommend: RecommendationEngine,
    target: Mutex<Option<TargetContext>>,
}

impl BandBrainService {
    /// Create a service from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BrainError::Config`] when the configuration is
    /// inconsistent.
    pub fn new(config: BrainConfig) -> Result<Self, BrainError> {
        config.validate()?;

        let cache = Arc::new(ReceptionCache::new(
            config.cache.clone(),
            config.my_call.clone(),
        ));
        let decodes = Arc::new(LocalDecodeBuffer::new());
        let perspective = PerspectiveEngine::new(config.perspective.clone());
        let competition = CompetitionAnalyzer::new(config.competition.clone());
        let path = PathAnalyzer::new(
            config.cache.retention.heard_me,
            config.cache.retention.tactical,
        );
        let recommend = RecommendationEngine::new(
            config.recommend.clone(),
            config.perspective.weights.clone(),
        );

        info!(my_call = %config.my_call, "brain service created");

        Ok(Self {
            config,
            cache,
            decodes,
            perspective,
            competition,
            path,
            recommend,
            target: Mutex::new(None),
        })
    }

    /// The service configuration.
    pub fn config(&self) -> &BrainConfig {
        &self.config
    }

    /// The reception cache, for stats and daemon wiring.
    pub fn cache(&self) -> &Arc<ReceptionCache> {
        &self.cache
    }

    /// A prune daemon over this service's caches, ready to spawn.
    pub fn prune_daemon(&self) -> PruneDaemon {
        PruneDaemon::new(
            Arc::clone(&self.cache),
            Arc::clone(&self.decodes),
            self.config.cache.retention.clone(),
        )
    }

    /// Record a reception report.
    pub fn ingest_spot(&self, spot: Spot) {
        self.cache.insert(spot);
    }

    /// Record a decode from the operator's own receiver.
    ///
    /// When the decode is the current target transmitting, its offset
    /// becomes the target's known frequency — our own receiver beats any
    /// spotting network to that fact.
    pub fn ingest_local_decode(&self, decode: LocalDecode) {
        let mut target = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(t) = target.as_mut() {
            if decode.sender.matches(&t.call) {
                t.offset_hz = Some(decode.offset_hz);
            }
        }
        drop(target);
        self.decodes.insert(decode);
    }

    /// Select a new target. Carried recommendation state belongs to the
    /// old session and is dropped.
    pub fn set_target(&self, target: TargetContext) {
        info!(target = %target.call, grid = ?target.grid, "target selected");
        let mut current = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        *current = Some(target);
        drop(current);
        self.recommend.reset();
    }

    /// Deselect the target.
    pub fn clear_target(&self) {
        let mut current = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        if current.take().is_some() {
            info!("target cleared");
        }
        drop(current);
        self.recommend.reset();
    }

    /// The current target, if one is selected.
    pub fn target(&self) -> Option<TargetContext> {
        self.target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Tiered perspective for the current target at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`BrainError::NoTarget`] when no target is selected.
    pub fn perspective(&self, now: Instant) -> Result<Perspective, BrainError> {
        let target = self.target().ok_or(BrainError::NoTarget)?;
        Ok(self.compute_perspective(&target, now))
    }

    /// Competition around the current target's frequency at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`BrainError::NoTarget`] when no target is selected.
    pub fn competition(&self, now: Instant) -> Result<Competition, BrainError> {
        let target = self.target().ok_or(BrainError::NoTarget)?;
        let perspective = self.compute_perspective(&target, now);
        Ok(self.competition.compute(&perspective, target.offset_hz, now))
    }

    /// Path status toward the current target at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`BrainError::NoTarget`] when no target is selected.
    pub fn path_status(&self, now: Instant) -> Result<PathStatus, BrainError> {
        let target = self.target().ok_or(BrainError::NoTarget)?;
        let perspective = self.compute_perspective(&target, now);
        Ok(self.path.compute(
            &self.cache,
            &self.decodes,
            &self.config.my_call,
            &target,
            &perspective,
            now,
        ))
    }

    /// Transmit-frequency recommendation for the current target at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`BrainError::NoTarget`] when no target is selected.
    pub fn recommendation(&self, now: Instant) -> Result<Recommendation, BrainError> {
        let target = self.target().ok_or(BrainError::NoTarget)?;
        let perspective = self.compute_perspective(&target, now);
        let local = self
            .decodes
            .recent(now, self.config.cache.retention.tactical);
        Ok(self
            .recommend
            .recommend(&perspective, &local, target.offset_hz))
    }

    /// One full assessment: the perspective is computed once and shared
    /// across the three analyses. This is what the refresh daemon runs.
    ///
    /// # Errors
    ///
    /// Returns [`BrainError::NoTarget`] when no target is selected.
    pub fn assess(&self, now: Instant) -> Result<Assessment, BrainError> {
        let target = self.target().ok_or(BrainError::NoTarget)?;
        let perspective = self.compute_perspective(&target, now);

        let competition = self.competition.compute(&perspective, target.offset_hz, now);
        let path = self.path.compute(
            &self.cache,
            &self.decodes,
            &self.config.my_call,
            &target,
            &perspective,
            now,
        );
        let local = self
            .decodes
            .recent(now, self.config.cache.retention.tactical);
        let recommendation = self
            .recommend
            .recommend(&perspective, &local, target.offset_hz);

        Ok(Assessment {
            target,
            perspective,
            competition,
            path,
            recommendation,
        })
    }

    fn compute_perspective(&self, target: &TargetContext, now: Instant) -> Perspective {
        self.perspective.compute(
            &self.cache,
            target,
            now,
            self.config.cache.retention.tactical,
        )
    }
}
