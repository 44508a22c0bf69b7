//! Multiply-indexed in-memory store for reception reports.

use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::error;

use crate::model::{Callsign, Spot, SpotKey};

use super::{CacheConfig, CacheStats};

/// Synchronized reception cache.
///
/// One `Mutex` protects the whole multi-index structure; at the data
/// volumes involved (tens of thousands of live entries) this keeps insert
/// O(1) and prune O(k) without reader/writer contention mattering. No I/O
/// happens under the lock.
///
/// Every query returns a cloned snapshot filtered by a per-query retention
/// override, so one call never observes a partial prune and different
/// consumers can apply different freshness windows to the same store.
pub struct ReceptionCache {
    config: CacheConfig,
    my_call: Callsign,
    inner: Mutex<CacheInner>,
    poison_logged: AtomicBool,
}

struct CacheInner {
    /// Primary store; owns every spot.
    spots: HashMap<SpotKey, Spot>,
    /// Receiver base-call → keys. Serves the direct tier.
    by_receiver: HashMap<String, HashSet<SpotKey>>,
    /// 4-char receiver grid square → keys.
    by_square: HashMap<String, HashSet<SpotKey>>,
    /// 2-char receiver grid field → keys.
    by_field: HashMap<String, HashSet<SpotKey>>,
    /// Frequency bucket → keys. Serves global band activity.
    by_bucket: HashMap<u32, HashSet<SpotKey>>,
    /// Keys whose sender is the operator's own call ("who reports me").
    reports_of_me: HashSet<SpotKey>,
    stats: CacheStats,
}

impl CacheInner {
    fn new() -> Self {
        Self {
            spots: HashMap::new(),
            by_receiver: HashMap::new(),
            by_square: HashMap::new(),
            by_field: HashMap::new(),
            by_bucket: HashMap::new(),
            reports_of_me: HashSet::new(),
            stats: CacheStats::new(),
        }
    }

    /// Add `key` to every index applicable to `spot`.
    fn link(&mut self, key: &SpotKey, spot: &Spot, my_call: &Callsign) {
        self.by_receiver
            .entry(spot.receiver.base().to_string())
            .or_default()
            .insert(key.clone());

        if let Some(grid) = &spot.receiver_grid {
            if let Some(square) = grid.square() {
                self.by_square
                    .entry(square.to_string())
                    .or_default()
                    .insert(key.clone());
            }
            self.by_field
                .entry(grid.field().to_string())
                .or_default()
                .insert(key.clone());
        }

        self.by_bucket
            .entry(key.bucket)
            .or_default()
            .insert(key.clone());

        if spot.sender.matches(my_call) {
            self.reports_of_me.insert(key.clone());
        }
    }

    /// Remove `key` from every index it was linked into.
    fn unlink(&mut self, key: &SpotKey, spot: &Spot) {
        if let Some(set) = self.by_receiver.get_mut(spot.receiver.base()) {
            set.remove(key);
            if set.is_empty() {
                self.by_receiver.remove(spot.receiver.base());
            }
        }

        if let Some(grid) = &spot.receiver_grid {
            if let Some(square) = grid.square() {
                if let Some(set) = self.by_square.get_mut(square) {
                    set.remove(key);
                    if set.is_empty() {
                        self.by_square.remove(square);
                    }
                }
            }
            if let Some(set) = self.by_field.get_mut(grid.field()) {
                set.remove(key);
                if set.is_empty() {
                    self.by_field.remove(grid.field());
                }
            }
        }

        if let Some(set) = self.by_bucket.get_mut(&key.bucket) {
            set.remove(key);
            if set.is_empty() {
                self.by_bucket.remove(&key.bucket);
            }
        }

        self.reports_of_me.remove(key);
    }

    /// Clone the spots behind `keys` that are fresh at `now`.
    fn collect_fresh(
        &self,
        keys: impl IntoIterator<Item = SpotKey>,
        now: Instant,
        max_age: Duration,
    ) -> Vec<Spot> {
        keys.into_iter()
            .filter_map(|key| self.spots.get(&key))
            .filter(|spot| spot.age(now) <= max_age)
            .cloned()
            .collect()
    }
}

impl ReceptionCache {
    /// Create an empty cache.
    ///
    /// `my_call` identifies which incoming reports feed the
    /// "who reports me" index.
    pub fn new(config: CacheConfig, my_call: Callsign) -> Self {
        Self {
            config,
            my_call,
            inner: Mutex::new(CacheInner::new()),
            poison_logged: AtomicBool::new(false),
        }
    }

    /// The configured frequency bucket width in Hz.
    pub fn bucket_hz(&self) -> u32 {
        self.config.bucket_hz
    }

    /// Insert or replace a spot.
    ///
    /// Idempotent upsert keyed by `(sender, receiver, bucket)`: a report
    /// with the same key replaces the older entry, it never duplicates.
    /// Malformed spots are the ingest adapter's problem; this boundary
    /// accepts whatever it is given.
    pub fn insert(&self, spot: Spot) {
        let key = spot.key(self.config.bucket_hz);
        let Some(mut inner) = self.lock() else {
            return;
        };

        if let Some(old) = inner.spots.remove(&key) {
            inner.unlink(&key, &old);
            inner.stats.record_replacement();
        } else {
            inner.stats.record_insert();
        }

        inner.link(&key, &spot, &self.my_call);
        inner.spots.insert(key, spot);
        let entries = inner.spots.len();
        inner.stats.update_entries(entries);
    }

    /// Remove every spot older than `retention` at `now`.
    ///
    /// Returns the number of entries removed. Invoked periodically by
    /// [`PruneDaemon`](super::PruneDaemon), off the insert path. Freshness
    /// is judged on local receipt time only.
    pub fn prune(&self, now: Instant, retention: Duration) -> usize {
        let Some(mut inner) = self.lock() else {
            return 0;
        };

        let expired: Vec<SpotKey> = inner
            .spots
            .iter()
            .filter(|(_, spot)| spot.age(now) > retention)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            if let Some(old) = inner.spots.remove(key) {
                inner.unlink(key, &old);
            }
        }

        inner.stats.record_pruned(expired.len());
        let entries = inner.spots.len();
        inner.stats.update_entries(entries);
        expired.len()
    }

    /// Spots reported *by* the given station (what that station hears).
    pub fn query_by_receiver(&self, call: &Callsign, now: Instant, max_age: Duration) -> Vec<Spot> {
        let Some(inner) = self.lock() else {
            return Vec::new();
        };
        let keys: Vec<SpotKey> = inner
            .by_receiver
            .get(call.base())
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        inner.collect_fresh(keys, now, max_age)
    }

    /// Spots whose receiver sits in the given 4-char grid square.
    pub fn query_by_square(&self, square: &str, now: Instant, max_age: Duration) -> Vec<Spot> {
        let Some(inner) = self.lock() else {
            return Vec::new();
        };
        let keys: Vec<SpotKey> = inner
            .by_square
            .get(square)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        inner.collect_fresh(keys, now, max_age)
    }

    /// Spots whose receiver sits in the given 2-char grid field.
    pub fn query_by_field(&self, field: &str, now: Instant, max_age: Duration) -> Vec<Spot> {
        let Some(inner) = self.lock() else {
            return Vec::new();
        };
        let keys: Vec<SpotKey> = inner
            .by_field
            .get(field)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        inner.collect_fresh(keys, now, max_age)
    }

    /// Spots within an inclusive passband offset range — global band
    /// activity, regardless of who reported.
    pub fn query_by_frequency_range(
        &self,
        range: RangeInclusive<u32>,
        now: Instant,
        max_age: Duration,
    ) -> Vec<Spot> {
        let Some(inner) = self.lock() else {
            return Vec::new();
        };
        let bucket_hz = self.config.bucket_hz.max(1);
        let first = range.start() / bucket_hz;
        let last = range.end() / bucket_hz;
        let keys: Vec<SpotKey> = (first..=last)
            .filter_map(|bucket| inner.by_bucket.get(&bucket))
            .flat_map(|set| set.iter().cloned())
            .collect();
        inner
            .collect_fresh(keys, now, max_age)
            .into_iter()
            .filter(|spot| range.contains(&spot.offset_hz))
            .collect()
    }

    /// Spots where the sender is the operator's own call — who reports me.
    pub fn query_reports_of_me(&self, now: Instant, max_age: Duration) -> Vec<Spot> {
        let Some(inner) = self.lock() else {
            return Vec::new();
        };
        let keys: Vec<SpotKey> = inner.reports_of_me.iter().cloned().collect();
        inner.collect_fresh(keys, now, max_age)
    }

    /// Current number of live entries.
    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.spots.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.lock()
            .map(|inner| inner.stats.clone())
            .unwrap_or_default()
    }

    /// Acquire the inner lock, degrading to `None` if poisoned.
    ///
    /// Advisory tooling must not take the host process down over a
    /// poisoned mutex: the failure is logged once and every subsequent
    /// operation serves empty/safe results.
    fn lock(&self) -> Option<MutexGuard<'_, CacheInner>> {
        match self.inner.lock() {
            Ok(guard) => Some(guard),
            Err(poisoned) => {
                if !self.poison_logged.swap(true, Ordering::Relaxed) {
                    error!(
                        error = %poisoned,
                        "reception cache mutex poisoned; all queries now return empty"
                    );
                }
                None
            }
        }
    }
}
