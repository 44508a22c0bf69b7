//! Cache statistics tracking.

/// Counters describing reception cache activity.
///
/// Snapshot value returned by [`ReceptionCache::stats`]; useful for
/// diagnostics and the periodic rate logging the feed layer does.
///
/// [`ReceptionCache::stats`]: super::ReceptionCache::stats
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Spots inserted as new entries.
    pub inserts: u64,
    /// Spots that replaced an existing entry with the same key.
    pub replacements: u64,
    /// Spots removed by pruning.
    pub pruned: u64,
    /// Current number of live entries.
    pub entries: usize,
}

impl CacheStats {
    /// Create zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub(crate) fn record_replacement(&mut self) {
        self.replacements += 1;
    }

    pub(crate) fn record_pruned(&mut self, count: usize) {
        self.pruned += count as u64;
    }

    pub(crate) fn update_entries(&mut self, entries: usize) {
        self.entries = entries;
    }
}
