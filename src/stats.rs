/// Hit, miss and eviction counters of a single cache.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct Stats {
    hits: u64,
    misses: u64,
    evictions: u64,
    inserts: u64,
}

impl Stats {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_insert(&mut self) {
        self.inserts += 1;
    }

    /// How many lookups were answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// How many lookups had to invoke the wrapped function.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// How many entries were dropped to make room for new ones.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// How many entries were stored.
    pub fn inserts(&self) -> u64 {
        self.inserts
    }

    /// The share of lookups that were hits, between 0.0 and 1.0.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 { 0.0 } else { self.hits as f64 / total as f64 }
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
