use std::hash::BuildHasher;
use std::num::NonZeroUsize;

use rustc_hash::FxBuildHasher;
use slab::Slab;
use tracing::trace;

use crate::hash::Key;
use crate::key::CompositeKey;
use crate::passthroughhasher::{BuildPassthroughHasher, PassthroughHashMap};
use crate::stats::Stats;

/// A bounded store of key-value pairs with least-recently-used eviction.
///
/// Entries live in a slab that is allocated once with room for exactly
/// `capacity` nodes and never grows: an eviction always frees a slot before
/// the next insertion takes one. The nodes form a doubly linked list ordered
/// from most recently used (head) to least recently used (tail). The index
/// maps each resident key to its slab slot.
pub struct Lru<K, V, S = FxBuildHasher> {
    /// The arena holding the entries.
    nodes: Slab<Node<K, V>>,
    /// Maps from resident keys to their slot in `nodes`.
    index: PassthroughHashMap<CompositeKey<K>, usize>,
    /// The most recently used entry.
    head: Option<usize>,
    /// The least recently used entry.
    tail: Option<usize>,
    /// The maximum number of resident entries.
    capacity: NonZeroUsize,
    /// Builds the hashers for the individual key elements.
    hasher: S,
    /// Counters for lookups and evictions.
    stats: Stats,
}

/// An entry in the recency list.
struct Node<K, V> {
    /// The key, kept for removing the entry from the index on eviction.
    key: CompositeKey<K>,
    /// The memoized value.
    value: V,
    /// The next more recently used entry.
    prev: Option<usize>,
    /// The next less recently used entry.
    next: Option<usize>,
}

impl<K: Key, V, S: BuildHasher> Lru<K, V, S> {
    /// Create an empty store with room for `capacity` entries.
    pub fn new(capacity: NonZeroUsize, hasher: S) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity.get()),
            index: PassthroughHashMap::with_capacity_and_hasher(
                capacity.get(),
                BuildPassthroughHasher,
            ),
            head: None,
            tail: None,
            capacity,
            hasher,
            stats: Stats::new(),
        }
    }

    /// Wrap an argument tuple into a key, computing its combined hash.
    #[inline]
    pub fn key(&self, args: K) -> CompositeKey<K> {
        CompositeKey::new(args, &self.hasher)
    }

    /// Look up a key and mark it as most recently used if it is resident.
    ///
    /// Counts as a hit or a miss.
    pub fn lookup(&mut self, key: &CompositeKey<K>) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        self.stats.record_hit();
        self.promote(id);
        Some(&self.nodes[id].value)
    }

    /// Look up a key without touching the recency order or the counters.
    pub fn peek(&self, key: &CompositeKey<K>) -> Option<&V> {
        self.index.get(key).map(|&id| &self.nodes[id].value)
    }

    /// Whether the key is resident.
    pub fn contains(&self, key: &CompositeKey<K>) -> bool {
        self.index.contains_key(key)
    }

    /// Insert a value as the most recently used entry.
    ///
    /// When the store is full, the least recently used entry is evicted first
    /// and returned. If the key is already resident (a nested computation
    /// stored it in the meantime), its value is replaced in place and nothing
    /// is evicted.
    pub fn insert(&mut self, key: CompositeKey<K>, value: V) -> Option<(K, V)> {
        if let Some(&id) = self.index.get(&key) {
            self.nodes[id].value = value;
            self.promote(id);
            return None;
        }

        let evicted = if self.nodes.len() >= self.capacity.get() {
            self.evict()
        } else {
            None
        };

        let id = self.nodes.insert(Node { key: key.clone(), value, prev: None, next: None });
        self.attach_front(id);
        self.index.insert(key, id);
        self.stats.record_insert();

        debug_assert!(self.nodes.len() <= self.capacity.get());
        debug_assert_eq!(self.nodes.len(), self.index.len());
        evicted
    }

    /// The number of resident entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no entry is resident.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The maximum number of resident entries.
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// The store's counters.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Zero the store's counters.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Iterate over the resident entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        std::iter::successors(self.head, |&id| self.nodes[id].next).map(|id| {
            let node = &self.nodes[id];
            (&*node.key, &node.value)
        })
    }

    /// Remove the least recently used entry from both the list and the index.
    fn evict(&mut self) -> Option<(K, V)> {
        let id = self.tail?;
        self.detach(id);
        let node = self.nodes.remove(id);
        let removed = self.index.remove(&node.key);
        debug_assert_eq!(removed, Some(id));

        self.stats.record_eviction();
        trace!(
            capacity = self.capacity.get(),
            hash = node.key.combined_hash(),
            "evicted least recently used entry"
        );

        Some((node.key.into_inner(), node.value))
    }

    /// Move an entry to the head of the list.
    fn promote(&mut self, id: usize) {
        if self.head == Some(id) {
            return;
        }
        self.detach(id);
        self.attach_front(id);
    }

    /// Unlink an entry from its neighbours.
    fn detach(&mut self, id: usize) {
        let (prev, next) = {
            let node = &mut self.nodes[id];
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.head = next,
        }

        match next {
            Some(next) => self.nodes[next].prev = prev,
            None => self.tail = prev,
        }
    }

    /// Link a detached entry in front of the current head.
    fn attach_front(&mut self, id: usize) {
        self.nodes[id].next = self.head;
        match self.head {
            Some(head) => self.nodes[head].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    /// Checks a few invariants of the data structure.
    #[cfg(test)]
    fn assert_consistency(&self) {
        assert!(self.nodes.len() <= self.capacity.get());
        assert_eq!(self.nodes.len(), self.index.len());
        for (key, &id) in &self.index {
            assert!(self.nodes[id].key == *key);
        }

        let mut count = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            assert_eq!(self.nodes[id].prev, prev);
            prev = Some(id);
            cursor = self.nodes[id].next;
            count += 1;
        }
        assert_eq!(self.tail, prev);
        assert_eq!(count, self.nodes.len());
    }
}
