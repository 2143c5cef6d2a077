use std::fmt::{self, Debug, Formatter};
use std::hash::{BuildHasher, Hash, Hasher};
use std::ops::Deref;

use crate::hash::Key;

/// A key tuple together with its precomputed combined hash.
///
/// The hash is computed once per lookup and reused for the index probe, the
/// equality check and the eventual insertion.
///
/// # `Hash` and `Eq`
/// Hashing a `CompositeKey` writes only the precomputed hash. Equality first
/// compares the hashes and falls back to comparing the tuples, so two keys
/// with colliding hashes still stay distinct.
#[derive(Clone)]
pub struct CompositeKey<K> {
    /// The precomputed hash.
    hash: usize,
    /// The argument tuple.
    key: K,
}

impl<K: Key> CompositeKey<K> {
    /// Compute a key's combined hash and wrap it.
    #[inline]
    pub fn new<S: BuildHasher>(key: K, build: &S) -> Self {
        Self { hash: key.key_hash(build), key }
    }
}

impl<K> CompositeKey<K> {
    /// The precomputed combined hash.
    #[inline]
    pub fn combined_hash(&self) -> usize {
        self.hash
    }

    /// Return the wrapped tuple.
    #[inline]
    pub fn into_inner(self) -> K {
        self.key
    }
}

impl<K> Deref for CompositeKey<K> {
    type Target = K;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.key
    }
}

impl<K> Hash for CompositeKey<K> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.hash);
    }
}

impl<K: Debug> Debug for CompositeKey<K> {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.key.fmt(f)
    }
}

impl<K: Eq> Eq for CompositeKey<K> {}

impl<K: PartialEq> PartialEq for CompositeKey<K> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.key == other.key
    }
}
