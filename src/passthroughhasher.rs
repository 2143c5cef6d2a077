use std::collections::HashMap;
use std::hash::{BuildHasher, Hasher};

/// Hash map that re-uses a precomputed `usize` as the hash value.
pub(crate) type PassthroughHashMap<Key, Value> =
    HashMap<Key, Value, BuildPassthroughHasher>;

#[derive(Copy, Clone, Default)]
pub(crate) struct BuildPassthroughHasher;

#[derive(Default)]
pub(crate) struct PassthroughHasher {
    value: u64,
}

impl Hasher for PassthroughHasher {
    #[inline(always)]
    fn finish(&self) -> u64 {
        self.value
    }

    #[inline]
    fn write(&mut self, _bytes: &[u8]) {
        unimplemented!("only precomputed hashes can be passed through")
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.value = i;
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.value = i as u64;
    }
}

impl BuildHasher for BuildPassthroughHasher {
    type Hasher = PassthroughHasher;
    #[inline]
    fn build_hasher(&self) -> PassthroughHasher {
        PassthroughHasher::default()
    }
}
