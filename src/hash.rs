use std::hash::{BuildHasher, Hash};

use siphasher::sip::SipHasher13;

/// A tuple of argument values usable as a cache key.
///
/// Implemented for tuples of up to twelve elements. The hash of a key is
/// derived from the hashes of its elements:
///
/// - A single-element key hashes to exactly its element's hash.
/// - Every other key folds its element hashes from left to right into a
///   running seed, starting at zero. Each element hash is first avalanched by
///   two xor-shift-multiply rounds and the seed is rotated by a third of the
///   word size before the two are xor-ed.
///
/// The fold is order-sensitive: `(x, y)` and `(y, x)` hash differently.
pub trait Key: Eq + Clone {
    /// Compute the combined hash of the key, hashing each element with a
    /// hasher built by `build`.
    fn key_hash<S: BuildHasher>(&self, build: &S) -> usize;
}

impl Key for () {
    #[inline]
    fn key_hash<S: BuildHasher>(&self, _: &S) -> usize {
        0
    }
}

impl<A: Hash + Eq + Clone> Key for (A,) {
    #[inline]
    fn key_hash<S: BuildHasher>(&self, build: &S) -> usize {
        build.hash_one(&self.0) as usize
    }
}

macro_rules! composite {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Hash + Eq + Clone),+> Key for ($($name,)+) {
            #[inline]
            fn key_hash<S: BuildHasher>(&self, build: &S) -> usize {
                let mut seed = 0;
                $(seed = combine(seed, build.hash_one(&self.$idx) as usize);)+
                seed
            }
        }
    };
}

composite! { A 0, B 1 }
composite! { A 0, B 1, C 2 }
composite! { A 0, B 1, C 2, D 3 }
composite! { A 0, B 1, C 2, D 3, E 4 }
composite! { A 0, B 1, C 2, D 3, E 4, F 5 }
composite! { A 0, B 1, C 2, D 3, E 4, F 5, G 6 }
composite! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7 }
composite! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8 }
composite! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9 }
composite! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10 }
composite! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11 }

/// Builds keyed SipHash-1-3 hashers for the individual key elements.
///
/// The default element hasher is the much faster `FxBuildHasher`. Choose this
/// one when the arguments come from untrusted input and bucket collisions
/// must not be predictable.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct SipBuildHasher {
    k0: u64,
    k1: u64,
}

impl SipBuildHasher {
    /// Create a builder whose hashers are keyed with `k0` and `k1`.
    pub fn new_with_keys(k0: u64, k1: u64) -> Self {
        Self { k0, k1 }
    }
}

impl BuildHasher for SipBuildHasher {
    type Hasher = SipHasher13;

    #[inline]
    fn build_hasher(&self) -> SipHasher13 {
        SipHasher13::new_with_keys(self.k0, self.k1)
    }
}

/// Fold one element hash into the running seed.
#[inline]
pub(crate) fn combine(seed: usize, hash: usize) -> usize {
    seed.rotate_left(usize::BITS / 3) ^ distribute(hash)
}

#[inline]
const fn xorshift(n: usize, i: u32) -> usize {
    n ^ (n >> i)
}

/// Avalanche a hash so that nearby inputs spread over the whole word.
#[cfg(target_pointer_width = "64")]
#[inline]
pub(crate) const fn distribute(n: usize) -> usize {
    const P: usize = 0x5555_5555_5555_5555;
    const C: usize = 17316035218449499591;
    C.wrapping_mul(xorshift(P.wrapping_mul(xorshift(n, 32)), 32))
}

/// Avalanche a hash so that nearby inputs spread over the whole word.
#[cfg(target_pointer_width = "32")]
#[inline]
pub(crate) const fn distribute(n: usize) -> usize {
    const P: usize = 0x5555_5555;
    const C: usize = 3423571495;
    C.wrapping_mul(xorshift(P.wrapping_mul(xorshift(n, 16)), 16))
}

#[cfg(test)]
mod tests {
    use std::hash::{BuildHasherDefault, Hasher};

    use super::*;

    /// Hashes integers to themselves so that vectors are predictable.
    #[derive(Default)]
    struct Identity(u64);

    impl Hasher for Identity {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, _: &[u8]) {
            unimplemented!()
        }

        fn write_u64(&mut self, i: u64) {
            self.0 = i;
        }
    }

    type BuildIdentity = BuildHasherDefault<Identity>;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_distribute_vectors() {
        assert_eq!(distribute(0), 0);
        assert_eq!(distribute(1), 0xda0d_fe13_0000_0000);
        assert_eq!(distribute(2), 0xb41b_fc26_0000_0000);
    }

    #[test]
    #[cfg(target_pointer_width = "32")]
    fn test_distribute_vectors() {
        assert_eq!(distribute(0), 0);
        assert_eq!(distribute(1), 0x25f3_0000);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_combine_vectors() {
        let build = BuildIdentity::default();
        assert_eq!((1u64, 2u64).key_hash(&build), 0x767b_fc26_001b_41bf);
        assert_eq!((2u64, 1u64).key_hash(&build), 0x5ecd_fe13_0016_837f);
        assert_eq!((1u64, 2u64, 3u64).key_hash(&build), 0x0ae9_f951_37ee_cf7f);
    }

    #[test]
    fn test_single_element_is_passed_through() {
        let build = BuildIdentity::default();
        assert_eq!((7u64,).key_hash(&build), 7);
        assert_eq!((0u64,).key_hash(&build), 0);
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(().key_hash(&BuildIdentity::default()), 0);
    }

    #[test]
    fn test_order_matters() {
        let build = rustc_hash::FxBuildHasher;
        assert_ne!((3, 4).key_hash(&build), (4, 3).key_hash(&build));
        assert_ne!(("a", "b", "c").key_hash(&build), ("c", "b", "a").key_hash(&build));
    }

    #[test]
    fn test_sip_keys_change_hash() {
        let a = SipBuildHasher::new_with_keys(1, 2);
        let b = SipBuildHasher::new_with_keys(3, 4);
        assert_eq!((5u32, 6u32).key_hash(&a), (5u32, 6u32).key_hash(&a));
        assert_ne!((5u32, 6u32).key_hash(&a), (5u32, 6u32).key_hash(&b));
    }

    #[test]
    fn test_rotation_amount() {
        assert_eq!(combine(1, 0), 1 << (usize::BITS / 3));
    }
}
