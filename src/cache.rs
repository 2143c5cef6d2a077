use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::thread::LocalKey;

use tracing::debug;

use crate::hash::Key;
use crate::lru::Lru;

/// The per-thread cache of a function annotated with `#[memoize]`.
pub struct LocalCache<K, V>(RefCell<Lru<K, V>>);

impl<K: Key, V> LocalCache<K, V> {
    /// Create an empty cache with room for `capacity` results.
    pub fn new(capacity: NonZeroUsize) -> Self {
        debug!(capacity = capacity.get(), "creating thread-local memoizing cache");
        Self(RefCell::new(Lru::new(capacity, Default::default())))
    }
}

/// Execute a function or use a cached result for it.
pub fn memoized<K, V, F>(cache: &'static LocalKey<LocalCache<K, V>>, args: K, func: F) -> V
where
    K: Key + 'static,
    V: Clone + 'static,
    F: FnOnce(K) -> V,
{
    cache.with(|cache| {
        // Check if there is a cached output.
        let key = {
            let mut borrow = cache.0.borrow_mut();
            let key = borrow.key(args);
            if let Some(value) = borrow.lookup(&key) {
                #[cfg(feature = "testing")]
                crate::testing::register_hit();

                return value.clone();
            }
            key
        };

        // The borrow is released here so that recursive calls of the same
        // function can access the cache without panicking.
        let output = func((*key).clone());

        // Insert the result into the cache. A recursive call with the same
        // arguments may have inserted it in the meantime. That's okay.
        cache.0.borrow_mut().insert(key, output.clone());

        #[cfg(feature = "testing")]
        crate::testing::register_miss();

        output
    })
}

/// Splits the return type of a fallible memoized function into the stored
/// value and the error that is passed through.
pub trait Fallible {
    /// The successful result, which is stored.
    type Value;
    /// The error, which is never stored.
    type Error;
}

impl<T, E> Fallible for Result<T, E> {
    type Value = T;
    type Error = E;
}

/// Execute a fallible function or use a cached successful result for it.
///
/// An error is returned unchanged and nothing is inserted, so the next call
/// with the same arguments executes the function again.
pub fn memoized_fallible<K, V, E, F>(
    cache: &'static LocalKey<LocalCache<K, V>>,
    args: K,
    func: F,
) -> Result<V, E>
where
    K: Key + 'static,
    V: Clone + 'static,
    F: FnOnce(K) -> Result<V, E>,
{
    cache.with(|cache| {
        let key = {
            let mut borrow = cache.0.borrow_mut();
            let key = borrow.key(args);
            if let Some(value) = borrow.lookup(&key) {
                #[cfg(feature = "testing")]
                crate::testing::register_hit();

                return Ok(value.clone());
            }
            key
        };

        let output = func((*key).clone());

        #[cfg(feature = "testing")]
        crate::testing::register_miss();

        let value = output?;
        cache.0.borrow_mut().insert(key, value.clone());
        Ok(value)
    })
}
