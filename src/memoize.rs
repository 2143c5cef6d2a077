use std::fmt::{self, Debug, Formatter};
use std::hash::BuildHasher;
use std::num::NonZeroUsize;

use rustc_hash::FxBuildHasher;
use tracing::debug;

use crate::call::Callable;
use crate::error::{Error, Result};
use crate::hash::Key;
use crate::lru::Lru;
use crate::stats::Stats;

/// The capacity used when none is given.
pub const DEFAULT_CAPACITY: usize = 1024;

/// A memoizing wrapper around a pure function.
///
/// Keeps the results of the `capacity` most recently used argument tuples.
/// Calling the cache with arguments it has seen and still holds returns the
/// stored result without invoking the function; any other call invokes the
/// function once and stores its result, evicting the least recently used
/// result if the cache is full.
///
/// ```
/// use lrumemo::Cache;
///
/// let mut square = Cache::new(|x: u64| x * x, 2).unwrap();
/// assert_eq!(square.call((5,)), 25);
/// assert_eq!(square.call((5,)), 25); // Served from the cache.
/// ```
///
/// The wrapped function must be deterministic: the cache assumes that calling
/// it twice with equal arguments yields equal results. Side effects of the
/// function only happen on misses.
pub struct Cache<K, V, F, S = FxBuildHasher> {
    store: Lru<K, V, S>,
    func: F,
}

impl<K: Key, V: Clone, F> Cache<K, V, F> {
    /// Wrap a function, keeping at most `capacity` results.
    ///
    /// Fails if `capacity` is zero.
    pub fn new(func: F, capacity: usize) -> Result<Self>
    where
        F: Callable<K, Output = V>,
    {
        Ok(Self::build(func, validate(capacity)?, FxBuildHasher))
    }

    /// Wrap a function, keeping at most [`DEFAULT_CAPACITY`] results.
    pub fn with_default_capacity(func: F) -> Self
    where
        F: Callable<K, Output = V>,
    {
        Self::build(func, DEFAULT, FxBuildHasher)
    }

    /// Wrap a fallible function, keeping at most `capacity` successful
    /// results. Use [`try_call`](Self::try_call) to invoke it.
    pub fn fallible<E>(func: F, capacity: usize) -> Result<Self>
    where
        F: Callable<K, Output = Result<V, E>>,
    {
        Ok(Self::build(func, validate(capacity)?, FxBuildHasher))
    }
}

impl<K: Key, V: Clone, F, S: BuildHasher> Cache<K, V, F, S> {
    /// Wrap a function, hashing the individual arguments with hashers built
    /// by `hasher`.
    pub fn with_hasher(func: F, capacity: usize, hasher: S) -> Result<Self> {
        Ok(Self::build(func, validate(capacity)?, hasher))
    }

    fn build(func: F, capacity: NonZeroUsize, hasher: S) -> Self {
        debug!(capacity = capacity.get(), "creating memoizing cache");
        Self { store: Lru::new(capacity, hasher), func }
    }

    /// Return the function's result for the arguments, computing it only if
    /// it is not cached.
    pub fn call(&mut self, args: K) -> V
    where
        F: Callable<K, Output = V>,
    {
        let key = self.store.key(args);
        if let Some(value) = self.store.lookup(&key) {
            return value.clone();
        }

        let value = self.func.invoke((*key).clone());
        self.store.insert(key, value.clone());
        value
    }

    /// Like [`call`](Self::call), but for a fallible function.
    ///
    /// An error is returned to the caller unchanged and nothing is stored
    /// for the arguments, so the next call with them invokes the function
    /// again.
    pub fn try_call<E>(&mut self, args: K) -> Result<V, E>
    where
        F: Callable<K, Output = Result<V, E>>,
    {
        let key = self.store.key(args);
        if let Some(value) = self.store.lookup(&key) {
            return Ok(value.clone());
        }

        let value = self.func.invoke((*key).clone())?;
        self.store.insert(key, value.clone());
        Ok(value)
    }

    /// The stored result for the arguments, if any. Does not count as a use.
    pub fn peek(&self, args: &K) -> Option<&V> {
        self.store.peek(&self.store.key(args.clone()))
    }

    /// Whether a result for the arguments is stored. Does not count as a use.
    pub fn contains(&self, args: &K) -> bool {
        self.store.contains(&self.store.key(args.clone()))
    }

    /// The maximum number of stored results.
    pub fn capacity(&self) -> usize {
        self.store.capacity().get()
    }

    /// The number of stored results.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether no result is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Iterate over the stored arguments and results, from most to least
    /// recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.store.iter()
    }

    /// Hit, miss and eviction counts.
    pub fn stats(&self) -> &Stats {
        self.store.stats()
    }

    /// Zero the hit, miss and eviction counts. Stored results are kept.
    pub fn reset_stats(&mut self) {
        self.store.reset_stats();
    }
}

impl<K, V, F, S> Debug for Cache<K, V, F, S>
where
    K: Key,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("capacity", &self.store.capacity())
            .field("len", &self.store.len())
            .field("stats", self.store.stats())
            .finish()
    }
}

/// The handle through which a [`Recursive`] function calls itself.
pub trait Recurse<K, V> {
    /// Return the function's result for the arguments, computing it only if
    /// it is not cached.
    fn call(&mut self, args: K) -> V;
}

/// The handle through which a fallible [`Recursive`] function calls itself.
pub trait TryRecurse<K, V, E> {
    /// Return the function's result for the arguments, computing it only if
    /// it is not cached. Errors are returned unchanged and not stored.
    fn try_call(&mut self, args: K) -> Result<V, E>;
}

/// A memoizing wrapper around a pure function that recurses through its own
/// cache.
///
/// The function receives a [`Recurse`] handle as its first argument and makes
/// its recursive calls through it, so that subproblems are memoized in the
/// same store. State the recursion depends on is captured by the closure.
///
/// ```
/// use lrumemo::{Recurse, Recursive};
///
/// let mut fib = Recursive::new(
///     |fib: &mut dyn Recurse<(u64,), u64>, (n,): (u64,)| {
///         if n <= 1 { n } else { fib.call((n - 1,)) + fib.call((n - 2,)) }
///     },
///     3,
/// )
/// .unwrap();
///
/// assert_eq!(fib.call((90,)), 2880067194370816120);
/// ```
///
/// A function that can fail is wrapped with [`fallible`](Self::fallible) and
/// recurses through a [`TryRecurse`] handle instead. Only its successful
/// results are stored.
pub struct Recursive<K, V, F, S = FxBuildHasher> {
    store: Lru<K, V, S>,
    func: F,
}

impl<K: Key, V: Clone, F> Recursive<K, V, F> {
    /// Wrap a recursive function, keeping at most `capacity` results.
    ///
    /// Fails if `capacity` is zero.
    pub fn new(func: F, capacity: usize) -> Result<Self>
    where
        F: Fn(&mut dyn Recurse<K, V>, K) -> V,
    {
        Ok(Self::build(func, validate(capacity)?, FxBuildHasher))
    }

    /// Wrap a recursive function, keeping at most [`DEFAULT_CAPACITY`]
    /// results.
    pub fn with_default_capacity(func: F) -> Self
    where
        F: Fn(&mut dyn Recurse<K, V>, K) -> V,
    {
        Self::build(func, DEFAULT, FxBuildHasher)
    }

    /// Wrap a fallible recursive function, keeping at most `capacity`
    /// successful results. Use [`try_call`](Self::try_call) to invoke it.
    pub fn fallible<E>(func: F, capacity: usize) -> Result<Self>
    where
        F: Fn(&mut dyn TryRecurse<K, V, E>, K) -> Result<V, E>,
    {
        Ok(Self::build(func, validate(capacity)?, FxBuildHasher))
    }
}

impl<K: Key, V: Clone, F, S: BuildHasher> Recursive<K, V, F, S> {
    /// Wrap a recursive function, hashing the individual arguments with
    /// hashers built by `hasher`.
    pub fn with_hasher(func: F, capacity: usize, hasher: S) -> Result<Self> {
        Ok(Self::build(func, validate(capacity)?, hasher))
    }

    fn build(func: F, capacity: NonZeroUsize, hasher: S) -> Self {
        debug!(capacity = capacity.get(), "creating recursive memoizing cache");
        Self { store: Lru::new(capacity, hasher), func }
    }

    /// Return the function's result for the arguments, computing it only if
    /// it is not cached.
    pub fn call(&mut self, args: K) -> V
    where
        F: Fn(&mut dyn Recurse<K, V>, K) -> V,
    {
        Frame { store: &mut self.store, func: &self.func }.call(args)
    }

    /// Like [`call`](Self::call), but for a fallible function.
    ///
    /// An error from any level of the recursion is returned unchanged. The
    /// failing level and every level waiting on it store nothing, while
    /// subproblems that succeeded before the failure stay cached.
    pub fn try_call<E>(&mut self, args: K) -> Result<V, E>
    where
        F: Fn(&mut dyn TryRecurse<K, V, E>, K) -> Result<V, E>,
    {
        Frame { store: &mut self.store, func: &self.func }.try_call(args)
    }

    /// The stored result for the arguments, if any. Does not count as a use.
    pub fn peek(&self, args: &K) -> Option<&V> {
        self.store.peek(&self.store.key(args.clone()))
    }

    /// Whether a result for the arguments is stored. Does not count as a use.
    pub fn contains(&self, args: &K) -> bool {
        self.store.contains(&self.store.key(args.clone()))
    }

    /// The maximum number of stored results.
    pub fn capacity(&self) -> usize {
        self.store.capacity().get()
    }

    /// The number of stored results.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether no result is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Iterate over the stored arguments and results, from most to least
    /// recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.store.iter()
    }

    /// Hit, miss and eviction counts.
    pub fn stats(&self) -> &Stats {
        self.store.stats()
    }

    /// Zero the hit, miss and eviction counts. Stored results are kept.
    pub fn reset_stats(&mut self) {
        self.store.reset_stats();
    }
}

impl<K, V, F, S> Debug for Recursive<K, V, F, S>
where
    K: Key,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recursive")
            .field("capacity", &self.store.capacity())
            .field("len", &self.store.len())
            .field("stats", self.store.stats())
            .finish()
    }
}

/// A single level of a recursive computation: the store split from the
/// function so that the function can be handed mutable access to the store.
struct Frame<'a, K, V, F, S> {
    store: &'a mut Lru<K, V, S>,
    func: &'a F,
}

impl<K: Key, V: Clone, F, S: BuildHasher> Recurse<K, V> for Frame<'_, K, V, F, S>
where
    F: Fn(&mut dyn Recurse<K, V>, K) -> V,
{
    fn call(&mut self, args: K) -> V {
        let key = self.store.key(args);
        if let Some(value) = self.store.lookup(&key) {
            return value.clone();
        }

        // Nested calls may insert and evict entries while this one runs.
        let func = self.func;
        let value = func(self, (*key).clone());
        self.store.insert(key, value.clone());
        value
    }
}

impl<K: Key, V: Clone, E, F, S: BuildHasher> TryRecurse<K, V, E> for Frame<'_, K, V, F, S>
where
    F: Fn(&mut dyn TryRecurse<K, V, E>, K) -> Result<V, E>,
{
    fn try_call(&mut self, args: K) -> Result<V, E> {
        let key = self.store.key(args);
        if let Some(value) = self.store.lookup(&key) {
            return Ok(value.clone());
        }

        let func = self.func;
        let value = func(self, (*key).clone())?;
        self.store.insert(key, value.clone());
        Ok(value)
    }
}

const DEFAULT: NonZeroUsize = NonZeroUsize::new(DEFAULT_CAPACITY).unwrap();

/// Reject a zero capacity.
fn validate(capacity: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(capacity).ok_or(Error::ZeroCapacity)
}
