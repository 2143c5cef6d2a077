//! Bounded least-recently-used memoization.
//!
//! A [`Cache`] wraps a pure function and remembers its results for the most
//! recently used argument tuples, up to a fixed capacity. A [`Recursive`]
//! cache additionally lets the function recurse through its own cache. The
//! [`memoize`] attribute gives every annotated function a thread-local cache.
//!
//! ```
//! use lrumemo::memoize;
//!
//! #[memoize(capacity = 64)]
//! fn fib(n: u64) -> u64 {
//!     if n <= 1 { n } else { fib(n - 1) + fib(n - 2) }
//! }
//!
//! assert_eq!(fib(80), 23416728348467685);
//! ```

mod cache;
mod call;
mod error;
mod hash;
mod key;
mod lru;
mod memoize;
mod passthroughhasher;
mod stats;
#[cfg(feature = "testing")]
mod testing;

pub use crate::call::Callable;
pub use crate::error::{Error, Result};
pub use crate::hash::{Key, SipBuildHasher};
pub use crate::memoize::{Cache, DEFAULT_CAPACITY, Recurse, Recursive, TryRecurse};
pub use crate::stats::Stats;

#[cfg(feature = "macros")]
pub use lrumemo_macros::memoize;

/// These are implementation details. Do not rely on them!
#[doc(hidden)]
pub mod internal {
    pub use crate::cache::{Fallible, LocalCache, memoized, memoized_fallible};

    #[cfg(feature = "testing")]
    pub use crate::testing::last_was_hit;
}
