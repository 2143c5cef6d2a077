use thiserror::Error;

/// The result type for cache operations, defaulting to this crate's error.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A configuration error detected while constructing a cache.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum Error {
    /// A cache must be able to hold at least one entry.
    #[error("cache capacity must be at least 1")]
    ZeroCapacity,
}
