use std::cell::Cell;

thread_local! {
    static LAST_WAS_HIT: Cell<bool> = const { Cell::new(false) };
}

/// Whether the most recent `#[memoize]` call on this thread that returned
/// was served from its function's cache.
///
/// For a recursive function this reflects the outermost call, which finishes
/// last.
pub fn last_was_hit() -> bool {
    LAST_WAS_HIT.with(Cell::get)
}

/// Records that a `#[memoize]` call returned a stored result.
pub(crate) fn register_hit() {
    LAST_WAS_HIT.with(|flag| flag.set(true))
}

/// Records that a `#[memoize]` call executed its function body.
pub(crate) fn register_miss() {
    LAST_WAS_HIT.with(|flag| flag.set(false))
}
