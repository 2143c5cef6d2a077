extern crate proc_macro;

macro_rules! bail {
    ($item:expr, $fmt:literal $($tts:tt)*) => {
        return Err(Error::new_spanned(
            &$item,
            format!(concat!("lrumemo: ", $fmt) $($tts)*)
        ))
    }
}

mod memoize;
mod utils;

use proc_macro::TokenStream;
use quote::quote;
use syn::{Error, Result, parse_quote};

/// Memoize a pure function in a bounded, thread-local LRU cache.
///
/// Each annotated function gets its own cache per thread, holding the results
/// of the most recently used argument tuples. The capacity defaults to 1024
/// and can be set with `capacity = N`. Recursive calls of the function go
/// through the same cache.
///
/// ```ignore
/// #[memoize(capacity = 2)]
/// fn square(x: u64) -> u64 {
///     x * x
/// }
/// ```
///
/// A function returning a `Result` only stores its successful results. An
/// error is returned unchanged and the next call with the same arguments runs
/// the function again. The return type is recognized when its path ends in
/// `Result`. For other aliases of `Result`, write `#[memoize(fallible)]`.
///
/// All arguments must be owned values that implement `Hash`, `Eq` and
/// `Clone`, and the return type must implement `Clone`.
#[proc_macro_attribute]
pub fn memoize(args: TokenStream, stream: TokenStream) -> TokenStream {
    let meta = syn::parse_macro_input!(args as memoize::Meta);
    let func = syn::parse_macro_input!(stream as syn::ItemFn);
    memoize::expand(&meta, func)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
