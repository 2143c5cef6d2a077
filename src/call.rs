/// A function that can be invoked with its arguments packed into a tuple.
///
/// Implemented for every `Fn` closure and function pointer with up to twelve
/// arguments. The argument tuple of `fn(A, B) -> R` is `(A, B)`; a
/// single-argument function takes `(A,)`.
pub trait Callable<Args> {
    /// The function's return type.
    type Output;

    /// Invoke the function with the unpacked arguments.
    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! callable {
    ($($name:ident),*) => {
        impl<Func, Ret, $($name),*> Callable<($($name,)*)> for Func
        where
            Func: Fn($($name),*) -> Ret,
        {
            type Output = Ret;

            #[inline]
            #[allow(non_snake_case)]
            fn invoke(&self, ($($name,)*): ($($name,)*)) -> Ret {
                self($($name),*)
            }
        }
    };
}

callable! {}
callable! { A }
callable! { A, B }
callable! { A, B, C }
callable! { A, B, C, D }
callable! { A, B, C, D, E }
callable! { A, B, C, D, E, F }
callable! { A, B, C, D, E, F, G }
callable! { A, B, C, D, E, F, G, H }
callable! { A, B, C, D, E, F, G, H, I }
callable! { A, B, C, D, E, F, G, H, I, J }
callable! { A, B, C, D, E, F, G, H, I, J, K }
callable! { A, B, C, D, E, F, G, H, I, J, K, L }
