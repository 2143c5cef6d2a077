use syn::parse::{Parse, ParseStream};

use super::*;

syn::custom_keyword!(capacity);
syn::custom_keyword!(fallible);

/// The capacity of a memoized function's cache when none is given.
const DEFAULT_CAPACITY: usize = 1024;

/// The arguments of the `memoize` attribute.
pub struct Meta {
    capacity: usize,
    fallible: bool,
}

impl Parse for Meta {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut meta = Self { capacity: DEFAULT_CAPACITY, fallible: false };
        while !input.is_empty() {
            if let Some(lit) = crate::utils::parse_key_value::<capacity, syn::LitInt>(input)? {
                let value: usize = lit.base10_parse()?;
                if value == 0 {
                    bail!(lit, "capacity must be at least 1");
                }
                meta.capacity = value;
            } else if crate::utils::parse_flag::<fallible>(input)? {
                meta.fallible = true;
            } else {
                return Err(input.error("lrumemo: expected `capacity = <integer>` or `fallible`"));
            }
        }
        Ok(meta)
    }
}

/// Memoize a function.
pub fn expand(meta: &Meta, mut func: syn::ItemFn) -> Result<proc_macro2::TokenStream> {
    if let Some(param) = func.sig.generics.params.first() {
        bail!(param, "generic functions are not supported");
    }

    if let Some(asyncness) = &func.sig.asyncness {
        bail!(asyncness, "async functions are not supported");
    }

    let mut args = vec![];
    let mut types = vec![];
    for input in &func.sig.inputs {
        let typed = match input {
            syn::FnArg::Typed(typed) => typed,
            syn::FnArg::Receiver(_) => {
                bail!(input, "methods are not supported")
            }
        };

        let name = match typed.pat.as_ref() {
            syn::Pat::Ident(syn::PatIdent {
                by_ref: None,
                mutability: None,
                ident,
                subpat: None,
                ..
            }) => ident,
            pat => bail!(pat, "only simple identifiers are supported"),
        };

        let ty = typed.ty.as_ref();
        match ty {
            syn::Type::Reference(_) => {
                bail!(ty, "arguments must be owned, the cache stores them by value")
            }
            syn::Type::ImplTrait(_) => bail!(ty, "`impl Trait` arguments are not supported"),
            _ => {}
        }

        args.push(name);
        types.push(ty);
    }

    let mut fallible = meta.fallible;
    let output = match &func.sig.output {
        syn::ReturnType::Default => {
            if fallible {
                bail!(func.sig, "fallible functions must return a `Result`");
            }
            quote! { () }
        }
        syn::ReturnType::Type(_, ty) => {
            if let syn::Type::ImplTrait(_) = ty.as_ref() {
                bail!(ty, "`impl Trait` return types are not supported");
            }
            fallible |= is_result(ty);
            quote! { #ty }
        }
    };

    // Fallible functions only store their successful results.
    let (value_type, entry) = if fallible {
        (
            quote! { <#output as ::lrumemo::internal::Fallible>::Value },
            quote! { ::lrumemo::internal::memoized_fallible },
        )
    } else {
        (output, quote! { ::lrumemo::internal::memoized })
    };

    // Construct a tuple from all arguments and one from their types.
    let arg_tuple = quote! { (#(#args,)*) };
    let key_type = quote! { (#(#types,)*) };

    // Construct the inner closure.
    let body = &func.block;
    let closure = quote! { |#arg_tuple| #body };

    // Adjust the function's body.
    let capacity = proc_macro2::Literal::usize_unsuffixed(meta.capacity);
    func.block = parse_quote! { {
        ::std::thread_local! {
            static __LRUMEMO_CACHE: ::lrumemo::internal::LocalCache<#key_type, #value_type> =
                ::lrumemo::internal::LocalCache::new(
                    const { ::std::num::NonZeroUsize::new(#capacity).unwrap() },
                );
        }

        #entry(&__LRUMEMO_CACHE, #arg_tuple, #closure)
    } };

    Ok(quote! { #func })
}

/// Whether a return type is spelled as some `Result`, like `Result<T, E>` or
/// `io::Result<T>`.
fn is_result(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(syn::TypePath { qself: None, path }) => {
            path.segments.last().is_some_and(|segment| segment.ident == "Result")
        }
        syn::Type::Paren(paren) => is_result(&paren.elem),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meta() {
        let meta: Meta = syn::parse_str("").unwrap();
        assert_eq!(meta.capacity, DEFAULT_CAPACITY);
        assert!(!meta.fallible);

        let meta: Meta = syn::parse_str("capacity = 8, fallible").unwrap();
        assert_eq!(meta.capacity, 8);
        assert!(meta.fallible);

        let meta: Meta = syn::parse_str("fallible, capacity = 3").unwrap();
        assert_eq!(meta.capacity, 3);
        assert!(meta.fallible);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let err = syn::parse_str::<Meta>("capacity = 0").err().unwrap();
        assert_eq!(err.to_string(), "lrumemo: capacity must be at least 1");
    }

    #[test]
    fn test_unknown_argument_is_rejected() {
        assert!(syn::parse_str::<Meta>("size = 4").is_err());
    }

    #[test]
    fn test_result_detection() {
        let result = |src: &str| is_result(&syn::parse_str::<syn::Type>(src).unwrap());
        assert!(result("Result<u32, String>"));
        assert!(result("std::io::Result<u32>"));
        assert!(!result("Option<u32>"));
        assert!(!result("(u32, Result<u8, ()>)"));
    }

    #[test]
    fn test_fallible_expansion() {
        let func: syn::ItemFn = syn::parse_quote! {
            fn parse(s: String) -> Result<i32, String> {
                s.parse().map_err(|_| s)
            }
        };
        let meta: Meta = syn::parse_str("").unwrap();
        let expanded = expand(&meta, func).unwrap().to_string();
        assert!(expanded.contains("memoized_fallible"));
        assert!(expanded.contains("Fallible"));
    }
}
