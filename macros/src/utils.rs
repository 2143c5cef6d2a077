use syn::{
    parse::{Parse, ParseStream},
    token::Token,
};

use super::*;

/// Parse a metadata key-value pair, separated by `=`.
pub fn parse_key_value<K: Token + Default + Parse, V: Parse>(
    input: ParseStream,
) -> Result<Option<V>> {
    if !input.peek(|_| K::default()) {
        return Ok(None);
    }

    let _: K = input.parse()?;
    let _: syn::Token![=] = input.parse()?;
    let value: V = input.parse::<V>()?;
    eat_comma(input)?;
    Ok(Some(value))
}

/// Parse a bare metadata keyword.
pub fn parse_flag<K: Token + Default + Parse>(input: ParseStream) -> Result<bool> {
    if !input.peek(|_| K::default()) {
        return Ok(false);
    }

    let _: K = input.parse()?;
    eat_comma(input)?;
    Ok(true)
}

/// Parse a comma if there is one.
pub fn eat_comma(input: ParseStream) -> Result<()> {
    if input.peek(syn::Token![,]) {
        let _: syn::Token![,] = input.parse()?;
    }
    Ok(())
}
