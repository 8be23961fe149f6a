//! Proptest generators for property-based testing.

use proptest::prelude::*;

use oksdk_core::Params;

/// Generate a parameter name.
pub fn param_key() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,15}".prop_map(String::from)
}

/// Generate a parameter value, ASCII plus Cyrillic.
pub fn param_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,:;=&?/а-яА-Я]{0,24}".prop_map(String::from)
}

/// Generate a string of code points below U+0800.
pub fn bmp_text(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(0u32..0x800, 0..=max_len)
        .prop_map(|points| points.into_iter().filter_map(char::from_u32).collect())
}

/// Generate a parameter map.
pub fn params(max_len: usize) -> impl Strategy<Value = Params> {
    prop::collection::btree_map(param_key(), param_value(), 0..=max_len).prop_map(Params::from)
}

/// Generate a signing secret.
pub fn secret() -> impl Strategy<Value = String> {
    "[a-f0-9]{0,32}".prop_map(String::from)
}

/// Generate a launch query string with its expected decoded pairs.
pub fn launch_query(max_len: usize) -> impl Strategy<Value = (String, Params)> {
    params(max_len).prop_map(|params| (format!("?{}", params.to_query_string()), params))
}
