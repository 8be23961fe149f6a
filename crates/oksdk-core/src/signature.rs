//! Request signing.
//!
//! `sig = md5(utf8(canonical_string(params) + secret))`, rendered as
//! lowercase hex.

use crate::canonical::canonical_string;
use crate::digest::Md5Digest;
use crate::params::Params;
use crate::utf8::encode_utf8;

/// Sign a parameter map with the given secret.
///
/// Identical maps and secrets always produce identical signatures, and
/// the `sig` and `access_token` keys never influence the result.
pub fn sign(params: &Params, secret: &str) -> Md5Digest {
    let mut source = canonical_string(params);
    source.push_str(secret);
    sign_raw(&source)
}

/// Digest an already assembled signature source.
pub fn sign_raw(source: &str) -> Md5Digest {
    Md5Digest::compute(&encode_utf8(source))
}
