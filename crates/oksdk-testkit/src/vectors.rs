//! Golden test vectors for deterministic verification.
//!
//! Digest vectors are the RFC 1321 test suite plus non-ASCII input.
//! Signature vectors pin the canonical string layout and the exclusion
//! of `sig` and `access_token`.

use oksdk_core::{md5_hex, sign, Params};

/// A golden digest vector.
#[derive(Debug, Clone)]
pub struct DigestVector {
    /// Input text, digested as UTF-8.
    pub input: &'static str,
    /// Expected digest (hex).
    pub expected: &'static str,
}

/// A golden signature vector.
#[derive(Debug, Clone)]
pub struct SignatureVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Call parameters, in no particular order.
    pub params: &'static [(&'static str, &'static str)],
    /// Signing secret.
    pub secret: &'static str,
    /// Expected signature (hex).
    pub expected: &'static str,
}

impl SignatureVector {
    pub fn params(&self) -> Params {
        self.params.iter().copied().collect()
    }
}

/// RFC 1321 appendix A.5 plus a Cyrillic input.
pub fn digest_vectors() -> Vec<DigestVector> {
    vec![
        DigestVector { input: "", expected: "d41d8cd98f00b204e9800998ecf8427e" },
        DigestVector { input: "a", expected: "0cc175b9c0f1b6a831c399e269772661" },
        DigestVector { input: "abc", expected: "900150983cd24fb0d6963f7d28e17f72" },
        DigestVector {
            input: "message digest",
            expected: "f96b697d7cb7938d525a2f31aaf161d0",
        },
        DigestVector {
            input: "abcdefghijklmnopqrstuvwxyz",
            expected: "c3fcd3d76192e4007dfb496cca67e13b",
        },
        DigestVector {
            input: "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789",
            expected: "d174ab98d277d9f5a5611c2c9f419d9f",
        },
        DigestVector {
            input: "12345678901234567890123456789012345678901234567890123456789012345678901234567890",
            expected: "57edf4a22be3c955ac49da2e2107b67a",
        },
        DigestVector { input: "Привет", expected: "8a669e9418750c81ab90ae159a8ec410" },
    ]
}

/// Signature vectors over canonicalized parameter maps.
pub fn signature_vectors() -> Vec<SignatureVector> {
    vec![
        SignatureVector {
            name: "platform session call",
            params: &[
                ("method", "users.getCurrentUser"),
                ("session_key", "sk-1"),
                ("format", "JSON"),
                ("application_key", "CBAFJIICABABABABA"),
            ],
            secret: "secret",
            expected: "a5fc03cffc843f7ad810b43d168d5255",
        },
        SignatureVector {
            name: "token call, access_token unsigned",
            params: &[
                ("access_token", "tok"),
                ("application_key", "CBAFJIICABABABABA"),
                ("format", "JSON"),
                ("method", "friends.get"),
            ],
            secret: "secret",
            expected: "d1a28bab64519decce9f866c379a3b6a",
        },
        SignatureVector {
            name: "non-ASCII value",
            params: &[
                ("text", "Привет, мир"),
                ("application_key", "CBAFJIICABABABABA"),
                ("method", "mediatopic.post"),
                ("format", "JSON"),
                ("session_key", "sk-1"),
            ],
            secret: "secret",
            expected: "b102f343822a4de6f1c56a4db1f84efe",
        },
        SignatureVector {
            name: "session call without secret",
            params: &[
                ("application_key", "CBAFJIICABABABABA"),
                ("format", "JSON"),
                ("method", "users.getCurrentUser"),
                ("session_key", "sk-1"),
            ],
            secret: "",
            expected: "6720d877e2c85aaa1cfe2e65b78deffa",
        },
        SignatureVector {
            name: "empty",
            params: &[],
            secret: "",
            expected: "d41d8cd98f00b204e9800998ecf8427e",
        },
    ]
}

/// Check every vector against this implementation.
///
/// Returns `(name, matches, computed hex)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let digests = digest_vectors().into_iter().map(|v| {
        let hex = md5_hex(v.input.as_bytes());
        (format!("md5({:?})", v.input), hex == v.expected, hex)
    });
    let signatures = signature_vectors().into_iter().map(|v| {
        let hex = sign(&v.params(), v.secret).to_hex();
        (v.name.to_string(), hex == v.expected, hex)
    });
    digests.chain(signatures).collect()
}
