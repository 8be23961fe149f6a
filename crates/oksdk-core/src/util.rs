//! Base64 helpers exposed alongside the UTF-8 codec.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::Result;

/// Standard base64 with padding.
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode standard base64. Surrounding whitespace is ignored.
pub fn decode_base64(input: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(input.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::utf8::{decode_utf8, encode_utf8};

    #[test]
    fn test_base64_roundtrip() {
        let encoded = encode_base64(b"<div>back</div>");
        assert_eq!(encoded, "PGRpdj5iYWNrPC9kaXY+");
        assert_eq!(decode_base64(&encoded).unwrap(), b"<div>back</div>".to_vec());
    }

    #[test]
    fn test_base64_then_utf8() {
        let html = "<a>Назад</a>";
        let encoded = encode_base64(&encode_utf8(html));
        assert_eq!(decode_utf8(&decode_base64(&encoded).unwrap()), html);
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(decode_base64("not base64!"), Err(CoreError::Base64(_))));
    }
}
