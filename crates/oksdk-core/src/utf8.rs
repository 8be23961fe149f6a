//! UTF-8 codec used for signature input and widget payloads.
//!
//! The codec works on UTF-16 code units, the way the platform's own
//! signing code does. Units below 0x80 take one byte, units below 0x800
//! take two, everything else takes three. Characters outside the Basic
//! Multilingual Plane are therefore written as two 3-byte surrogate
//! sequences instead of one 4-byte sequence. This is a known limitation
//! kept for signature compatibility; for BMP text the output equals
//! standard UTF-8.

/// Encode a string into the platform's byte form.
pub fn encode_utf8(input: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for unit in input.encode_utf16() {
        push_unit(&mut out, unit);
    }
    out
}

fn push_unit(out: &mut Vec<u8>, unit: u16) {
    match unit {
        0..=0x7f => out.push(unit as u8),
        0x80..=0x7ff => {
            out.push(((unit >> 6) as u8) | 0xc0);
            out.push(((unit & 0x3f) as u8) | 0x80);
        }
        _ => {
            out.push(((unit >> 12) as u8) | 0xe0);
            out.push((((unit >> 6) & 0x3f) as u8) | 0x80);
            out.push(((unit & 0x3f) as u8) | 0x80);
        }
    }
}

/// Decode bytes produced by [`encode_utf8`] (or plain BMP UTF-8).
///
/// Lead bytes below 0x80 are single units, 0xC0..=0xDF start a 2-byte
/// sequence and any other byte starts a 3-byte sequence. Missing
/// continuation bytes at the end of input read as zero. Unpaired
/// surrogates decode to U+FFFD.
pub fn decode_utf8(bytes: &[u8]) -> String {
    let at = |i: usize| u16::from(bytes.get(i).copied().unwrap_or(0));

    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let lead = at(i);
        if lead < 0x80 {
            units.push(lead);
            i += 1;
        } else if (0xc0..0xe0).contains(&lead) {
            units.push(((lead & 0x1f) << 6) | (at(i + 1) & 0x3f));
            i += 2;
        } else {
            units.push(((lead & 0x0f) << 12) | ((at(i + 1) & 0x3f) << 6) | (at(i + 2) & 0x3f));
            i += 3;
        }
    }

    String::from_utf16_lossy(&units)
}
