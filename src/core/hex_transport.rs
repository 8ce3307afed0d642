//! # Hex Transport Codec
//!
//! Wraps an opaque binary payload for transport inside a generic string field.
//!
//! The wire form is a fixed 6-character magic prefix followed by lowercase hex
//! nibble expansion (high nibble first, two hex characters per byte). The
//! prefix lets a receiver distinguish a wrapped payload from arbitrary text
//! sharing the same field.
//!
//! Laws: `decode(encode(x)) == x` for every payload including the empty one,
//! and `encode(x).len() == 6 + 2 * x.len()`.

use crate::error::{constants, CodecError, Result};

/// Magic prefix identifying a hex-wrapped transport payload.
pub const HEX_TRANSPORT_PREFIX: &str = "ca1be4";

/// Wrap a payload as prefix + lowercase hex.
pub fn encode(payload: &[u8]) -> String {
    let mut out = String::with_capacity(HEX_TRANSPORT_PREFIX.len() + payload.len() * 2);
    out.push_str(HEX_TRANSPORT_PREFIX);
    out.push_str(&hex::encode(payload));
    out
}

/// Unwrap a prefixed hex string back into the payload bytes.
pub fn decode(wrapped: &str) -> Result<Vec<u8>> {
    let raw = wrapped.as_bytes();
    if raw.len() < HEX_TRANSPORT_PREFIX.len() {
        return Err(CodecError::Format(constants::ERR_HEX_TOO_SHORT.to_string()));
    }
    // byte comparison: the prefix is ASCII, so a match guarantees the split
    // below lands on a character boundary
    if &raw[..HEX_TRANSPORT_PREFIX.len()] != HEX_TRANSPORT_PREFIX.as_bytes() {
        return Err(CodecError::Format(
            constants::ERR_HEX_BAD_PREFIX.to_string(),
        ));
    }
    let digits = &wrapped[HEX_TRANSPORT_PREFIX.len()..];
    if digits.len() % 2 != 0 {
        return Err(CodecError::Format(
            constants::ERR_HEX_ODD_DIGITS.to_string(),
        ));
    }
    hex::decode(digits).map_err(|_| CodecError::Format(constants::ERR_HEX_BAD_DIGIT.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_bare_prefix() {
        assert_eq!(encode(b""), "ca1be4");
        assert_eq!(decode("ca1be4").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn roundtrip_and_length_law() {
        let payload = b"\x00\x01\xfe\xff hello";
        let wrapped = encode(payload);
        assert_eq!(wrapped.len(), 6 + 2 * payload.len());
        assert_eq!(decode(&wrapped).unwrap(), payload);
    }

    #[test]
    fn lowercase_high_nibble_first() {
        assert_eq!(encode(&[0xde, 0xad, 0xbe, 0xef]), "ca1be4deadbeef");
    }

    #[test]
    fn bad_prefix_rejected() {
        let err = decode("ca1be6deadbeef").unwrap_err();
        assert!(matches!(err, CodecError::Format(_)));
    }

    #[test]
    fn short_input_rejected() {
        assert!(matches!(decode("ca1"), Err(CodecError::Format(_))));
        assert!(matches!(decode(""), Err(CodecError::Format(_))));
    }

    #[test]
    fn odd_digit_count_rejected() {
        let err = decode("ca1be4abc").unwrap_err();
        assert!(matches!(err, CodecError::Format(_)));
    }

    #[test]
    fn non_hex_digit_rejected() {
        let err = decode("ca1be4zz").unwrap_err();
        assert!(matches!(err, CodecError::Format(_)));
    }
}
