//! Plain-text transforms: Base64, percent-encoding, and QR generation.

use crate::codec::QrEncoder;
use crate::error::ConvertError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// QR bitmap side length in pixels.
pub const QR_SIDE_PX: u32 = 512;

/// The characters `encodeURIComponent` leaves intact, i.e. everything else
/// in the non-alphanumeric range is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Base64 over the raw input bytes. Byte-accurate: the bytes are encoded
/// as-is, with no intermediate text decoding that could drop data.
pub fn base64_encode(bytes: &[u8]) -> Vec<u8> {
    STANDARD.encode(bytes).into_bytes()
}

/// Percent-encode the text content, `encodeURIComponent`-compatible.
pub fn url_encode(text: &str) -> Vec<u8> {
    utf8_percent_encode(text, URI_COMPONENT).to_string().into_bytes()
}

/// Render the text as a 512×512 QR bitmap at high error correction.
///
/// Oversized payloads fail with [`ConvertError::CapacityExceeded`]; nothing
/// is truncated to fit.
pub fn qr_png(text: &str, qr: &dyn QrEncoder) -> Result<Vec<u8>, ConvertError> {
    qr.encode_png(text, QR_SIDE_PX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_known_vector() {
        assert_eq!(base64_encode(b"hello"), b"aGVsbG8=");
        assert_eq!(base64_encode(b""), b"");
    }

    #[test]
    fn base64_is_byte_accurate_for_non_utf8() {
        let bytes = [0x00, 0xFF, 0x80, 0x7F];
        assert_eq!(base64_encode(&bytes), b"AP+Afw==");
    }

    #[test]
    fn url_encode_matches_encode_uri_component() {
        assert_eq!(url_encode("a b&c"), b"a%20b%26c");
        // The unreserved marks stay literal.
        assert_eq!(url_encode("-_.!~*'()"), b"-_.!~*'()");
        // Multi-byte UTF-8 escapes per byte.
        assert_eq!(url_encode("é"), b"%C3%A9");
    }
}
