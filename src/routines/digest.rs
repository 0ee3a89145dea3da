//! Content digests: a SHA-256 fingerprint report for any file.
//!
//! Not a conversion in the transformative sense; the output is a small
//! plain-text report identifying the input by content. Deterministic by
//! construction: identical bytes always produce the identical report body
//! (the filename line aside).

use sha2::{Digest, Sha256};

/// Hash the raw input bytes and format the fingerprint report.
///
/// ```text
/// File: photo.jpg
/// SHA-256: 9f86d081884c7d65...
/// ```
pub fn digest_report(name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hex::encode(hasher.finalize());
    format!("File: {name}\nSHA-256: {digest}").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_hash_identically() {
        let a = digest_report("a.bin", b"payload");
        let b = digest_report("a.bin", b"payload");
        assert_eq!(a, b);
    }

    #[test]
    fn single_byte_change_changes_the_digest() {
        let a = digest_report("a.bin", b"payload");
        let b = digest_report("a.bin", b"paylo4d");
        assert_ne!(a, b);
    }

    #[test]
    fn report_shape() {
        let report = String::from_utf8(digest_report("notes.txt", b"")).unwrap();
        let mut lines = report.lines();
        assert_eq!(lines.next(), Some("File: notes.txt"));
        let digest_line = lines.next().unwrap();
        // SHA-256 of the empty input, a known constant.
        assert_eq!(
            digest_line,
            "SHA-256: e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
