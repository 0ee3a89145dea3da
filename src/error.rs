//! Error types for the fileflex library.
//!
//! All failures share one enum, [`ConvertError`], at single-file granularity:
//! a failed conversion marks that file and nothing else. Batch processing
//! ([`crate::batch`]) records the error in its report and moves on to the
//! next queued file; no error here ever aborts a batch.
//!
//! The variants follow the conversion pipeline's failure taxonomy:
//! input could not be read ([`Io`](ConvertError::Io)), input bytes do not
//! parse as claimed ([`DecodeFailure`](ConvertError::DecodeFailure)), output
//! generation failed ([`EncodeFailure`](ConvertError::EncodeFailure)), the
//! payload does not fit the target
//! ([`CapacityExceeded`](ConvertError::CapacityExceeded)), or the request
//! itself was malformed
//! ([`UnsupportedCombination`](ConvertError::UnsupportedCombination),
//! [`InvalidOptions`](ConvertError::InvalidOptions)).

use crate::category::Category;
use thiserror::Error;

/// All errors returned by the fileflex library.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The chosen target descriptor is not listed in the catalog for the
    /// input's category. Correctly wired callers never hit this: it means
    /// the UI offered a target the catalog does not.
    #[error("'{label}' is not a valid target for {category} input")]
    UnsupportedCombination {
        /// Category the input was classified as.
        category: Category,
        /// Label of the rejected descriptor.
        label: String,
    },

    /// The input bytes do not parse as the format their category implies
    /// (corrupt image, invalid JSON, unterminated CSV quote, empty workbook).
    #[error("failed to decode {what}: {detail}")]
    DecodeFailure {
        /// What we tried to decode ("image", "json", "csv", ...).
        what: &'static str,
        detail: String,
    },

    /// Producing the output failed after the input decoded cleanly.
    #[error("failed to encode {what}: {detail}")]
    EncodeFailure {
        /// What we tried to produce ("jpeg", "pdf", "workbook", ...).
        what: &'static str,
        detail: String,
    },

    /// The payload is too large for the target format, e.g. text that does
    /// not fit a QR symbol at the fixed size and error-correction level.
    #[error("payload of {payload_bytes} bytes exceeds target capacity: {detail}")]
    CapacityExceeded {
        payload_bytes: usize,
        detail: String,
    },

    /// The input bytes could not be read at all.
    #[error("could not read input bytes: {0}")]
    Io(#[from] std::io::Error),

    /// Caller-supplied options are out of range (quality outside [0, 1],
    /// zero dimensions). Nothing is clamped silently; the caller must fix
    /// the value and retry.
    #[error("invalid conversion options: {0}")]
    InvalidOptions(String),

    /// The conversion did not finish within the configured per-file budget.
    /// The worker thread is abandoned, not killed; sibling files continue.
    #[error("conversion timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// Short status label for UI status lines ("Error: decode failed").
    ///
    /// The full `Display` text can be long; this stays a few words.
    pub fn label(&self) -> &'static str {
        match self {
            ConvertError::UnsupportedCombination { .. } => "unsupported target",
            ConvertError::DecodeFailure { .. } => "decode failed",
            ConvertError::EncodeFailure { .. } => "encode failed",
            ConvertError::CapacityExceeded { .. } => "payload too large",
            ConvertError::Io(_) => "read failed",
            ConvertError::InvalidOptions(_) => "invalid options",
            ConvertError::Timeout { .. } => "timed out",
            ConvertError::Internal(_) => "internal error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_combination_display_names_both_sides() {
        let e = ConvertError::UnsupportedCombination {
            category: Category::Csv,
            label: "PNG".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("PNG"), "got: {msg}");
        assert!(msg.contains("csv"), "got: {msg}");
    }

    #[test]
    fn labels_are_short() {
        let errors = [
            ConvertError::DecodeFailure {
                what: "json",
                detail: "trailing comma at line 3".into(),
            },
            ConvertError::Timeout { secs: 30 },
            ConvertError::InvalidOptions("quality 1.5".into()),
        ];
        for e in errors {
            assert!(e.label().len() < 32);
        }
    }
}
