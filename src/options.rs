//! Per-conversion options supplied by the caller.
//!
//! Only a few routines read these: the quality fraction applies to lossy
//! raster targets, the dimensions to the resize target, and the timeout to
//! every conversion. Unknown knobs for a given routine are simply ignored,
//! so one options value can be reused across a whole batch.
//!
//! Ranges are enforced, not clamped: UI fields arrive as free-form numeric
//! input, and a typo'd quality of `90` must come back as an error instead
//! of reaching the encoder. [`ConversionOptions::validate`] rejects
//! out-of-range values before any routine runs.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

/// Options for a single conversion.
///
/// `Default` gives the values the UI slider defaults imply: quality 0.9,
/// source dimensions, a 30-second budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// Quality fraction in `[0, 1]` for lossy raster targets.
    /// `None` means [`ConversionOptions::DEFAULT_QUALITY`].
    pub quality: Option<f32>,

    /// Target width in pixels for the resize routine. `None` falls back to
    /// the source width.
    pub width: Option<u32>,

    /// Target height in pixels for the resize routine. `None` falls back to
    /// the source height.
    pub height: Option<u32>,

    /// Per-file conversion budget in seconds. A routine that exceeds it is
    /// reported as [`ConvertError::Timeout`] instead of hanging its batch.
    pub timeout_secs: u64,
}

impl ConversionOptions {
    /// Quality used when the caller supplies none.
    pub const DEFAULT_QUALITY: f32 = 0.9;

    /// Default per-file budget in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// The quality fraction, defaulted.
    pub fn quality_or_default(&self) -> f32 {
        self.quality.unwrap_or(Self::DEFAULT_QUALITY)
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_dimensions(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Check every supplied value against its legal range.
    ///
    /// Quality must lie in `[0, 1]`, dimensions must be at least 1 pixel,
    /// and the timeout must be non-zero.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if let Some(q) = self.quality {
            if !q.is_finite() || !(0.0..=1.0).contains(&q) {
                return Err(ConvertError::InvalidOptions(format!(
                    "quality must be a fraction in [0, 1], got {q}"
                )));
            }
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(ConvertError::InvalidOptions(
                "dimensions must be at least 1 pixel".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConvertError::InvalidOptions(
                "timeout must be at least 1 second".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            quality: None,
            width: None,
            height: None,
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }
}
