//! The default QR encoder: `qrcode` for the module matrix, rendered onto a
//! fixed-size grayscale bitmap by hand.
//!
//! The matrix is painted with nearest-neighbour sampling so the output is
//! always exactly `side_px` square regardless of symbol version, matching
//! the fixed-canvas behaviour users expect from the converter.

use super::QrEncoder;
use crate::error::ConvertError;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;
use tracing::debug;

/// Crate-backed [`QrEncoder`]. Always encodes at [`EcLevel::H`], the
/// highest error-correction level.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixQrEncoder;

impl QrEncoder for MatrixQrEncoder {
    fn encode_png(&self, text: &str, side_px: u32) -> Result<Vec<u8>, ConvertError> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H).map_err(
            |e| match e {
                QrError::DataTooLong => ConvertError::CapacityExceeded {
                    payload_bytes: text.len(),
                    detail: "text does not fit a QR symbol at high error correction".into(),
                },
                other => ConvertError::EncodeFailure {
                    what: "qr",
                    detail: format!("{other:?}"),
                },
            },
        )?;

        let modules = code.width();
        let colors = code.to_colors();
        debug!("QR symbol: {} modules, {} px canvas", modules, side_px);

        let mut bitmap = GrayImage::from_pixel(side_px, side_px, Luma([255]));
        for (x, y, pixel) in bitmap.enumerate_pixels_mut() {
            let mx = (x as usize * modules) / side_px as usize;
            let my = (y as usize * modules) / side_px as usize;
            if colors[my * modules + mx] == Color::Dark {
                *pixel = Luma([0]);
            }
        }

        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(bitmap)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| ConvertError::EncodeFailure {
                what: "qr",
                detail: e.to_string(),
            })?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_payload_renders_at_requested_size() {
        let png = MatrixQrEncoder.encode_png("hello qr", 512).unwrap();
        let image = image::load_from_memory(&png).unwrap();
        assert_eq!((image.width(), image.height()), (512, 512));
        // A QR bitmap has both dark and light pixels.
        let gray = image.to_luma8();
        assert!(gray.pixels().any(|p| p[0] == 0));
        assert!(gray.pixels().any(|p| p[0] == 255));
    }

    #[test]
    fn oversized_payload_reports_capacity() {
        // Version 40 at EcLevel::H caps out near 1.2 KB of binary payload.
        let huge = "x".repeat(4000);
        let err = MatrixQrEncoder.encode_png(&huge, 512).unwrap_err();
        assert!(matches!(err, ConvertError::CapacityExceeded { .. }));
    }

    #[test]
    fn deterministic_for_identical_text() {
        let a = MatrixQrEncoder.encode_png("same", 128).unwrap();
        let b = MatrixQrEncoder.encode_png("same", 128).unwrap();
        assert_eq!(a, b);
    }
}
