//! Raster routines: re-encode, resize, privacy strip, and raster→document.
//!
//! All four share the same spine: decode the source into a pixel surface,
//! adjust the surface, hand it to an encoder. The surface is the only thing
//! that crosses between steps, which is what makes the privacy strip work:
//! re-rasterising through pixels cannot carry EXIF or any other embedded
//! metadata into the output, so no explicit strip step exists.
//!
//! Opaque targets (JPEG) are composited over a white background first.
//! Without that, transparent pixels collapse to black when the alpha
//! channel is discarded.

use crate::category::Category;
use crate::codec::{DocumentWriter, ImageCodec, RasterFormat};
use crate::error::ConvertError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

/// Decode the input for its category: SVG sources are rasterised at their
/// natural size, raster sources are decoded directly.
fn decode(
    bytes: &[u8],
    category: Category,
    codec: &dyn ImageCodec,
) -> Result<DynamicImage, ConvertError> {
    let image = if category == Category::Vector {
        codec.decode_vector(bytes)?
    } else {
        codec.decode_raster(bytes)?
    };
    debug!("Decoded {}x{} pixel surface", image.width(), image.height());
    Ok(image)
}

/// Composite over an opaque white canvas of the same dimensions.
fn composite_over_white(image: &DynamicImage) -> DynamicImage {
    let source = image.to_rgba8();
    let (width, height) = source.dimensions();
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &source, 0, 0);
    DynamicImage::ImageRgba8(canvas)
}

/// Re-encode the source in the target raster format at the given quality.
///
/// Quality applies to lossy targets only; PNG ignores it, and WEBP is
/// encoded losslessly by the default codec.
pub fn reencode(
    bytes: &[u8],
    category: Category,
    format: RasterFormat,
    quality: f32,
    codec: &dyn ImageCodec,
) -> Result<Vec<u8>, ConvertError> {
    let decoded = decode(bytes, category, codec)?;
    let surface = if format.supports_alpha() {
        decoded
    } else {
        composite_over_white(&decoded)
    };
    codec.encode(&surface, format, quality)
}

/// Re-encode as PNG at caller-supplied dimensions.
///
/// An omitted dimension falls back to the source's; the surface is scaled
/// to exactly the requested size, aspect ratio not preserved (the caller
/// chose both numbers).
pub fn resize(
    bytes: &[u8],
    category: Category,
    width: Option<u32>,
    height: Option<u32>,
    codec: &dyn ImageCodec,
) -> Result<Vec<u8>, ConvertError> {
    let decoded = decode(bytes, category, codec)?;
    let target_w = width.unwrap_or(decoded.width());
    let target_h = height.unwrap_or(decoded.height());
    let surface = if (target_w, target_h) == (decoded.width(), decoded.height()) {
        decoded
    } else {
        debug!(
            "Resizing {}x{} -> {}x{}",
            decoded.width(),
            decoded.height(),
            target_w,
            target_h
        );
        decoded.resize_exact(target_w, target_h, FilterType::Lanczos3)
    };
    codec.encode(&surface, RasterFormat::Png, 1.0)
}

/// Re-rasterise to a clean PNG. Metadata removal falls out of the decode,
/// which reads pixels and nothing else.
pub fn privacy_strip(bytes: &[u8], codec: &dyn ImageCodec) -> Result<Vec<u8>, ConvertError> {
    let decoded = codec.decode_raster(bytes)?;
    codec.encode(&decoded, RasterFormat::Png, 1.0)
}

/// Wrap the raster as a single document page sized to its pixel
/// dimensions. Orientation follows from the dimensions themselves:
/// width > height produces a landscape page.
pub fn to_document(
    bytes: &[u8],
    category: Category,
    codec: &dyn ImageCodec,
    writer: &dyn DocumentWriter,
) -> Result<Vec<u8>, ConvertError> {
    let decoded = decode(bytes, category, codec)?;
    writer.single_image_page(&decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_composite_replaces_transparency() {
        let mut source = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        source.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        let composited = composite_over_white(&DynamicImage::ImageRgba8(source)).to_rgba8();

        // Opaque pixel survives, transparent pixels become white.
        assert_eq!(composited.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
        assert_eq!(composited.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn half_transparent_pixels_blend_toward_white() {
        let source = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let composited = composite_over_white(&DynamicImage::ImageRgba8(source)).to_rgba8();
        let px = composited.get_pixel(0, 0);
        assert!(px[0] > 100 && px[0] < 155, "expected mid-grey, got {px:?}");
        assert_eq!(px[3], 255);
    }
}
