//! The default pixel-surface codec: `image` for raster formats, `resvg`
//! for SVG rasterisation.
//!
//! One asymmetry worth knowing: `image`'s WEBP encoder is lossless-only,
//! so the quality fraction shapes JPEG output and is ignored for WEBP.

use super::{ImageCodec, RasterFormat};
use crate::error::ConvertError;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};
use std::io::Cursor;
use tracing::debug;

/// Crate-backed [`ImageCodec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelSurfaceCodec;

impl ImageCodec for PixelSurfaceCodec {
    fn decode_raster(&self, bytes: &[u8]) -> Result<DynamicImage, ConvertError> {
        image::load_from_memory(bytes).map_err(|e| ConvertError::DecodeFailure {
            what: "image",
            detail: e.to_string(),
        })
    }

    fn decode_vector(&self, bytes: &[u8]) -> Result<DynamicImage, ConvertError> {
        let tree = usvg::Tree::from_data(bytes, &usvg::Options::default()).map_err(|e| {
            ConvertError::DecodeFailure {
                what: "svg",
                detail: e.to_string(),
            }
        })?;

        let size = tree.size().to_int_size();
        let (width, height) = (size.width().max(1), size.height().max(1));
        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or_else(|| ConvertError::DecodeFailure {
                what: "svg",
                detail: format!("cannot allocate a {width}x{height} canvas"),
            })?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
        debug!("Rasterised SVG at {}x{}", width, height);

        // tiny-skia stores premultiplied alpha; straighten it for the
        // image-crate surface.
        let mut surface = RgbaImage::new(width, height);
        for (dst, src) in surface.pixels_mut().zip(pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(DynamicImage::ImageRgba8(surface))
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: RasterFormat,
        quality: f32,
    ) -> Result<Vec<u8>, ConvertError> {
        let mut buf = Vec::new();
        match format {
            RasterFormat::Png => {
                image
                    .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                    .map_err(|e| encode_failure("png", e))?;
            }
            RasterFormat::Jpeg => {
                // JPEG has no alpha channel; the caller composites first,
                // the RGB conversion here just drops the (opaque) channel.
                let rgb = image.to_rgb8();
                let q = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
                let mut cursor = Cursor::new(&mut buf);
                let encoder = JpegEncoder::new_with_quality(&mut cursor, q);
                DynamicImage::ImageRgb8(rgb)
                    .write_with_encoder(encoder)
                    .map_err(|e| encode_failure("jpeg", e))?;
            }
            RasterFormat::Webp => {
                let mut cursor = Cursor::new(&mut buf);
                let encoder = WebPEncoder::new_lossless(&mut cursor);
                DynamicImage::ImageRgba8(image.to_rgba8())
                    .write_with_encoder(encoder)
                    .map_err(|e| encode_failure("webp", e))?;
            }
        }
        debug!("Encoded {} bytes as {}", buf.len(), format.media_type());
        Ok(buf)
    }
}

fn encode_failure(what: &'static str, e: image::ImageError) -> ConvertError {
    ConvertError::EncodeFailure {
        what,
        detail: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([200, 10, 10, 255])))
    }

    #[test]
    fn png_round_trips_through_the_codec() {
        let codec = PixelSurfaceCodec;
        let png = codec.encode(&sample(), RasterFormat::Png, 1.0).unwrap();
        let back = codec.decode_raster(&png).unwrap();
        assert_eq!((back.width(), back.height()), (4, 4));
    }

    #[test]
    fn jpeg_and_webp_encode() {
        let codec = PixelSurfaceCodec;
        let jpeg = codec.encode(&sample(), RasterFormat::Jpeg, 0.8).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "JPEG magic");
        let webp = codec.encode(&sample(), RasterFormat::Webp, 0.8).unwrap();
        assert_eq!(&webp[..4], b"RIFF", "WEBP container magic");
    }

    #[test]
    fn garbage_is_a_decode_failure() {
        let err = PixelSurfaceCodec.decode_raster(b"not an image").unwrap_err();
        assert!(matches!(err, ConvertError::DecodeFailure { what: "image", .. }));
    }

    #[test]
    fn svg_rasterises_at_natural_size() {
        let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
            <rect width="20" height="10" fill="#ff0000"/></svg>"##;
        let image = PixelSurfaceCodec.decode_vector(svg).unwrap();
        assert_eq!((image.width(), image.height()), (20, 10));
        let px = image.to_rgba8().get_pixel(5, 5).0;
        assert_eq!(px, [255, 0, 0, 255]);
    }

    #[test]
    fn invalid_svg_is_a_decode_failure() {
        let err = PixelSurfaceCodec.decode_vector(b"<svg").unwrap_err();
        assert!(matches!(err, ConvertError::DecodeFailure { what: "svg", .. }));
    }
}
