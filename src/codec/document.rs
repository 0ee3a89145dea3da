//! The default document writer: a one-page PDF via `printpdf`.

use super::DocumentWriter;
use crate::error::ConvertError;
use image::DynamicImage;
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px,
};
use tracing::debug;

/// Pixels are mapped to physical page size at this density. 96 dpi matches
/// the CSS reference pixel, so a screenshot prints at its on-screen size.
const PAGE_DPI: f32 = 96.0;

fn px_to_mm(px: u32) -> Mm {
    Mm(px as f32 * 25.4 / PAGE_DPI)
}

/// Crate-backed [`DocumentWriter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfPageWriter;

impl DocumentWriter for PdfPageWriter {
    fn single_image_page(&self, image: &DynamicImage) -> Result<Vec<u8>, ConvertError> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        debug!("Writing {}x{} px image as a PDF page", width, height);

        // Page dimensions equal the image's, so orientation is implied:
        // width > height is a landscape page.
        let (doc, page, layer) =
            PdfDocument::new("FileFlex", px_to_mm(width), px_to_mm(height), "Image");

        let xobject = ImageXObject {
            width: Px(width as usize),
            height: Px(height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: false,
            image_data: rgb.into_raw(),
            image_filter: None,
            clipping_bbox: None,
        };
        Image::from(xobject).add_to_layer(
            doc.get_page(page).get_layer(layer),
            ImageTransform {
                dpi: Some(PAGE_DPI),
                ..Default::default()
            },
        );

        doc.save_to_bytes().map_err(|e| ConvertError::EncodeFailure {
            what: "pdf",
            detail: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn produces_a_pdf_header() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            8,
            4,
            Rgba([0, 128, 255, 255]),
        ));
        let bytes = PdfPageWriter.single_image_page(&image).unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
        assert!(bytes.len() > 100);
    }

    #[test]
    fn px_to_mm_maps_96px_to_one_inch() {
        let Mm(mm) = px_to_mm(96);
        assert!((mm - 25.4).abs() < 0.001);
    }
}
