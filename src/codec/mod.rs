//! Capability backends for the conversion routines.
//!
//! The routines describe *what* a conversion does; the encoders and
//! decoders that do the heavy lifting live behind the traits here, injected
//! as trait objects via [`CodecSet`]. The default set wires real
//! implementations (the `image`/`resvg`/`printpdf`/`calamine`/`qrcode`
//! stack); tests swap in fakes to exercise failure paths without a real
//! backend, the same way a pre-built provider can be injected in place of
//! an environment-configured one.
//!
//! Every trait is `Send + Sync` because conversions run on blocking worker
//! threads.

pub mod document;
pub mod qr;
pub mod raster;
pub mod workbook;

pub use document::PdfPageWriter;
pub use qr::MatrixQrEncoder;
pub use raster::PixelSurfaceCodec;
pub use workbook::XlsxWorkbookCodec;

use crate::error::ConvertError;
use crate::routines::tabular::Table;
use image::DynamicImage;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Raster output formats the image codec can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    Png,
    Jpeg,
    Webp,
}

impl RasterFormat {
    pub fn media_type(&self) -> &'static str {
        match self {
            RasterFormat::Png => "image/png",
            RasterFormat::Jpeg => "image/jpeg",
            RasterFormat::Webp => "image/webp",
        }
    }

    /// Whether the format can carry an alpha channel. Opaque formats get a
    /// white composite before encoding.
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, RasterFormat::Jpeg)
    }
}

/// Pixel-surface decode and encode.
pub trait ImageCodec: Send + Sync {
    /// Decode raster bytes (PNG, JPEG, WEBP, GIF, ...) into a surface.
    fn decode_raster(&self, bytes: &[u8]) -> Result<DynamicImage, ConvertError>;

    /// Rasterise an SVG at its natural size.
    fn decode_vector(&self, bytes: &[u8]) -> Result<DynamicImage, ConvertError>;

    /// Encode a surface. `quality` is a fraction in `[0, 1]`, honoured by
    /// lossy formats only.
    fn encode(
        &self,
        image: &DynamicImage,
        format: RasterFormat,
        quality: f32,
    ) -> Result<Vec<u8>, ConvertError>;
}

/// Single-page document output.
pub trait DocumentWriter: Send + Sync {
    /// Produce a one-page PDF sized to the image's pixel dimensions, with
    /// the image as the page content.
    fn single_image_page(&self, image: &DynamicImage) -> Result<Vec<u8>, ConvertError>;
}

/// Workbook read/write.
pub trait WorkbookCodec: Send + Sync {
    /// Parse the first worksheet into a [`Table`]. The first row is the
    /// header. An unreadable or sheetless workbook is a decode failure.
    fn read_first_sheet(&self, bytes: &[u8]) -> Result<Table, ConvertError>;

    /// Serialise a [`Table`] as a single-sheet workbook.
    fn write_workbook(&self, table: &Table) -> Result<Vec<u8>, ConvertError>;
}

/// QR symbol generation.
pub trait QrEncoder: Send + Sync {
    /// Encode text as a square QR bitmap (PNG bytes) at high error
    /// correction. Payloads beyond symbol capacity must fail, not truncate.
    fn encode_png(&self, text: &str, side_px: u32) -> Result<Vec<u8>, ConvertError>;
}

/// The bundle of backends a conversion runs against.
///
/// Cloning is cheap (shared `Arc`s). `CodecSet::default()` returns the real
/// stack; replace any field to inject a fake.
#[derive(Clone)]
pub struct CodecSet {
    pub image: Arc<dyn ImageCodec>,
    pub document: Arc<dyn DocumentWriter>,
    pub workbook: Arc<dyn WorkbookCodec>,
    pub qr: Arc<dyn QrEncoder>,
}

impl Default for CodecSet {
    fn default() -> Self {
        Self {
            image: Arc::new(PixelSurfaceCodec),
            document: Arc::new(PdfPageWriter),
            workbook: Arc::new(XlsxWorkbookCodec),
            qr: Arc::new(MatrixQrEncoder),
        }
    }
}

impl fmt::Debug for CodecSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecSet")
            .field("image", &"<dyn ImageCodec>")
            .field("document", &"<dyn DocumentWriter>")
            .field("workbook", &"<dyn WorkbookCodec>")
            .field("qr", &"<dyn QrEncoder>")
            .finish()
    }
}
