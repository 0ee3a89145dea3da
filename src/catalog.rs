//! The format catalog: which targets are legal for each [`Category`].
//!
//! The catalog is immutable static data. Descriptor order is presentation
//! order (the first entry is the default target a caller should preselect)
//! and is otherwise meaning-free. Labels are unique within a category; the
//! label is what a UI shows and what [`crate::convert`] validates against.
//!
//! Every target the catalog lists is legal, including same-format
//! re-encodes: a PNG→PNG pass recompresses the image and drops embedded
//! metadata, so no self-conversion suppression is applied anywhere.

use crate::category::Category;
use crate::codec::RasterFormat;
use serde::Serialize;

/// UI hints for a conversion target: which extra controls apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModifierFlags {
    /// The routine honours the quality fraction (lossy raster targets).
    pub needs_quality: bool,
    /// The routine honours caller-supplied width/height.
    pub needs_dimensions: bool,
    /// The routine's purpose is metadata removal.
    pub privacy_strip: bool,
    /// The output is a content fingerprint, not a converted document.
    pub digest: bool,
}

impl ModifierFlags {
    pub const NONE: ModifierFlags = ModifierFlags::new(false, false, false, false);
    pub const QUALITY: ModifierFlags = ModifierFlags::new(true, false, false, false);
    pub const DIMENSIONS: ModifierFlags = ModifierFlags::new(false, true, false, false);
    pub const PRIVACY: ModifierFlags = ModifierFlags::new(false, false, true, false);
    pub const DIGEST: ModifierFlags = ModifierFlags::new(false, false, false, true);

    const fn new(
        needs_quality: bool,
        needs_dimensions: bool,
        privacy_strip: bool,
        digest: bool,
    ) -> Self {
        Self {
            needs_quality,
            needs_dimensions,
            privacy_strip,
            digest,
        }
    }
}

/// The transformation a descriptor dispatches to.
///
/// Each catalog entry carries its routine tag explicitly, so the router's
/// dispatch is an exhaustive `match` instead of label string comparisons,
/// and a test can verify that every tag accepts the category it is listed
/// under (see [`Routine::supports`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routine {
    /// Decode to a pixel surface and re-encode in the given raster format.
    RasterEncode(RasterFormat),
    /// Re-encode as PNG at caller-supplied dimensions.
    RasterResize,
    /// Re-rasterise to a clean PNG, dropping embedded metadata.
    PrivacyStrip,
    /// Wrap the raster as a single PDF page sized to its pixel dimensions.
    RasterToDocument,
    /// SHA-256 content fingerprint report.
    Digest,
    /// First worksheet to a JSON array of row objects.
    SheetToJson,
    /// First worksheet to CSV.
    SheetToCsv,
    /// JSON array of objects to CSV.
    JsonToCsv,
    /// JSON array of objects to an XLSX workbook.
    JsonToSheet,
    /// Re-serialise JSON without whitespace.
    JsonMinify,
    /// Re-serialise JSON with 2-space indentation.
    JsonBeautify,
    /// CSV to a JSON array of row objects.
    CsvToJson,
    /// CSV to an XLSX workbook.
    CsvToSheet,
    /// CSV to a GFM pipe table.
    CsvToMarkdown,
    /// Markdown to a standalone HTML document.
    MarkdownToHtml,
    /// Base64 of the raw input bytes.
    TextBase64,
    /// Percent-encoding of the text content.
    TextUrlEncode,
    /// Text content rendered as a 512×512 QR bitmap.
    TextQr,
    /// Body text of an HTML document, markup discarded.
    HtmlExtractText,
}

impl Routine {
    /// Whether this routine can run on input of the given category.
    ///
    /// Checked by tests against every catalog entry; the catalog must never
    /// list a descriptor whose routine rejects its own category.
    pub fn supports(&self, category: Category) -> bool {
        use Category::*;
        match self {
            Routine::RasterEncode(_) => matches!(category, Image | Vector),
            Routine::RasterResize
            | Routine::PrivacyStrip
            | Routine::RasterToDocument => category == Image,
            // A digest reads raw bytes; any category qualifies.
            Routine::Digest => true,
            Routine::SheetToJson | Routine::SheetToCsv => category == Spreadsheet,
            Routine::JsonToCsv
            | Routine::JsonToSheet
            | Routine::JsonMinify
            | Routine::JsonBeautify => category == Json,
            Routine::CsvToJson | Routine::CsvToSheet | Routine::CsvToMarkdown => category == Csv,
            Routine::MarkdownToHtml => category == Markdown,
            Routine::TextBase64 | Routine::TextUrlEncode | Routine::TextQr => category == Text,
            Routine::HtmlExtractText => category == Html,
        }
    }
}

/// One legal conversion target.
///
/// Descriptors are `'static` constants; the catalog never changes at
/// runtime. `media_type` and `extension` are the compatibility-sensitive
/// surface: downstream tools open outputs by these.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormatDescriptor {
    /// Display label, unique within a category.
    pub label: &'static str,
    /// Media type of the produced output.
    pub media_type: &'static str,
    /// Output extension, appended verbatim to the input's stem. May be
    /// compound (`_resized.png`, `.min.json`).
    pub extension: &'static str,
    /// UI control hints.
    pub flags: ModifierFlags,
    /// Dispatch tag. Not part of the serialised surface.
    #[serde(skip)]
    pub routine: Routine,
}

const fn desc(
    label: &'static str,
    media_type: &'static str,
    extension: &'static str,
    flags: ModifierFlags,
    routine: Routine,
) -> FormatDescriptor {
    FormatDescriptor {
        label,
        media_type,
        extension,
        flags,
        routine,
    }
}

/// Media type of an XLSX workbook.
pub const XLSX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHA256_REPORT: FormatDescriptor = desc(
    "Security (SHA-256)",
    "text/plain",
    ".sha256.txt",
    ModifierFlags::DIGEST,
    Routine::Digest,
);

const IMAGE_TARGETS: &[FormatDescriptor] = &[
    desc("PNG", "image/png", ".png", ModifierFlags::NONE, Routine::RasterEncode(RasterFormat::Png)),
    desc("JPEG", "image/jpeg", ".jpg", ModifierFlags::QUALITY, Routine::RasterEncode(RasterFormat::Jpeg)),
    desc("WEBP", "image/webp", ".webp", ModifierFlags::QUALITY, Routine::RasterEncode(RasterFormat::Webp)),
    desc("Resize & Scale", "image/png", "_resized.png", ModifierFlags::DIMENSIONS, Routine::RasterResize),
    desc("PDF", "application/pdf", ".pdf", ModifierFlags::NONE, Routine::RasterToDocument),
    desc("Privacy (Strip EXIF)", "image/png", "_private.png", ModifierFlags::PRIVACY, Routine::PrivacyStrip),
    SHA256_REPORT,
];

const VECTOR_TARGETS: &[FormatDescriptor] = &[
    desc("PNG", "image/png", ".png", ModifierFlags::NONE, Routine::RasterEncode(RasterFormat::Png)),
    desc("JPEG", "image/jpeg", ".jpg", ModifierFlags::QUALITY, Routine::RasterEncode(RasterFormat::Jpeg)),
    desc("WEBP", "image/webp", ".webp", ModifierFlags::QUALITY, Routine::RasterEncode(RasterFormat::Webp)),
];

const SPREADSHEET_TARGETS: &[FormatDescriptor] = &[
    desc("JSON", "application/json", ".json", ModifierFlags::NONE, Routine::SheetToJson),
    desc("CSV", "text/csv", ".csv", ModifierFlags::NONE, Routine::SheetToCsv),
];

const JSON_TARGETS: &[FormatDescriptor] = &[
    desc("CSV", "text/csv", ".csv", ModifierFlags::NONE, Routine::JsonToCsv),
    desc("Excel (XLSX)", XLSX_MEDIA_TYPE, ".xlsx", ModifierFlags::NONE, Routine::JsonToSheet),
    desc("Minify", "application/json", ".min.json", ModifierFlags::NONE, Routine::JsonMinify),
    desc("Beautify", "application/json", ".formatted.json", ModifierFlags::NONE, Routine::JsonBeautify),
];

const CSV_TARGETS: &[FormatDescriptor] = &[
    desc("JSON", "application/json", ".json", ModifierFlags::NONE, Routine::CsvToJson),
    desc("Excel (XLSX)", XLSX_MEDIA_TYPE, ".xlsx", ModifierFlags::NONE, Routine::CsvToSheet),
    desc("Markdown Table", "text/markdown", ".md", ModifierFlags::NONE, Routine::CsvToMarkdown),
];

const MARKDOWN_TARGETS: &[FormatDescriptor] = &[
    desc("HTML", "text/html", ".html", ModifierFlags::NONE, Routine::MarkdownToHtml),
];

const TEXT_TARGETS: &[FormatDescriptor] = &[
    desc("Base64 Encode", "text/plain", ".b64.txt", ModifierFlags::NONE, Routine::TextBase64),
    desc("URL Encode", "text/plain", ".url.txt", ModifierFlags::NONE, Routine::TextUrlEncode),
    desc("Generate QR Code", "image/png", "_qr.png", ModifierFlags::NONE, Routine::TextQr),
    SHA256_REPORT,
];

const HTML_TARGETS: &[FormatDescriptor] = &[
    desc("Extract Text", "text/plain", ".txt", ModifierFlags::NONE, Routine::HtmlExtractText),
];

// Even an unidentified file can be fingerprinted.
const GENERIC_TARGETS: &[FormatDescriptor] = &[SHA256_REPORT];

/// Legal conversion targets for a category, in presentation order.
///
/// Never empty: `generic` still offers the digest target.
pub fn list_targets(category: Category) -> &'static [FormatDescriptor] {
    match category {
        Category::Image => IMAGE_TARGETS,
        Category::Vector => VECTOR_TARGETS,
        Category::Spreadsheet => SPREADSHEET_TARGETS,
        Category::Json => JSON_TARGETS,
        Category::Csv => CSV_TARGETS,
        Category::Markdown => MARKDOWN_TARGETS,
        Category::Text => TEXT_TARGETS,
        Category::Html => HTML_TARGETS,
        Category::Generic => GENERIC_TARGETS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_category_offers_at_least_one_target() {
        for category in Category::ALL {
            assert!(
                !list_targets(category).is_empty(),
                "{category} has no targets"
            );
        }
    }

    #[test]
    fn labels_are_unique_within_a_category() {
        for category in Category::ALL {
            let mut seen = HashSet::new();
            for d in list_targets(category) {
                assert!(
                    seen.insert(d.label),
                    "{category} lists '{}' twice",
                    d.label
                );
            }
        }
    }

    #[test]
    fn every_listed_routine_supports_its_category() {
        for category in Category::ALL {
            for d in list_targets(category) {
                assert!(
                    d.routine.supports(category),
                    "{category}/'{}' routine rejects its own category",
                    d.label
                );
            }
        }
    }

    #[test]
    fn quality_flag_marks_exactly_the_lossy_raster_targets() {
        for category in [Category::Image, Category::Vector] {
            for d in list_targets(category) {
                let lossy = matches!(
                    d.routine,
                    Routine::RasterEncode(RasterFormat::Jpeg)
                        | Routine::RasterEncode(RasterFormat::Webp)
                );
                assert_eq!(d.flags.needs_quality, lossy, "{category}/'{}'", d.label);
            }
        }
    }

    #[test]
    fn generic_offers_the_digest() {
        let targets = list_targets(Category::Generic);
        assert_eq!(targets.len(), 1);
        assert!(targets[0].flags.digest);
        assert_eq!(targets[0].extension, ".sha256.txt");
    }
}
