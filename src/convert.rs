//! The conversion router: validate, dispatch, name the output.
//!
//! [`convert`] is the primary entry point. It checks the options and the
//! (category, descriptor) pairing, runs the routine the descriptor's tag
//! names on a blocking worker thread under a per-file timeout, and wraps
//! the produced bytes into a named [`Conversion`].
//!
//! Dispatch is a `match` over [`Routine`], so the compiler proves every
//! tag is handled; the catalog tests prove every listed descriptor's tag
//! accepts its category. Together the two checks make "descriptor without
//! a routine" impossible rather than a runtime fallback.
//!
//! The router holds no state. Every call is a pure function of its
//! arguments (plus the injected codecs), which is what keeps conversions
//! of sibling files independent: a failure here never outlives its return
//! value.

use crate::catalog::{list_targets, FormatDescriptor, Routine};
use crate::category::Category;
use crate::codec::CodecSet;
use crate::error::ConvertError;
use crate::input::InputFile;
use crate::naming::output_name;
use crate::options::ConversionOptions;
use crate::routines::{digest, html, jsonfmt, markdown, raster, tabular, text};
use std::time::Duration;
use tracing::{debug, info};

/// A successfully converted output blob.
///
/// The caller owns it and decides what to do next (download, archive
/// entry, stdout). The core performs no I/O of its own.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Output content.
    pub bytes: Vec<u8>,
    /// Media type of the output, from the descriptor.
    pub media_type: &'static str,
    /// Suggested output filename, derived from the input's stem and the
    /// descriptor's extension.
    pub file_name: String,
}

/// Convert one file with the default codec stack.
///
/// See [`convert_with_codecs`] for the full contract.
pub async fn convert(
    input: &InputFile,
    category: Category,
    descriptor: &FormatDescriptor,
    options: &ConversionOptions,
) -> Result<Conversion, ConvertError> {
    convert_with_codecs(input, category, descriptor, options, &CodecSet::default()).await
}

/// Convert one file against an injected codec stack.
///
/// Runs the routine on a blocking worker thread (raster decodes and
/// workbook writes are CPU-bound) and enforces
/// [`ConversionOptions::timeout_secs`]. On timeout the worker thread is
/// abandoned and [`ConvertError::Timeout`] is returned; queued siblings
/// are unaffected.
///
/// # Errors
/// - [`ConvertError::InvalidOptions`] before any work happens
/// - [`ConvertError::UnsupportedCombination`] when the descriptor is not
///   in the catalog for `category`
/// - the routine's own decode/encode/capacity failures otherwise
pub async fn convert_with_codecs(
    input: &InputFile,
    category: Category,
    descriptor: &FormatDescriptor,
    options: &ConversionOptions,
    codecs: &CodecSet,
) -> Result<Conversion, ConvertError> {
    options.validate()?;
    ensure_listed(category, descriptor)?;
    info!(
        "Converting '{}' ({}) -> {}",
        input.name(),
        category,
        descriptor.label
    );

    let bytes = input.bytes().to_vec();
    let name = input.name().to_string();
    let descriptor = *descriptor;
    let options = options.clone();
    let codecs = codecs.clone();
    let secs = options.timeout_secs;

    let task = tokio::task::spawn_blocking(move || {
        run_routine(&bytes, &name, category, &descriptor, &options, &codecs)
    });
    match tokio::time::timeout(Duration::from_secs(secs), task).await {
        Err(_elapsed) => Err(ConvertError::Timeout { secs }),
        Ok(Err(join)) => Err(ConvertError::Internal(format!(
            "conversion task panicked: {join}"
        ))),
        Ok(Ok(result)) => result,
    }
}

/// Synchronous conversion, for callers without a runtime.
///
/// Identical semantics to [`convert_with_codecs`] minus the worker thread
/// and the timeout.
pub fn convert_blocking(
    input: &InputFile,
    category: Category,
    descriptor: &FormatDescriptor,
    options: &ConversionOptions,
    codecs: &CodecSet,
) -> Result<Conversion, ConvertError> {
    options.validate()?;
    ensure_listed(category, descriptor)?;
    run_routine(
        input.bytes(),
        input.name(),
        category,
        descriptor,
        options,
        codecs,
    )
}

/// The catalog is the single source of truth for legal pairings; labels
/// are the per-category identity.
fn ensure_listed(category: Category, descriptor: &FormatDescriptor) -> Result<(), ConvertError> {
    if list_targets(category)
        .iter()
        .any(|d| d.label == descriptor.label)
    {
        Ok(())
    } else {
        Err(ConvertError::UnsupportedCombination {
            category,
            label: descriptor.label.to_string(),
        })
    }
}

/// Text-shaped routines read the content the way a browser reads
/// `File.text()`: as UTF-8, lossily.
fn lossy(bytes: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

fn run_routine(
    bytes: &[u8],
    name: &str,
    category: Category,
    descriptor: &FormatDescriptor,
    options: &ConversionOptions,
    codecs: &CodecSet,
) -> Result<Conversion, ConvertError> {
    let quality = options.quality_or_default();

    let out: Vec<u8> = match descriptor.routine {
        Routine::RasterEncode(format) => {
            raster::reencode(bytes, category, format, quality, codecs.image.as_ref())?
        }
        Routine::RasterResize => raster::resize(
            bytes,
            category,
            options.width,
            options.height,
            codecs.image.as_ref(),
        )?,
        Routine::PrivacyStrip => raster::privacy_strip(bytes, codecs.image.as_ref())?,
        Routine::RasterToDocument => raster::to_document(
            bytes,
            category,
            codecs.image.as_ref(),
            codecs.document.as_ref(),
        )?,
        Routine::Digest => digest::digest_report(name, bytes),
        Routine::SheetToJson => tabular::sheet_to_json(bytes, codecs.workbook.as_ref())?,
        Routine::SheetToCsv => tabular::sheet_to_csv(bytes, codecs.workbook.as_ref())?,
        Routine::JsonToCsv => tabular::json_to_csv(bytes)?,
        Routine::JsonToSheet => tabular::json_to_workbook(bytes, codecs.workbook.as_ref())?,
        Routine::JsonMinify => jsonfmt::minify(bytes)?,
        Routine::JsonBeautify => jsonfmt::beautify(bytes)?,
        Routine::CsvToJson => tabular::csv_to_json(&lossy(bytes))?,
        Routine::CsvToSheet => tabular::csv_to_workbook(&lossy(bytes), codecs.workbook.as_ref())?,
        Routine::CsvToMarkdown => tabular::csv_to_markdown(&lossy(bytes))?,
        Routine::MarkdownToHtml => markdown::to_html_document(&lossy(bytes)),
        Routine::TextBase64 => text::base64_encode(bytes),
        Routine::TextUrlEncode => text::url_encode(&lossy(bytes)),
        Routine::TextQr => text::qr_png(&lossy(bytes), codecs.qr.as_ref())?,
        Routine::HtmlExtractText => html::extract_text(&lossy(bytes))?,
    };

    let file_name = output_name(name, descriptor);
    debug!("Produced '{}' ({} bytes)", file_name, out.len());
    Ok(Conversion {
        bytes: out,
        media_type: descriptor.media_type,
        file_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::list_targets;

    fn target(category: Category, label: &str) -> &'static FormatDescriptor {
        list_targets(category)
            .iter()
            .find(|d| d.label == label)
            .expect("label present in catalog")
    }

    #[tokio::test]
    async fn mismatched_descriptor_is_rejected_before_any_work() {
        let input = InputFile::new("notes.txt", "text/plain", b"hello".to_vec());
        // An image descriptor against text input.
        let png = target(Category::Image, "PNG");
        let err = convert(&input, Category::Text, png, &ConversionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnsupportedCombination { category: Category::Text, .. }
        ));
    }

    #[tokio::test]
    async fn invalid_options_are_rejected_before_dispatch() {
        let input = InputFile::new("notes.txt", "text/plain", b"hello".to_vec());
        let b64 = target(Category::Text, "Base64 Encode");
        let options = ConversionOptions::default().with_quality(2.0);
        let err = convert(&input, Category::Text, b64, &options)
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidOptions(_)));
    }

    #[tokio::test]
    async fn digest_works_for_generic_input() {
        let input = InputFile::new("blob", "", vec![1, 2, 3]);
        let sha = target(Category::Generic, "Security (SHA-256)");
        let conversion = convert(&input, Category::Generic, sha, &ConversionOptions::default())
            .await
            .unwrap();
        assert_eq!(conversion.media_type, "text/plain");
        assert_eq!(conversion.file_name, "blob.sha256.txt");
        assert!(String::from_utf8(conversion.bytes)
            .unwrap()
            .starts_with("File: blob\n"));
    }

    #[test]
    fn blocking_path_matches_async_semantics() {
        let input = InputFile::new("a.txt", "text/plain", b"hi".to_vec());
        let b64 = target(Category::Text, "Base64 Encode");
        let conversion = convert_blocking(
            &input,
            Category::Text,
            b64,
            &ConversionOptions::default(),
            &CodecSet::default(),
        )
        .unwrap();
        assert_eq!(conversion.bytes, b"aGk=");
        assert_eq!(conversion.file_name, "a.b64.txt");
    }
}
