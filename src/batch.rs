//! Batch orchestration: run the single-file contract over a queue and
//! archive the successes.
//!
//! Items are processed **sequentially, in queue order**. That is a
//! determinism guarantee, not a throughput choice: archive entries must
//! land in the same order on every run. One item's failure is recorded and
//! the queue moves on; batch completion is reported only after every item
//! has resolved.

use crate::catalog::FormatDescriptor;
use crate::codec::CodecSet;
use crate::convert::{convert_with_codecs, Conversion};
use crate::error::ConvertError;
use crate::input::InputFile;
use crate::options::ConversionOptions;
use crate::progress::BatchProgress;
use std::io::{Cursor, Write};
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Default filename for a batch archive.
pub const DEFAULT_ARCHIVE_NAME: &str = "FileFlex_Batch.zip";

/// One queued conversion: a file, its chosen target, and options.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub input: InputFile,
    pub target: &'static FormatDescriptor,
    pub options: ConversionOptions,
}

impl BatchItem {
    /// Queue a file for conversion with default options.
    pub fn new(input: InputFile, target: &'static FormatDescriptor) -> Self {
        Self {
            input,
            target,
            options: ConversionOptions::default(),
        }
    }
}

/// The resolution of one queued item.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Name of the source file, for reporting.
    pub source_name: String,
    /// The conversion, or why it failed.
    pub result: Result<Conversion, ConvertError>,
}

/// Every item's outcome, in queue order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Successful conversions, in queue order.
    pub fn conversions(&self) -> impl Iterator<Item = &Conversion> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }
}

/// Convert every queued item, sequentially, and report all outcomes.
///
/// Never short-circuits: a failed item is recorded and the next begins.
pub async fn run_batch(
    items: Vec<BatchItem>,
    codecs: &CodecSet,
    progress: &dyn BatchProgress,
) -> BatchReport {
    let total = items.len();
    info!("Batch start: {} item(s)", total);
    progress.on_batch_start(total);

    let mut outcomes = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        let category = item.input.category();
        progress.on_item_start(index, total, item.input.name());

        let result =
            convert_with_codecs(&item.input, category, item.target, &item.options, codecs).await;
        match &result {
            Ok(conversion) => {
                progress.on_item_complete(
                    index,
                    total,
                    &conversion.file_name,
                    conversion.bytes.len(),
                );
            }
            Err(e) => {
                warn!("Item {} ('{}') failed: {}", index, item.input.name(), e);
                progress.on_item_error(index, total, item.input.name(), e.label());
            }
        }
        outcomes.push(BatchOutcome {
            source_name: item.input.name().to_string(),
            result,
        });
    }

    let report = BatchReport { outcomes };
    info!(
        "Batch complete: {}/{} succeeded",
        report.succeeded(),
        total
    );
    progress.on_batch_complete(total, report.succeeded());
    report
}

/// Zip the report's successful conversions, in queue order.
///
/// Failed items contribute nothing; entry order equals queue order of the
/// successes.
pub fn archive(report: &BatchReport) -> Result<Vec<u8>, ConvertError> {
    let mut buffer = Vec::new();
    let mut writer = ZipWriter::new(Cursor::new(&mut buffer));
    let entry_options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for conversion in report.conversions() {
        writer
            .start_file(conversion.file_name.clone(), entry_options)
            .map_err(zip_failure)?;
        writer.write_all(&conversion.bytes)?;
    }
    writer.finish().map_err(zip_failure)?;
    Ok(buffer)
}

/// Run a batch and archive the successes in one call.
///
/// The report is returned alongside the archive so the caller can show
/// per-item failures next to the download.
pub async fn run_batch_to_archive(
    items: Vec<BatchItem>,
    codecs: &CodecSet,
    progress: &dyn BatchProgress,
) -> Result<(Vec<u8>, BatchReport), ConvertError> {
    let report = run_batch(items, codecs, progress).await;
    let bytes = archive(&report)?;
    Ok((bytes, report))
}

fn zip_failure(e: zip::result::ZipError) -> ConvertError {
    ConvertError::EncodeFailure {
        what: "zip archive",
        detail: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::list_targets;
    use crate::category::Category;
    use crate::progress::NoopBatchProgress;

    fn text_target(label: &str) -> &'static FormatDescriptor {
        list_targets(Category::Text)
            .iter()
            .find(|d| d.label == label)
            .expect("label present")
    }

    #[tokio::test]
    async fn failing_item_does_not_disturb_order_or_siblings() {
        let json_minify = list_targets(Category::Json)
            .iter()
            .find(|d| d.label == "Minify")
            .unwrap();
        let items = vec![
            BatchItem::new(
                InputFile::new("a.txt", "text/plain", b"alpha".to_vec()),
                text_target("Base64 Encode"),
            ),
            // Malformed JSON: this one fails.
            BatchItem::new(
                InputFile::new("b.json", "application/json", b"{broken".to_vec()),
                json_minify,
            ),
            BatchItem::new(
                InputFile::new("c.txt", "text/plain", b"gamma".to_vec()),
                text_target("URL Encode"),
            ),
        ];

        let (zip_bytes, report) =
            run_batch_to_archive(items, &CodecSet::default(), &NoopBatchProgress)
                .await
                .unwrap();

        assert_eq!(report.outcomes.len(), 3, "all items resolved");
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(report.outcomes[1].result.is_err());

        let mut archive = zip::ZipArchive::new(Cursor::new(zip_bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        // Entries in queue order: A then C, with B absent.
        assert_eq!(archive.by_index(0).unwrap().name(), "a.b64.txt");
        assert_eq!(archive.by_index(1).unwrap().name(), "c.url.txt");
    }

    #[tokio::test]
    async fn empty_batch_archives_to_an_empty_zip() {
        let (zip_bytes, report) =
            run_batch_to_archive(Vec::new(), &CodecSet::default(), &NoopBatchProgress)
                .await
                .unwrap();
        assert_eq!(report.outcomes.len(), 0);
        let archive = zip::ZipArchive::new(Cursor::new(zip_bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
