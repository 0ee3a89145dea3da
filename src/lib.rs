//! # fileflex
//!
//! The format-detection and conversion dispatch core of a client-side file
//! converter: classify an input file, enumerate its legal target formats,
//! convert it, and optionally archive a whole queue into a ZIP.
//!
//! The crate is the decision engine only. File pickers, progress bars, and
//! download triggers belong to the calling layer (the bundled `fileflex`
//! CLI is one such caller); the core reads input bytes and produces output
//! bytes, nothing more. No state survives a call.
//!
//! ## Pipeline Overview
//!
//! ```text
//! file
//!  │
//!  ├─ 1. Classify  name + declared media type → Category
//!  ├─ 2. Catalog   Category → legal FormatDescriptors (UI renders choices)
//!  ├─ 3. Route     (Category, descriptor) validated, routine dispatched
//!  ├─ 4. Convert   decode → transform → encode via injected codecs
//!  └─ 5. Name      input stem + descriptor extension → output blob
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fileflex::{convert, list_targets, ConversionOptions, InputFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let file = InputFile::from_path("notes.md").await?;
//!     let category = file.category();
//!     let target = &list_targets(category)[0]; // "HTML"
//!     let output = convert(&file, category, target, &ConversionOptions::default()).await?;
//!     println!("{} ({} bytes)", output.file_name, output.bytes.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `fileflex` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! fileflex = { version = "0.4", default-features = false }
//! ```
//!
//! ## Failure model
//!
//! Everything fails at single-file granularity with a [`ConvertError`]
//! naming the stage (decode, encode, capacity, options, timeout). Batches
//! record per-item outcomes and never abort on a member's failure.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod catalog;
pub mod category;
pub mod codec;
pub mod convert;
pub mod error;
pub mod input;
pub mod naming;
pub mod options;
pub mod progress;
pub mod routines;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{
    archive, run_batch, run_batch_to_archive, BatchItem, BatchOutcome, BatchReport,
    DEFAULT_ARCHIVE_NAME,
};
pub use catalog::{list_targets, FormatDescriptor, ModifierFlags, Routine};
pub use category::{classify, Category};
pub use codec::{
    CodecSet, DocumentWriter, ImageCodec, QrEncoder, RasterFormat, WorkbookCodec,
};
pub use convert::{convert, convert_blocking, convert_with_codecs, Conversion};
pub use error::ConvertError;
pub use input::{human_size, InputFile};
pub use naming::output_name;
pub use options::ConversionOptions;
pub use progress::{BatchProgress, NoopBatchProgress};
