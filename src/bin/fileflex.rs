//! CLI binary for fileflex.
//!
//! A thin shim over the library crate: it loads files, maps CLI flags to
//! `ConversionOptions`, and writes outputs or a batch archive. All
//! conversion decisions live in the library.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fileflex::{
    classify, convert, list_targets, run_batch_to_archive, BatchItem, BatchProgress, Category,
    CodecSet, ConversionOptions, FormatDescriptor, InputFile, DEFAULT_ARCHIVE_NAME,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI definition ───────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "fileflex", version, about = "Classify files, list conversion targets, convert")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show each file's category and its available conversion targets.
    Inspect {
        /// Files to inspect.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Emit machine-readable JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Convert one file and write the output next to it (or to --output).
    Convert {
        /// File to convert.
        file: PathBuf,
        /// Target label, e.g. "PNG" or "Markdown Table". Defaults to the
        /// category's first listed target.
        #[arg(long = "to")]
        target: Option<String>,
        /// Quality fraction in [0, 1] for lossy raster targets.
        #[arg(long)]
        quality: Option<f32>,
        /// Target width in pixels (resize target only).
        #[arg(long)]
        width: Option<u32>,
        /// Target height in pixels (resize target only).
        #[arg(long)]
        height: Option<u32>,
        /// Per-file timeout in seconds.
        #[arg(long, default_value_t = ConversionOptions::DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
        /// Output path. Defaults to the suggested name in the current directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert many files and bundle the successes into a ZIP archive.
    Batch {
        /// Files to convert, archived in this order.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Target label applied to every file it is legal for. Files whose
        /// category does not offer it are reported as failed. Defaults to
        /// each category's first listed target.
        #[arg(long = "to")]
        target: Option<String>,
        /// Archive output path.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// ── indicatif-backed batch progress ──────────────────────────────────────────

struct CliBatchProgress {
    bar: ProgressBar,
}

impl CliBatchProgress {
    fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl BatchProgress for CliBatchProgress {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} [{bar:40.green/238}] {pos}/{len} files  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
    }

    fn on_item_start(&self, _index: usize, _total: usize, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn on_item_complete(&self, _index: usize, _total: usize, output_name: &str, output_bytes: usize) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            output_name,
            dim(&fileflex::human_size(output_bytes as u64)),
        ));
        self.bar.inc(1);
    }

    fn on_item_error(&self, _index: usize, _total: usize, name: &str, error: &str) {
        self.bar
            .println(format!("  {} {}  {}", red("✗"), name, dim(error)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, _total: usize, _succeeded: usize) {
        self.bar.finish_and_clear();
    }
}

// ── Target resolution ────────────────────────────────────────────────────────

/// Pick the descriptor for a file: the requested label if known, else the
/// category's first target. A label that exists only in *other* categories
/// is still returned, so the library reports the mismatch as an
/// UnsupportedCombination instead of the CLI inventing its own error.
fn resolve_target(
    category: Category,
    requested: Option<&str>,
) -> Result<&'static FormatDescriptor> {
    let targets = list_targets(category);
    let Some(label) = requested else {
        return Ok(&targets[0]);
    };
    if let Some(d) = targets
        .iter()
        .find(|d| d.label.eq_ignore_ascii_case(label))
    {
        return Ok(d);
    }
    for other in Category::ALL {
        if let Some(d) = list_targets(other)
            .iter()
            .find(|d| d.label.eq_ignore_ascii_case(label))
        {
            return Ok(d);
        }
    }
    bail!("unknown target label '{label}'");
}

// ── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Inspect { files, json } => inspect(files, json).await,
        Command::Convert {
            file,
            target,
            quality,
            width,
            height,
            timeout,
            output,
        } => convert_one(file, target, quality, width, height, timeout, output).await,
        Command::Batch {
            files,
            target,
            output,
        } => batch(files, target, output).await,
    }
}

async fn inspect(files: Vec<PathBuf>, json: bool) -> Result<()> {
    let mut entries = Vec::new();
    for path in files {
        let file = InputFile::from_path(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let category = classify(file.name(), file.declared_media_type());
        entries.push((file, category));
    }

    if json {
        let value: Vec<_> = entries
            .iter()
            .map(|(file, category)| {
                serde_json::json!({
                    "name": file.name(),
                    "size_bytes": file.size_bytes(),
                    "category": category,
                    "targets": list_targets(*category),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for (file, category) in entries {
        println!(
            "{}  {}  {}",
            bold(file.name()),
            dim(&fileflex::human_size(file.size_bytes())),
            category
        );
        for d in list_targets(category) {
            let mut notes = Vec::new();
            if d.flags.needs_quality {
                notes.push("quality");
            }
            if d.flags.needs_dimensions {
                notes.push("dimensions");
            }
            let notes = if notes.is_empty() {
                String::new()
            } else {
                dim(&format!("  ({})", notes.join(", ")))
            };
            println!("    {} {} {}{}", d.label, dim("→"), dim(d.extension), notes);
        }
    }
    Ok(())
}

async fn convert_one(
    path: PathBuf,
    target: Option<String>,
    quality: Option<f32>,
    width: Option<u32>,
    height: Option<u32>,
    timeout: u64,
    output: Option<PathBuf>,
) -> Result<()> {
    let file = InputFile::from_path(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let category = file.category();
    let descriptor = resolve_target(category, target.as_deref())?;

    let mut options = ConversionOptions::default()
        .with_dimensions(width, height)
        .with_timeout_secs(timeout);
    if let Some(q) = quality {
        options = options.with_quality(q);
    }

    let conversion = convert(&file, category, descriptor, &options)
        .await
        .with_context(|| format!("converting {} to {}", path.display(), descriptor.label))?;

    let out_path = output.unwrap_or_else(|| PathBuf::from(&conversion.file_name));
    tokio::fs::write(&out_path, &conversion.bytes)
        .await
        .with_context(|| format!("writing {}", out_path.display()))?;

    println!(
        "{} {} {} {}  {}",
        green("✓"),
        file.name(),
        dim("→"),
        out_path.display(),
        dim(&fileflex::human_size(conversion.bytes.len() as u64)),
    );
    Ok(())
}

async fn batch(files: Vec<PathBuf>, target: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let mut items = Vec::with_capacity(files.len());
    for path in &files {
        let input = InputFile::from_path(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let descriptor = resolve_target(input.category(), target.as_deref())?;
        items.push(BatchItem::new(input, descriptor));
    }

    let progress = CliBatchProgress::new();
    let (zip_bytes, report) =
        run_batch_to_archive(items, &CodecSet::default(), &progress).await?;

    let out_path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHIVE_NAME));
    tokio::fs::write(&out_path, &zip_bytes)
        .await
        .with_context(|| format!("writing {}", out_path.display()))?;

    let summary = format!(
        "{}/{} converted, {} failed",
        report.succeeded(),
        report.outcomes.len(),
        report.failed()
    );
    println!(
        "{} {}  {}  {}",
        green("✓"),
        bold(&out_path.display().to_string()),
        dim(&fileflex::human_size(zip_bytes.len() as u64)),
        dim(&summary),
    );
    if report.failed() > 0 {
        std::process::exit(1);
    }
    Ok(())
}
