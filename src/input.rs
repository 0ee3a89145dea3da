//! Input file handling: an immutable view over user-supplied content.
//!
//! The core never touches the filesystem on its own; it reads the bytes an
//! [`InputFile`] carries and nothing else. [`InputFile::from_path`] exists
//! for the calling layer's convenience (the CLI, tests) and guesses the
//! declared media type from the extension the way a browser would fill in
//! `File.type`.

use crate::category::{classify, Category};
use crate::error::ConvertError;
use std::path::Path;
use tracing::debug;

/// An immutable view over one user-supplied file.
///
/// `declared_media_type` is whatever the environment claimed and may be
/// empty or wrong; classification cross-checks it against the name.
#[derive(Debug, Clone)]
pub struct InputFile {
    name: String,
    declared_media_type: String,
    bytes: Vec<u8>,
}

impl InputFile {
    /// Wrap in-memory content as an input file.
    pub fn new(
        name: impl Into<String>,
        declared_media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_media_type: declared_media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its media type from the extension.
    ///
    /// Read failures surface as [`ConvertError::Io`].
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let declared = mime_guess::from_path(path).first_raw().unwrap_or("");
        debug!("Loaded {} ({} bytes, type {:?})", name, bytes.len(), declared);
        Ok(Self::new(name, declared, bytes))
    }

    /// Original filename, extension included.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media type; may be empty.
    pub fn declared_media_type(&self) -> &str {
        &self.declared_media_type
    }

    /// Raw content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Classify this file. Pure; same result on every call.
    pub fn category(&self) -> Category {
        classify(&self.name, &self.declared_media_type)
    }
}

/// Format a byte count for display: `1536` → `"1.5 KB"`.
///
/// Powers of 1024, up to TB, with up to two decimals and trailing zeros
/// trimmed.
pub fn human_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    let exponent = ((bytes as f64).log2() / 10.0).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rendered = format!("{value:.2}");
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{rendered} {}", UNITS[exponent])
}
