//! File classification: a name plus a declared media type maps to exactly
//! one [`Category`].
//!
//! [`classify`] is a pure, total function. The same (name, media type) pair
//! always yields the same category, and no input is an error; anything
//! unrecognised lands in [`Category::Generic`], which still offers a digest
//! target in the catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The semantic family assigned to an input file.
///
/// The category decides which conversion targets the catalog offers, so a
/// misclassification is a user-visible defect: an SVG classified as a plain
/// raster image would be offered a privacy strip it cannot use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Raster image (PNG, JPEG, WEBP, ...).
    Image,
    /// SVG vector image. Kept apart from `Image` because it must be
    /// rasterised before any pixel-based conversion.
    Vector,
    /// Excel workbook (`.xlsx` / `.xls`).
    Spreadsheet,
    /// JSON document.
    Json,
    /// Comma-separated values.
    Csv,
    /// Markdown document.
    Markdown,
    /// Plain text.
    Text,
    /// HTML document.
    Html,
    /// Anything else. Always classifiable, never an error.
    Generic,
}

impl Category {
    /// Every category, in presentation order.
    pub const ALL: [Category; 9] = [
        Category::Image,
        Category::Vector,
        Category::Spreadsheet,
        Category::Json,
        Category::Csv,
        Category::Markdown,
        Category::Text,
        Category::Html,
        Category::Generic,
    ];

    /// Lowercase name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::Vector => "vector",
            Category::Spreadsheet => "spreadsheet",
            Category::Json => "json",
            Category::Csv => "csv",
            Category::Markdown => "markdown",
            Category::Text => "text",
            Category::Html => "html",
            Category::Generic => "generic",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a file by its name and declared media type.
///
/// The declared type is untrustworthy (browsers fill it from OS heuristics,
/// and it may be empty), so each rule cross-checks the name's extension.
/// First match wins:
///
/// 1. `image/*` declared type: SVG (by exact type or `.svg` extension) is
///    [`Category::Vector`], everything else [`Category::Image`]. The vector
///    check comes first so an SVG served with a generic image type is never
///    treated as raster.
/// 2. `.md` / `.markdown` extension.
/// 3. `application/json` or `.json`.
/// 4. `text/csv` or `.csv`.
/// 5. `.xlsx` / `.xls`.
/// 6. `text/html` or `.html`.
/// 7. `text/plain` or `.txt`.
/// 8. Otherwise [`Category::Generic`].
///
/// Extension comparison is case-insensitive and uses the substring after the
/// last `.`; a name with no dot has no extension. Media types are compared
/// after stripping parameters (`text/plain; charset=utf-8` reads as
/// `text/plain`) and lowercasing.
pub fn classify(name: &str, declared_media_type: &str) -> Category {
    let media = media_essence(declared_media_type);
    let ext = extension_of(name);
    let ext = ext.as_deref();

    if media.starts_with("image/") {
        if media == "image/svg+xml" || ext == Some("svg") {
            return Category::Vector;
        }
        return Category::Image;
    }
    if matches!(ext, Some("md") | Some("markdown")) {
        return Category::Markdown;
    }
    if media == "application/json" || ext == Some("json") {
        return Category::Json;
    }
    if media == "text/csv" || ext == Some("csv") {
        return Category::Csv;
    }
    if matches!(ext, Some("xlsx") | Some("xls")) {
        return Category::Spreadsheet;
    }
    if media == "text/html" || ext == Some("html") {
        return Category::Html;
    }
    if media == "text/plain" || ext == Some("txt") {
        return Category::Text;
    }
    Category::Generic
}

/// Media type with parameters stripped, lowercased.
fn media_essence(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

/// Lowercased substring after the last `.`, or `None` for dotless names.
fn extension_of(name: &str) -> Option<String> {
    name.rfind('.').map(|i| name[i + 1..].to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_never_classifies_as_raster() {
        assert_eq!(classify("logo.svg", "image/svg+xml"), Category::Vector);
        // SVG delivered with a generic raster type still wins by extension.
        assert_eq!(classify("logo.svg", "image/png"), Category::Vector);
        // And by type alone, whatever the name says.
        assert_eq!(classify("logo.bin", "image/svg+xml"), Category::Vector);
    }

    #[test]
    fn raster_images_by_declared_type() {
        assert_eq!(classify("photo.jpg", "image/jpeg"), Category::Image);
        assert_eq!(classify("photo", "image/webp"), Category::Image);
    }

    #[test]
    fn extension_rules_are_case_insensitive() {
        assert_eq!(classify("NOTES.MD", ""), Category::Markdown);
        assert_eq!(classify("data.XLSX", ""), Category::Spreadsheet);
        assert_eq!(classify("page.HTML", ""), Category::Html);
    }

    #[test]
    fn media_type_parameters_are_ignored() {
        assert_eq!(classify("readme", "text/plain; charset=utf-8"), Category::Text);
        assert_eq!(classify("data", "application/json;charset=UTF-8"), Category::Json);
    }

    #[test]
    fn markdown_outranks_text_declared_type() {
        // A .md file often arrives as text/plain; the extension rule runs first.
        assert_eq!(classify("notes.md", "text/plain"), Category::Markdown);
    }

    #[test]
    fn dotless_names_fall_through_to_generic() {
        assert_eq!(classify("README", ""), Category::Generic);
        assert_eq!(classify("archive", "application/octet-stream"), Category::Generic);
    }

    #[test]
    fn classify_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(classify("rows.csv", "text/csv"), Category::Csv);
        }
    }
}
