//! Output filename derivation.

use crate::catalog::FormatDescriptor;

/// Derive the output filename from the input's name and the target.
///
/// Strips the input's last extension segment (everything after the final
/// `.`) and appends the descriptor's extension verbatim. Descriptor
/// extensions may be compound (`_resized.png`, `.min.json`), which is why
/// they are appended as-is rather than joined with a dot.
///
/// A dotless name is used whole, and so is a name whose only dot leads
/// (`.gitignore` keeps its name rather than collapsing to the extension).
pub fn output_name(original: &str, descriptor: &FormatDescriptor) -> String {
    let stem = match original.rfind('.') {
        Some(i) if i > 0 => &original[..i],
        _ => original,
    };
    format!("{stem}{}", descriptor.extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{list_targets, FormatDescriptor};
    use crate::category::Category;

    fn target(category: Category, label: &str) -> &'static FormatDescriptor {
        list_targets(category)
            .iter()
            .find(|d| d.label == label)
            .expect("label present in catalog")
    }

    #[test]
    fn only_the_last_extension_segment_is_replaced() {
        let json = target(Category::Csv, "JSON");
        assert_eq!(output_name("report.final.csv", json), "report.final.json");
    }

    #[test]
    fn dotless_names_keep_their_stem() {
        let b64 = target(Category::Text, "Base64 Encode");
        assert_eq!(output_name("noext", b64), "noext.b64.txt");
    }

    #[test]
    fn leading_dot_names_are_used_whole() {
        let digest = target(Category::Generic, "Security (SHA-256)");
        assert_eq!(output_name(".gitignore", digest), ".gitignore.sha256.txt");
    }

    #[test]
    fn compound_extensions_append_verbatim() {
        let resized = target(Category::Image, "Resize & Scale");
        assert_eq!(output_name("photo.jpg", resized), "photo_resized.png");

        let minified = target(Category::Json, "Minify");
        assert_eq!(output_name("data.json", minified), "data.min.json");
    }
}
