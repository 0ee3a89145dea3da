//! Markdown → standalone HTML document.
//!
//! comrak renders the fragment; the fragment is then wrapped in a minimal
//! document shell with readable defaults (system font, centred column,
//! shaded code blocks) so the output opens cleanly in a browser without an
//! external stylesheet.

use comrak::Options;

const SHELL_HEAD: &str = "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><style>\
body{font-family:system-ui,sans-serif;line-height:1.6;max-width:800px;margin:0 auto;padding:2rem;}\
pre{background:#f4f4f4;padding:1rem;border-radius:8px;}\
code{font-family:monospace;background:#f4f4f4;padding:0.2rem 0.4rem;}\
</style></head><body>";
const SHELL_FOOT: &str = "</body></html>";

/// Render markdown text into a complete HTML document.
///
/// Total: comrak renders any text, so there is no decode failure path.
pub fn to_html_document(text: &str) -> Vec<u8> {
    let body = comrak::markdown_to_html(text, &Options::default());
    let mut out = String::with_capacity(SHELL_HEAD.len() + body.len() + SHELL_FOOT.len());
    out.push_str(SHELL_HEAD);
    out.push_str(&body);
    out.push_str(SHELL_FOOT);
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_emphasis() {
        let html = String::from_utf8(to_html_document("# Title\n\nsome *emphasis*\n")).unwrap();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn output_is_a_standalone_document() {
        let html = String::from_utf8(to_html_document("hello")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</body></html>"));
        assert!(html.contains("<style>"));
    }

    #[test]
    fn empty_input_still_produces_the_shell() {
        let html = String::from_utf8(to_html_document("")).unwrap();
        assert!(html.contains("<body>"));
    }
}
