//! HTML → plain text: the rendered text content of the body.

use crate::error::ConvertError;
use scraper::{Html, Selector};

/// Extract the body's text content, discarding all markup.
///
/// Equivalent to reading `document.body.textContent`: text nodes are
/// concatenated in document order with no separators inserted. Script and
/// style text inside the body is included, as `textContent` includes it.
pub fn extract_text(html: &str) -> Result<Vec<u8>, ConvertError> {
    let document = Html::parse_document(html);
    let body = Selector::parse("body")
        .map_err(|e| ConvertError::Internal(format!("body selector: {e}")))?;
    let text: String = document
        .select(&body)
        .next()
        .map(|element| element.text().collect())
        .unwrap_or_default();
    Ok(text.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_is_discarded() {
        let out = extract_text("<html><body><h1>Title</h1><p>para <b>bold</b></p></body></html>")
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Titlepara bold");
    }

    #[test]
    fn head_content_is_excluded() {
        let out = extract_text(
            "<html><head><title>nope</title></head><body>yes</body></html>",
        )
        .unwrap();
        assert_eq!(out, b"yes");
    }

    #[test]
    fn fragments_get_an_implied_body() {
        // The parser normalises fragments into a full document.
        let out = extract_text("<p>loose</p>").unwrap();
        assert_eq!(out, b"loose");
    }

    #[test]
    fn empty_input_yields_empty_text() {
        assert_eq!(extract_text("").unwrap(), b"");
    }
}
