//! Visible-text extraction from article HTML.
//!
//! Every `<p>`, `<div>` and `<article>` element contributes its trimmed
//! text, joined with single spaces and skipping empty elements. Nested
//! containers are visited independently, so text inside a `<p>` inside a
//! `<div>` appears more than once, and navigation, cookie banners and ads
//! are collected along with the story. This over-collection is a known
//! precision limit of the heuristic and is kept as-is.

use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

static CONTENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p, div, article").expect("static selector is valid"));

/// Extract the concatenated content text of an HTML document.
pub fn article_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let text = document
        .select(&CONTENT_SELECTOR)
        .map(|element| element.text().collect::<String>())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .join(" ");
    debug!(html_bytes = html.len(), text_bytes = text.len(), "Extracted article text");
    text
}

/// First `max_chars` characters of `text`.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_paragraphs_in_document_order() {
        let html = r#"
            <html><head><title>Ignored</title></head>
            <body>
              <h1>Headline not collected</h1>
              <p>  First paragraph. </p>
              <p></p>
              <p>Second paragraph.</p>
            </body></html>"#;
        assert_eq!(article_text(html), "First paragraph. Second paragraph.");
    }

    #[test]
    fn test_nested_containers_over_collect() {
        let html = "<article><div><p>Body</p></div></article>";
        assert_eq!(article_text(html), "Body Body Body");
    }

    #[test]
    fn test_element_text_is_not_re_spaced() {
        let html = "<p>Stocks <b>rally</b>\n  today</p>";
        assert_eq!(article_text(html), "Stocks rally\n  today");
    }

    #[test]
    fn test_empty_and_non_html_input() {
        assert_eq!(article_text(""), "");
        assert_eq!(article_text("plain text, no markup"), "");
        assert_eq!(article_text("<div>   </div>"), "");
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let text = "é".repeat(500);
        let short = excerpt(&text, 100);
        assert_eq!(short.chars().count(), 100);
        assert_eq!(excerpt("short", 100), "short");
        assert_eq!(excerpt("anything", 0), "");
    }
}
