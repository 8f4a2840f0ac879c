//! Raw content records handed to the pipeline.
//!
//! [`RawContent`] is the immutable input of one analyze call. Its serialized
//! form keeps the content-source wire names (`content`, `usage.tokens`) so the
//! envelope's `jinaContent` block round-trips with what the reader returned.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// Token accounting reported by the content source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentUsage {
    pub tokens: u64,
}

/// Normalized text of one document plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawContent {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: String,

    /// Normalized document text (Markdown-ish plain text).
    #[serde(rename = "content", default)]
    pub body: String,

    #[serde(rename = "usage", default, skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<ContentUsage>,
}

impl RawContent {
    pub fn new(title: impl Into<String>, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), url: url.into(), body: body.into(), token_usage: None }
    }

    /// Builds content from caller-supplied text, converting HTML input to text first.
    pub fn from_text(title: impl Into<String>, url: impl Into<String>, text: &str) -> Self {
        Self::new(title, url, normalize_body(text))
    }

    pub fn with_usage(mut self, tokens: u64) -> Self {
        self.token_usage = Some(ContentUsage { tokens });
        self
    }

    /// Tokens consumed by the content source, zero when unknown.
    pub fn tokens_used(&self) -> u64 {
        self.token_usage.map(|u| u.tokens).unwrap_or(0)
    }
}

/// Returns `true` when the input looks like an HTML document or fragment.
pub fn looks_like_html(text: &str) -> bool {
    let head: String = text.trim_start().chars().take(512).collect::<String>().to_lowercase();
    head.starts_with("<!doctype html")
        || head.starts_with("<html")
        || head.contains("<body")
        || (head.starts_with('<') && (head.contains("<p") || head.contains("<h1") || head.contains("<div")))
}

/// Normalizes caller text: HTML becomes Markdown-ish text, anything else is trimmed.
pub fn normalize_body(text: &str) -> String {
    if looks_like_html(text) { html_to_text(text) } else { text.trim().to_string() }
}

const BLOCK_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p, li, blockquote, pre";

/// Convert HTML to block-separated text, keeping headings and list items recognizable
fn html_to_text(html: &str) -> String {
    let doc = Html::parse_document(html);

    let Ok(selector) = Selector::parse(BLOCK_SELECTOR) else {
        return collapse_whitespace(&doc.root_element().text().collect::<String>());
    };

    let blocks: Vec<String> = doc
        .select(&selector)
        .filter(|el| !has_block_ancestor(el))
        .filter_map(|el| {
            let text = collapse_whitespace(&el.text().collect::<String>());
            if text.is_empty() {
                return None;
            }
            let tag = el.value().name();
            Some(match tag {
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    let level = tag[1..].parse::<usize>().unwrap_or(1);
                    format!("{} {}", "#".repeat(level), text)
                }
                "li" => format!("- {}", text),
                _ => text,
            })
        })
        .collect();

    if blocks.is_empty() {
        collapse_whitespace(&doc.root_element().text().collect::<String>())
    } else {
        blocks.join("\n\n")
    }
}

/// Nested blocks (a `<p>` inside an `<li>`) are already covered by their ancestor's text
fn has_block_ancestor(el: &ElementRef<'_>) -> bool {
    el.ancestors().filter_map(ElementRef::wrap).any(|a| {
        matches!(
            a.value().name(),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" | "li" | "blockquote" | "pre"
        )
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_trimmed() {
        assert_eq!(normalize_body("  Plain text.  \n"), "Plain text.");
    }

    #[test]
    fn test_html_detection() {
        assert!(looks_like_html("<!DOCTYPE html><html><body></body></html>"));
        assert!(looks_like_html("<div><p>Hi</p></div>"));
        assert!(!looks_like_html("# Heading\n\nSome <b>bold</b> text"));
    }

    #[test]
    fn test_html_to_text_keeps_structure() {
        let html = "<html><body><h2>Pricing</h2><p>Plans start at $5.</p><ul><li><p>Fast</p></li><li>Cheap</li></ul></body></html>";
        let text = normalize_body(html);
        assert_eq!(text, "## Pricing\n\nPlans start at $5.\n\n- Fast\n\n- Cheap");
    }

    #[test]
    fn test_serialized_wire_names() {
        let content = RawContent::new("T", "https://example.com", "Body").with_usage(42);
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["content"], "Body");
        assert_eq!(json["usage"]["tokens"], 42);
        assert_eq!(content.tokens_used(), 42);
    }

    #[test]
    fn test_deserialize_reader_payload() {
        let payload = r#"{"title":"A","url":"https://a.test","content":"Text","usage":{"tokens":7},"images":{}}"#;
        let content: RawContent = serde_json::from_str(payload).unwrap();
        assert_eq!(content.body, "Text");
        assert_eq!(content.tokens_used(), 7);
    }
}
