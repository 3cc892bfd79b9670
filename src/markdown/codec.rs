//! Markdown ↔ formatted content conversion
//!
//! The live editor never looks inside formatted content. It only moves it
//! through a [`ContentCodec`]: Markdown in, formatted content out, and back.
//! The two directions are not exact inverses; a round trip converges on an
//! equivalent document rather than identical bytes.

use crate::error::{Error, Result};
use comrak::{markdown_to_html, Options};
use htmd::options::{CodeBlockStyle, HeadingStyle, Options as HtmdOptions};
use htmd::HtmlToMarkdown;

/// Converts between Markdown and the content a surface displays.
pub trait ContentCodec {
    /// The rendered, directly editable representation.
    type Content;

    /// Render Markdown. Never called with blank input.
    fn to_formatted(&self, markdown: &str) -> Self::Content;

    /// Convert formatted content back to Markdown.
    ///
    /// # Errors
    ///
    /// Returns `Error::Conversion` if the content cannot be converted.
    fn to_markdown(&self, content: &Self::Content) -> Result<String>;

    /// Whether the content shows nothing but whitespace.
    fn is_blank(&self, content: &Self::Content) -> bool;

    /// Formatted content for an empty document.
    fn empty(&self) -> Self::Content;
}

/// Comrak options shared by editor rendering and document export.
pub fn comrak_options(linkify: bool) -> Options {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.tasklist = true;
    options.extension.autolink = linkify;

    // Raw HTML in descriptions is dropped rather than passed through
    options.render.unsafe_ = false;

    options
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Codec
// ─────────────────────────────────────────────────────────────────────────────

/// Formatted content as HTML: comrak renders, htmd converts back.
pub struct HtmlCodec {
    options: Options,
    converter: HtmlToMarkdown,
}

impl HtmlCodec {
    /// Create a codec. `linkify` turns bare URLs into links when rendering.
    pub fn new(linkify: bool) -> Self {
        let converter = HtmlToMarkdown::builder()
            .skip_tags(vec!["script", "style"])
            .options(HtmdOptions {
                heading_style: HeadingStyle::Atx,
                code_block_style: CodeBlockStyle::Fenced,
                ..Default::default()
            })
            .build();

        Self {
            options: comrak_options(linkify),
            converter,
        }
    }
}

impl Default for HtmlCodec {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ContentCodec for HtmlCodec {
    type Content = String;

    fn to_formatted(&self, markdown: &str) -> String {
        markdown_to_html(markdown, &self.options)
    }

    fn to_markdown(&self, content: &String) -> Result<String> {
        self.converter
            .convert(content)
            .map_err(|e| Error::Conversion(e.to_string()))
    }

    /// Blank means whitespace-only HTML, or HTML that converts to
    /// whitespace-only Markdown (such as an emptied `<p><br></p>`).
    fn is_blank(&self, content: &String) -> bool {
        if content.trim().is_empty() {
            return true;
        }
        self.converter
            .convert(content)
            .map(|markdown| markdown.trim().is_empty())
            .unwrap_or(false)
    }

    fn empty(&self) -> String {
        String::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_markdown_to_html() {
        let codec = HtmlCodec::default();
        let html = codec.to_formatted("**x** and `code`");
        assert!(html.contains("<strong>x</strong>"));
        assert!(html.contains("<code>code</code>"));
    }

    #[test]
    fn test_linkify_option() {
        let linked = HtmlCodec::new(true).to_formatted("Go to https://example.com");
        assert!(linked.contains("<a href=\"https://example.com\">"));

        let plain = HtmlCodec::new(false).to_formatted("Go to https://example.com");
        assert!(!plain.contains("<a "));
    }

    #[test]
    fn test_raw_html_is_not_passed_through() {
        let html = HtmlCodec::default().to_formatted("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_converts_html_back_to_markdown() {
        let codec = HtmlCodec::default();
        let md = codec
            .to_markdown(&"<p><strong>bold</strong> text</p>".to_string())
            .unwrap();
        assert_eq!(md.trim(), "**bold** text");
    }

    #[test]
    fn test_headings_use_atx_style() {
        let codec = HtmlCodec::default();
        let md = codec.to_markdown(&"<h2>Title</h2>".to_string()).unwrap();
        assert_eq!(md.trim(), "## Title");
    }

    #[test]
    fn test_round_trip_converges() {
        let codec = HtmlCodec::default();
        let once = codec
            .to_markdown(&codec.to_formatted("Some *emphasis* and **strong** text"))
            .unwrap();
        let twice = codec.to_markdown(&codec.to_formatted(&once)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_blank_detection() {
        let codec = HtmlCodec::default();
        assert!(codec.is_blank(&codec.empty()));
        assert!(codec.is_blank(&"  \n".to_string()));
        assert!(codec.is_blank(&"<p><br></p>".to_string()));
        assert!(!codec.is_blank(&"<p>x</p>".to_string()));
    }

    #[test]
    fn test_content_without_text_is_not_blank() {
        let codec = HtmlCodec::default();
        let image = "<p><img src=\"diagram.png\" alt=\"\"></p>".to_string();
        assert!(!codec.is_blank(&image));
        assert!(codec.to_markdown(&image).unwrap().contains("diagram.png"));
        assert!(!codec.is_blank(&"<hr>".to_string()));
    }
}
