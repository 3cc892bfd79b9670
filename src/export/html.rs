//! HTML Docs Export
//!
//! Wraps exported rules Markdown in a standalone HTML page with inlined
//! CSS, for sharing docs with people who will not import them.

use crate::markdown::comrak_options;
use comrak::markdown_to_html;

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a complete HTML document from rules Markdown.
///
/// # Arguments
///
/// * `markdown` - Exported rules docs
/// * `title` - Page title
/// * `linkify` - Turn bare URLs into links
pub fn generate_html_document(markdown: &str, title: &str, linkify: bool) -> String {
    let body = markdown_to_html(markdown, &comrak_options(linkify));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="ruledocs">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
    <article class="rules-docs">
{body}
    </article>
</body>
</html>"#,
        title = html_escape(title),
        css = BASE_CSS,
        body = body,
    )
}

/// Base CSS for rules docs (layout, typography, light/dark via media query).
const BASE_CSS: &str = r#"
*, *::before, *::after {
    box-sizing: border-box;
}

:root {
    color-scheme: light dark;
}

body {
    margin: 0;
    padding: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    font-size: 16px;
    line-height: 1.6;
}

.rules-docs {
    max-width: 900px;
    margin: 0 auto;
    padding: 32px 24px;
}

.rules-docs h1 { font-size: 2em; border-bottom: 1px solid; padding-bottom: 0.3em; }
.rules-docs h2 { font-size: 1.5em; margin-top: 32px; border-bottom: 1px solid rgba(128, 128, 128, 0.3); }
.rules-docs h3 { font-size: 1.2em; margin-bottom: 4px; }

/* Match and step summaries directly under a rule heading */
.rules-docs h3 + p > em:only-child {
    opacity: 0.75;
}

.rules-docs code {
    font-family: 'JetBrains Mono', 'Fira Code', 'Consolas', 'Monaco', monospace;
    font-size: 0.9em;
    padding: 0.2em 0.4em;
    border-radius: 4px;
    background-color: rgba(128, 128, 128, 0.12);
}

.rules-docs pre {
    padding: 16px;
    overflow: auto;
    border-radius: 6px;
    background-color: rgba(128, 128, 128, 0.08);
}

.rules-docs pre code {
    padding: 0;
    background: transparent;
}

.rules-docs table {
    border-collapse: collapse;
    margin-bottom: 16px;
}

.rules-docs th,
.rules-docs td {
    padding: 6px 12px;
    border: 1px solid rgba(128, 128, 128, 0.4);
}

.rules-docs hr {
    height: 2px;
    margin: 24px 0;
    border: none;
    background-color: rgba(128, 128, 128, 0.3);
}
"#;

// ─────────────────────────────────────────────────────────────────────────────
// Utility Functions
// ─────────────────────────────────────────────────────────────────────────────

/// HTML-escape a string.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
