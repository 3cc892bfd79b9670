//! Rules Docs Export and Import Module
//!
//! This module turns a rule tree into a portable Markdown document and reads
//! rules back out of such documents or raw JSON files.
//!
//! # Supported Formats
//!
//! - **Markdown docs**: Readable sections per group and rule, followed by a
//!   fenced `htkrules` block with the full serialized tree
//! - **HTML page**: The Markdown docs rendered as a standalone page
//! - **Import**: Raw rules JSON, or Markdown with a `htkrules`/`json` block
//!
//! # Architecture
//!
//! - `markdown.rs` - Markdown document generation
//! - `import.rs` - Payload extraction from JSON or fenced blocks
//! - `html.rs` - HTML document generation

pub mod html;
pub mod import;
pub mod markdown;

pub use html::generate_html_document;
pub use import::{extract, ImportError, IMPORT_FAILED_MESSAGE};
pub use markdown::{export_tree, MarkdownExporter, DEFAULT_EXPORT_TITLE, RULES_FENCE_TAG};
