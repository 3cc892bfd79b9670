//! Rules Import
//!
//! Pulls the serialized rule tree back out of a file. Two inputs are
//! accepted: raw JSON (anything whose trimmed text starts with `{`) and
//! Markdown containing a fenced block tagged `htkrules` or `json`, such as
//! the docs written by `export::markdown`.
//!
//! [`extract`] never panics. Every failure comes back as an [`ImportError`]
//! that callers can show as one generic message.

use log::debug;
use serde_json::Value;
use std::fmt;

const FENCE: &str = "```";

/// Fence language tags that may carry rules data.
const RULES_TAGS: &[&str] = &["htkrules", "json"];

// ─────────────────────────────────────────────────────────────────────────────
// Import Error
// ─────────────────────────────────────────────────────────────────────────────

/// Why a file could not be imported.
#[derive(Debug)]
pub enum ImportError {
    /// The file is empty or whitespace only
    Empty,
    /// The file looks like JSON but does not parse
    InvalidJson(serde_json::Error),
    /// No `htkrules` or `json` fenced block was found
    NoRulesBlock,
    /// The first rules block does not contain valid JSON
    InvalidBlockJson(serde_json::Error),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Empty => write!(f, "File is empty"),
            ImportError::InvalidJson(e) => write!(f, "File is not valid JSON: {}", e),
            ImportError::NoRulesBlock => write!(f, "No rules data block found"),
            ImportError::InvalidBlockJson(e) => {
                write!(f, "Rules data block is not valid JSON: {}", e)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::InvalidJson(e) | ImportError::InvalidBlockJson(e) => Some(e),
            ImportError::Empty | ImportError::NoRulesBlock => None,
        }
    }
}

/// Message shown to users for any import failure.
pub const IMPORT_FAILED_MESSAGE: &str =
    "Could not read rules from this file. Use a rules JSON file or an exported Markdown doc.";

// ─────────────────────────────────────────────────────────────────────────────
// Extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Extract the serialized rules payload from file contents.
///
/// Text starting with `{` is parsed as JSON and nothing else; if that fails
/// the fence search is not attempted. Otherwise the first fenced block
/// tagged `htkrules` or `json` is used, even when later blocks exist.
pub fn extract(text: &str) -> Result<Value, ImportError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ImportError::Empty);
    }

    if trimmed.starts_with('{') {
        debug!("Importing rules as raw JSON");
        return serde_json::from_str(trimmed).map_err(ImportError::InvalidJson);
    }

    let body = find_rules_block(trimmed).ok_or(ImportError::NoRulesBlock)?;
    debug!("Importing rules from fenced block ({} bytes)", body.len());
    serde_json::from_str(body.trim()).map_err(ImportError::InvalidBlockJson)
}

/// Body of the first fenced block tagged with a rules tag.
///
/// An opening fence is a line starting with three backticks followed
/// directly by the tag; the body runs to the next line starting with three
/// backticks. An unclosed block does not count.
fn find_rules_block(text: &str) -> Option<&str> {
    let mut offset = 0;
    let mut body_start: Option<usize> = None;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let content = line.trim_end_matches(['\n', '\r']);

        match body_start {
            None => {
                let is_rules_fence = content
                    .strip_prefix(FENCE)
                    .map(|tag| RULES_TAGS.contains(&tag.trim_end()))
                    .unwrap_or(false);
                if is_rules_fence {
                    body_start = Some(offset);
                }
            }
            Some(start) => {
                if content.trim_start().starts_with(FENCE) {
                    return Some(&text[start..line_start]);
                }
            }
        }
    }
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
