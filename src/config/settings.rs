//! User settings and preferences for ruledocs
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::export::DEFAULT_EXPORT_TITLE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default page title for HTML exports.
pub const DEFAULT_HTML_TITLE: &str = "Rules documentation";

/// Default hint shown in an empty description editor.
pub const DEFAULT_DESCRIPTION_PLACEHOLDER: &str =
    "Markdown here… **bold**, *italic*, lists, `code`";

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────
    /// Title line of exported Markdown docs
    pub export_title: String,

    /// Page title of exported HTML docs
    pub html_export_title: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────
    /// Turn bare URLs into links when rendering descriptions
    pub linkify: bool,

    /// Hint shown while a description is empty
    pub description_placeholder: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Session & History
    // ─────────────────────────────────────────────────────────────────────────
    /// Recently used rules files (most recent first)
    pub recent_rules_files: Vec<PathBuf>,

    /// Maximum number of recent files to remember
    pub max_recent_files: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Export
            export_title: DEFAULT_EXPORT_TITLE.to_string(),
            html_export_title: DEFAULT_HTML_TITLE.to_string(),

            // Editing
            linkify: true,
            description_placeholder: DEFAULT_DESCRIPTION_PLACEHOLDER.to_string(),

            // Session & History
            recent_rules_files: Vec::new(),
            max_recent_files: 10,
        }
    }
}

impl Settings {
    /// Upper bound for `max_recent_files`.
    pub const MAX_RECENT_FILES: usize = 100;

    /// Add a rules file to the recent files list.
    ///
    /// If the file already exists in the list, it's moved to the front.
    /// The list is trimmed to `max_recent_files`.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_rules_files.retain(|p| p != &path);
        self.recent_rules_files.insert(0, path);
        self.recent_rules_files.truncate(self.max_recent_files);
    }

    /// Sanitize settings that may have been edited by hand.
    ///
    /// Blank titles fall back to their defaults and line breaks in titles
    /// are collapsed, since titles are rendered as single heading lines.
    pub fn sanitize(&mut self) {
        self.export_title = sanitize_title(&self.export_title, DEFAULT_EXPORT_TITLE);
        self.html_export_title = sanitize_title(&self.html_export_title, DEFAULT_HTML_TITLE);

        if self.max_recent_files == 0 {
            self.max_recent_files = 10;
        } else if self.max_recent_files > Self::MAX_RECENT_FILES {
            self.max_recent_files = Self::MAX_RECENT_FILES;
        }
        self.recent_rules_files.truncate(self.max_recent_files);
    }

    /// Parse settings from JSON and sanitize them.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

fn sanitize_title(title: &str, default: &str) -> String {
    let collapsed = title
        .split(['\r', '\n'])
        .filter(|part| !part.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");
    if collapsed.is_empty() {
        default.to_string()
    } else {
        collapsed
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.export_title, "Rules & docs");
        assert_eq!(settings.html_export_title, DEFAULT_HTML_TITLE);
        assert!(settings.linkify);
        assert!(settings.recent_rules_files.is_empty());
        assert_eq!(settings.max_recent_files, 10);
    }

    #[test]
    fn test_add_recent_file() {
        let mut settings = Settings {
            max_recent_files: 3,
            ..Settings::default()
        };

        settings.add_recent_file(PathBuf::from("/a.json"));
        settings.add_recent_file(PathBuf::from("/b.json"));
        settings.add_recent_file(PathBuf::from("/c.json"));
        assert_eq!(settings.recent_rules_files[0], PathBuf::from("/c.json"));

        // Existing file moves to front
        settings.add_recent_file(PathBuf::from("/a.json"));
        assert_eq!(settings.recent_rules_files[0], PathBuf::from("/a.json"));
        assert_eq!(settings.recent_rules_files.len(), 3);

        // New file trims the oldest
        settings.add_recent_file(PathBuf::from("/d.json"));
        assert_eq!(settings.recent_rules_files.len(), 3);
        assert!(!settings
            .recent_rules_files
            .contains(&PathBuf::from("/b.json")));
    }

    #[test]
    fn test_sanitize_titles() {
        let mut settings = Settings {
            export_title: "Team\nrules ".to_string(),
            html_export_title: "  \n ".to_string(),
            ..Settings::default()
        };
        settings.sanitize();

        assert_eq!(settings.export_title, "Team rules");
        assert_eq!(settings.html_export_title, DEFAULT_HTML_TITLE);
    }

    #[test]
    fn test_sanitize_recent_limits() {
        let mut settings = Settings {
            max_recent_files: 0,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.max_recent_files, 10);

        settings.max_recent_files = 1000;
        settings.sanitize();
        assert_eq!(settings.max_recent_files, Settings::MAX_RECENT_FILES);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"linkify": false}"#).unwrap();
        assert!(!settings.linkify);
        assert_eq!(settings.export_title, DEFAULT_EXPORT_TITLE);
    }

    #[test]
    fn test_from_json_sanitized() {
        let settings = Settings::from_json_sanitized(r#"{"export_title": ""}"#).unwrap();
        assert_eq!(settings.export_title, DEFAULT_EXPORT_TITLE);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut original = Settings::default();
        original.add_recent_file(PathBuf::from("/rules.json"));
        let json = serde_json::to_string_pretty(&original).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(original, loaded);
    }
}
