//! Markdown Docs Export
//!
//! Renders a rule tree as one Markdown document: a readable section per
//! group and rule, then a fenced `htkrules` block holding the full
//! serialized tree so the document can be imported again.
//!
//! Apart from the `Exported:` timestamp the output is a pure function of the
//! tree. Every group heading is `##` and every rule heading is `###`,
//! whatever the nesting depth; nesting shows only through document order.

use crate::rules::{is_mock_rule, serialize_tree, visit, DefaultDescriber, RuleDescriber};
use crate::rules::{Rule, RuleDocNode, RuleGroup, RuleRoot};
use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;

/// Language tag of the fenced block that carries the serialized tree.
pub const RULES_FENCE_TAG: &str = "htkrules";

/// Heading used when no title is configured.
pub const DEFAULT_EXPORT_TITLE: &str = "Rules & docs";

const MOCK_LABEL: &str = " *(Mock)*";

// ─────────────────────────────────────────────────────────────────────────────
// Exporter
// ─────────────────────────────────────────────────────────────────────────────

/// Builds Markdown docs for a rule tree.
///
/// # Example
///
/// ```ignore
/// let markdown = MarkdownExporter::new()
///     .title(&settings.export_title)
///     .export(store.snapshot());
/// ```
pub struct MarkdownExporter<'a> {
    title: String,
    describer: &'a dyn RuleDescriber,
}

impl Default for MarkdownExporter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> MarkdownExporter<'a> {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_EXPORT_TITLE.to_string(),
            describer: &DefaultDescriber,
        }
    }

    /// Set the document title (the `#` heading).
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Use a different source of matcher/step summaries.
    #[must_use]
    pub fn describer(mut self, describer: &'a dyn RuleDescriber) -> Self {
        self.describer = describer;
        self
    }

    /// Export stamped with the current time.
    pub fn export(&self, root: &RuleRoot) -> String {
        self.export_at(root, Utc::now())
    }

    /// Export stamped with `exported_at`.
    pub fn export_at(&self, root: &RuleRoot, exported_at: DateTime<Utc>) -> String {
        let mut lines = vec![
            format!("# {}", single_line(&self.title)),
            String::new(),
            format!(
                "Exported: {}",
                exported_at.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
            String::new(),
        ];

        for node in visit(root) {
            match node {
                // visit() unwraps the root
                RuleDocNode::Root(_) => {}
                RuleDocNode::Group(group) => push_group(&mut lines, group),
                RuleDocNode::Rule(rule) => push_rule(&mut lines, rule, self.describer),
            }
        }

        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(String::new());
        lines.push("*Full rules data (for import):*".to_string());
        lines.push(String::new());
        lines.push(format!("```{}", RULES_FENCE_TAG));
        lines.push(payload_json(root));
        lines.push("```".to_string());

        lines.join("\n")
    }
}

/// Export a tree with the default title and summaries.
pub fn export_tree(root: &RuleRoot) -> String {
    MarkdownExporter::new().export(root)
}

fn push_group(lines: &mut Vec<String>, group: &RuleGroup) {
    lines.push(String::new());
    lines.push(format!("## {}", single_line(&group.title)));
    if let Some(description) = present(&group.description) {
        lines.push(String::new());
        lines.push(description.to_string());
        lines.push(String::new());
    }
}

fn push_rule(lines: &mut Vec<String>, rule: &Rule, describer: &dyn RuleDescriber) {
    let matcher_summary = describer.summarize_matcher(rule);
    let steps_summary = describer.summarize_steps(rule);
    let display_title = rule.title.as_deref().unwrap_or(&matcher_summary);
    let mock_label = if is_mock_rule(rule) { MOCK_LABEL } else { "" };

    lines.push(String::new());
    lines.push(format!("### {}{}", single_line(display_title), mock_label));
    if rule.title.is_some() {
        lines.push(format!(
            "*Match: {} → {}*",
            single_line(&matcher_summary),
            single_line(&steps_summary)
        ));
    } else if steps_summary != display_title {
        lines.push(format!("*{}*", single_line(&steps_summary)));
    }
    if let Some(description) = present(&rule.description) {
        lines.push(String::new());
        lines.push(description.to_string());
    }
}

fn payload_json(root: &RuleRoot) -> String {
    fenced_payload(serialize_tree(root).and_then(|value| Ok(serde_json::to_string_pretty(&value)?)))
}

/// Body of the rules fence. A serialization failure leaves `null` in the
/// fence, so the document will not import; debug builds panic instead.
fn fenced_payload(serialized: Result<String>) -> String {
    match serialized {
        Ok(json) => json,
        Err(e) => {
            let message = format!(
                "Could not serialize rules for export, the exported docs will not import: {}",
                e
            );
            warn!("{}", message);
            if cfg!(debug_assertions) {
                panic!("{}", message);
            }
            "null".to_string()
        }
    }
}

fn present(description: &Option<String>) -> Option<&str> {
    description.as_deref().filter(|d| !d.is_empty())
}

/// Collapse every line break to a single space so the text stays on its heading line.
pub fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
