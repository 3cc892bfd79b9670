//! Rule tree data model and pre-order traversal
//!
//! A rule tree has exactly one [`RuleRoot`] holding an ordered list of
//! groups and rules. Groups nest arbitrarily; rules are leaves. The owned
//! types derive serde so the same structs double as the serialized payload
//! embedded in exported docs.
//!
//! Traversal and export work on [`RuleDocNode`], a borrowed tagged view over
//! the three node kinds.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// The only rule kind whose single `simple` step counts as a mock.
pub const HTTP_RULE_KIND: &str = "http";

/// Step `type` key of a fixed-response step.
pub const MOCK_STEP_KIND: &str = "simple";

// ─────────────────────────────────────────────────────────────────────────────
// Owned Tree
// ─────────────────────────────────────────────────────────────────────────────

/// The root of a rule tree. Never rendered as a heading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleRoot {
    #[serde(default)]
    pub items: Vec<RuleItem>,
}

/// A child of the root or of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum RuleItem {
    Group(RuleGroup),
    Rule(Rule),
}

/// A named container with an optional Markdown description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleGroup {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<RuleItem>,
}

/// A single matcher + step pipeline.
///
/// `title: Some("")` and `title: None` are different: only an absent title
/// falls back to the matcher summary when rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub matchers: Vec<RulePart>,
    #[serde(default)]
    pub steps: Vec<RulePart>,
}

/// An opaque matcher or step: a `type` key plus whatever fields it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulePart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RulePart {
    /// Create a part with no extra fields.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Map::new(),
        }
    }

    /// Add a field, builder style.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// A field rendered as plain text (strings unquoted).
    pub fn text_field(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl Rule {
    /// Create an untitled rule of the given kind.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            title: None,
            description: None,
            matchers: Vec::new(),
            steps: Vec::new(),
        }
    }
}

impl RuleGroup {
    /// Create an empty group.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            items: Vec::new(),
        }
    }
}

impl RuleItem {
    pub fn id(&self) -> &str {
        match self {
            RuleItem::Group(group) => &group.id,
            RuleItem::Rule(rule) => &rule.id,
        }
    }
}

impl From<RuleGroup> for RuleItem {
    fn from(group: RuleGroup) -> Self {
        RuleItem::Group(group)
    }
}

impl From<Rule> for RuleItem {
    fn from(rule: Rule) -> Self {
        RuleItem::Rule(rule)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────────────────────────────────────

impl RuleRoot {
    pub fn new(items: Vec<RuleItem>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a group or rule by id.
    pub fn find(&self, id: &str) -> Option<RuleDocNode<'_>> {
        visit(RuleDocNode::Root(self)).find(|node| node.id() == Some(id))
    }

    /// Find a group or rule by id for editing.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut RuleItem> {
        let mut stack: Vec<&mut RuleItem> = self.items.iter_mut().rev().collect();
        while let Some(item) = stack.pop() {
            if item.id() == id {
                return Some(item);
            }
            if let RuleItem::Group(group) = item {
                stack.extend(group.items.iter_mut().rev());
            }
        }
        None
    }

    /// Ids that occur more than once, in first-repeat order.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for node in visit(RuleDocNode::Root(self)) {
            if let Some(id) = node.id() {
                if !seen.insert(id) && !duplicates.iter().any(|d| d == id) {
                    duplicates.push(id.to_string());
                }
            }
        }
        duplicates
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Borrowed Node View
// ─────────────────────────────────────────────────────────────────────────────

/// A borrowed, tagged view of one node of the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleDocNode<'a> {
    Root(&'a RuleRoot),
    Group(&'a RuleGroup),
    Rule(&'a Rule),
}

impl<'a> RuleDocNode<'a> {
    /// The node id. The root has none.
    pub fn id(&self) -> Option<&'a str> {
        match self {
            RuleDocNode::Root(_) => None,
            RuleDocNode::Group(group) => Some(&group.id),
            RuleDocNode::Rule(rule) => Some(&rule.id),
        }
    }

    /// The explicitly set title, if any.
    pub fn title(&self) -> Option<&'a str> {
        match self {
            RuleDocNode::Root(_) => None,
            RuleDocNode::Group(group) => Some(&group.title),
            RuleDocNode::Rule(rule) => rule.title.as_deref(),
        }
    }

    pub fn description(&self) -> Option<&'a str> {
        match self {
            RuleDocNode::Root(_) => None,
            RuleDocNode::Group(group) => group.description.as_deref(),
            RuleDocNode::Rule(rule) => rule.description.as_deref(),
        }
    }

    fn children(&self) -> &'a [RuleItem] {
        match self {
            RuleDocNode::Root(root) => &root.items,
            RuleDocNode::Group(group) => &group.items,
            RuleDocNode::Rule(_) => &[],
        }
    }
}

impl<'a> From<&'a RuleRoot> for RuleDocNode<'a> {
    fn from(root: &'a RuleRoot) -> Self {
        RuleDocNode::Root(root)
    }
}

impl<'a> From<&'a RuleItem> for RuleDocNode<'a> {
    fn from(item: &'a RuleItem) -> Self {
        match item {
            RuleItem::Group(group) => RuleDocNode::Group(group),
            RuleItem::Rule(rule) => RuleDocNode::Rule(rule),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Traversal
// ─────────────────────────────────────────────────────────────────────────────

/// Pre-order iterator over a subtree. See [`visit`].
pub struct Visit<'a> {
    stack: Vec<RuleDocNode<'a>>,
}

impl<'a> Iterator for Visit<'a> {
    type Item = RuleDocNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.stack.pop()?;
            self.stack
                .extend(node.children().iter().rev().map(RuleDocNode::from));
            if !matches!(node, RuleDocNode::Root(_)) {
                return Some(node);
            }
        }
    }
}

/// Visit `node` and its descendants in pre-order, list order preserved.
///
/// A root is unwrapped: its children are visited, the root itself is never
/// yielded.
pub fn visit<'a>(node: impl Into<RuleDocNode<'a>>) -> Visit<'a> {
    Visit {
        stack: vec![node.into()],
    }
}

/// Whether a rule is a plain mock: an http rule with a single fixed-response step.
pub fn is_mock_rule(rule: &Rule) -> bool {
    rule.kind == HTTP_RULE_KIND
        && rule.steps.len() == 1
        && rule.steps[0].kind == MOCK_STEP_KIND
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
