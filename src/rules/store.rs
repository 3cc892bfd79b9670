//! Rule store: read snapshots, apply field edits, persist to disk
//!
//! Editors never hold on to tree nodes. They read a snapshot, then send a
//! [`Mutation`] naming the item by id. Writes are synchronous and visible
//! immediately to the next snapshot.

use super::tree::{RuleItem, RuleRoot};
use crate::error::{Error, Result};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// A field-level edit to one group or rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Set the title. An empty title clears a rule's title; groups keep it as-is.
    SetTitle { id: String, title: String },
    /// Set the Markdown description. An empty description clears it.
    SetDescription { id: String, description: String },
}

/// The two operations editors need from whatever owns the tree.
pub trait RuleStore {
    /// The tree as it is right now.
    fn snapshot(&self) -> &RuleRoot;

    /// Apply one edit.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownItem` if no item has the mutation's id.
    fn apply(&mut self, mutation: Mutation) -> Result<()>;
}

/// An owned in-memory rule tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulesStore {
    root: RuleRoot,
}

impl RulesStore {
    /// Wrap a tree, rejecting duplicate ids.
    pub fn new(root: RuleRoot) -> Result<Self> {
        if let Some(id) = root.duplicate_ids().into_iter().next() {
            return Err(Error::DuplicateId(id));
        }
        Ok(Self { root })
    }

    pub fn into_root(self) -> RuleRoot {
        self.root
    }
}

impl RuleStore for RulesStore {
    fn snapshot(&self) -> &RuleRoot {
        &self.root
    }

    fn apply(&mut self, mutation: Mutation) -> Result<()> {
        match mutation {
            Mutation::SetTitle { id, title } => {
                let item = self
                    .root
                    .find_mut(&id)
                    .ok_or_else(|| Error::UnknownItem(id.clone()))?;
                match item {
                    RuleItem::Group(group) => group.title = title,
                    RuleItem::Rule(rule) => rule.title = non_empty(title),
                }
                debug!("Set title of '{}'", id);
            }
            Mutation::SetDescription { id, description } => {
                let item = self
                    .root
                    .find_mut(&id)
                    .ok_or_else(|| Error::UnknownItem(id.clone()))?;
                let description = non_empty(description);
                match item {
                    RuleItem::Group(group) => group.description = description,
                    RuleItem::Rule(rule) => rule.description = description,
                }
                debug!("Set description of '{}'", id);
            }
        }
        Ok(())
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serialization
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize a tree to the JSON payload embedded in exported docs.
pub fn serialize_tree(root: &RuleRoot) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(root)?)
}

/// Turn an extracted payload back into a tree.
///
/// # Errors
///
/// - `Error::RulesParse` if the payload is not a rule tree
/// - `Error::DuplicateId` if two items share an id
pub fn load_rules_payload(payload: serde_json::Value) -> Result<RulesStore> {
    let root: RuleRoot = serde_json::from_value(payload).map_err(|e| Error::RulesParse {
        message: format!("Not a rule tree: {}", e),
        source: Some(e),
    })?;
    RulesStore::new(root)
}

// ─────────────────────────────────────────────────────────────────────────────
// Files
// ─────────────────────────────────────────────────────────────────────────────

/// Load a rules file (pretty JSON of the serialized tree).
pub fn load_rules_file(path: &Path) -> Result<RulesStore> {
    debug!("Loading rules from: {}", path.display());
    let contents = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let payload: serde_json::Value = serde_json::from_str(&contents)?;
    load_rules_payload(payload)
}

/// Save a tree as a rules file.
///
/// Writes to a sibling temporary file first, then renames it over the target.
pub fn save_rules_file(path: &Path, root: &RuleRoot) -> Result<()> {
    let json = serde_json::to_string_pretty(root)?;
    write_atomic(path, &json)?;
    info!("Rules saved to {}", path.display());
    Ok(())
}

/// Write `contents` to `path` via a temporary sibling and a rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents).map_err(|e| Error::FileWrite {
        path: temp_path.clone(),
        source: e,
    })?;
    fs::rename(&temp_path, path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
