//! Rule tree module for ruledocs
//!
//! This module holds the rule tree data model, the shared pre-order
//! traversal, rule summaries, and the store that owns a tree and applies
//! field-level edits to it.
//!
//! # Architecture
//!
//! - `tree.rs` - Root/Group/Rule model, `visit`, mock classification
//! - `describe.rs` - Matcher and step summaries
//! - `store.rs` - Snapshot + mutation API and rules file persistence

pub mod describe;
pub mod store;
pub mod tree;

pub use describe::{DefaultDescriber, RuleDescriber};
pub use store::{
    load_rules_file, load_rules_payload, save_rules_file, serialize_tree, Mutation, RuleStore,
    RulesStore,
};
pub use tree::{is_mock_rule, visit, Rule, RuleDocNode, RuleGroup, RuleItem, RulePart, RuleRoot};
