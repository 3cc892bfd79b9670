//! ruledocs - documentation for HTTP mock rule trees
//!
//! A rule tree is an ordered hierarchy of groups and rules. This crate turns
//! such a tree into a readable Markdown document that also carries the full
//! rules data, reads that data back from docs or raw JSON, and keeps rule
//! descriptions editable as rendered Markdown.
//!
//! # Modules
//!
//! - [`rules`] - The tree model, traversal, summaries and the rule store
//! - [`export`] - Markdown and HTML docs export, and import
//! - [`markdown`] - The live Markdown editor and its codec and surface seams
//! - [`docs`] - Editing state of the docs page
//! - [`config`] - User settings and their persistence
//! - [`error`] - Crate-wide error type

pub mod config;
pub mod docs;
pub mod error;
pub mod export;
pub mod markdown;
pub mod rules;

pub use error::{Error, Result};
