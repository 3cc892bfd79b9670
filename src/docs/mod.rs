//! Rules docs page
//!
//! Editing state for browsing the rule tree and documenting its groups and
//! rules with live Markdown descriptions.

pub mod session;

pub use session::DocsSession;
