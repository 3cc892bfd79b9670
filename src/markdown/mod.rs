//! Markdown rendering and live editing module
//!
//! This module provides the live "what you see is Markdown" editor used to
//! author group and rule descriptions, together with the conversions it
//! relies on.
//!
//! # Features
//! - Render Markdown to HTML with comrak (GFM tables, strikethrough, task lists)
//! - Convert edited HTML back to Markdown with htmd
//! - Keep a formatted surface and a Markdown value in sync without resetting
//!   the cursor or looping on its own changes
//!
//! # Architecture
//!
//! - `codec.rs` - `ContentCodec` trait and the comrak/htmd `HtmlCodec`
//! - `surface.rs` - `EditSurface` trait and the in-memory `BufferSurface`
//! - `editor.rs` - `LiveMarkdownEditor`

pub mod codec;
pub mod editor;
pub mod surface;

pub use codec::{comrak_options, ContentCodec, HtmlCodec};
pub use editor::LiveMarkdownEditor;
pub use surface::{BufferSurface, EditSurface};
