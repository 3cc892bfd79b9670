//! Live Markdown Editor
//!
//! An editor that shows rendered Markdown and lets the user edit it in
//! place, while its contract with the caller is always a Markdown string.
//!
//! Two directions are kept in sync:
//!
//! - **Inbound** ([`LiveMarkdownEditor::sync_inbound`]): the caller supplies
//!   a possibly new Markdown value. If it differs from the last value this
//!   editor committed, the surface is re-rendered; otherwise the surface is
//!   left alone so cursor position and undo history survive.
//! - **Outbound** ([`LiveMarkdownEditor::handle_input`]): after a user edit,
//!   the surface content is converted back to Markdown and handed to the
//!   caller. A failed conversion changes nothing.
//!
//! Inbound sync never produces an outbound change, so a caller that writes
//! every emitted value back and re-shows the editor with it does not loop.
//!
//! # Example
//!
//! ```ignore
//! let mut editor = LiveMarkdownEditor::new(BufferSurface::new(), HtmlCodec::default())
//!     .placeholder("Describe this rule…");
//! editor.show(&description);
//!
//! // on every input event from the surface
//! if let Some(markdown) = editor.handle_input() {
//!     store.apply(Mutation::SetDescription { id, description: markdown })?;
//! }
//! ```

use super::codec::ContentCodec;
use super::surface::EditSurface;
use log::debug;

/// Keeps a surface's formatted content and a Markdown value in sync.
pub struct LiveMarkdownEditor<S, C> {
    surface: S,
    codec: C,
    /// Markdown most recently rendered into or read out of the surface.
    /// `None` until the first sync, so the first `show` always renders.
    last_committed: Option<String>,
    placeholder: Option<String>,
    activated: bool,
}

impl<S, C> LiveMarkdownEditor<S, C>
where
    C: ContentCodec,
    S: EditSurface<Content = C::Content>,
{
    /// Create an editor over a surface. Nothing is rendered until [`show`](Self::show).
    pub fn new(surface: S, codec: C) -> Self {
        Self {
            surface,
            codec,
            last_committed: None,
            placeholder: None,
            activated: false,
        }
    }

    /// Set the hint shown while the editor is empty.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Reflect `value`. Focuses the surface the first time it is called.
    ///
    /// Returns whether the surface content was replaced.
    pub fn show(&mut self, value: &str) -> bool {
        if !self.activated {
            self.activated = true;
            self.surface.focus();
        }
        self.sync_inbound(value)
    }

    /// Re-render the surface if `value` differs from the last committed value.
    ///
    /// Returns whether the surface content was replaced.
    pub fn sync_inbound(&mut self, value: &str) -> bool {
        if self.last_committed.as_deref() == Some(value) {
            return false;
        }

        let content = if value.trim().is_empty() {
            self.codec.empty()
        } else {
            self.codec.to_formatted(value)
        };
        self.surface.replace_content(content);
        self.last_committed = Some(value.to_string());
        debug!("Live editor re-rendered from new value ({} bytes)", value.len());
        true
    }

    /// Handle a user edit event on the surface.
    ///
    /// Returns the Markdown to hand to the caller, or `None` if the content
    /// could not be converted, in which case nothing changes.
    pub fn handle_input(&mut self) -> Option<String> {
        let content = self.surface.content();

        if self.codec.is_blank(content) {
            self.last_committed = Some(String::new());
            return Some(String::new());
        }

        match self.codec.to_markdown(content) {
            Ok(markdown) => {
                self.last_committed = Some(markdown.clone());
                Some(markdown)
            }
            Err(e) => {
                debug!("Keeping previous value, conversion failed: {}", e);
                None
            }
        }
    }

    /// The placeholder, if one is set and the surface is empty.
    pub fn placeholder_visible(&self) -> Option<&str> {
        if self.codec.is_blank(self.surface.content()) {
            self.placeholder.as_deref()
        } else {
            None
        }
    }

    /// The last Markdown this editor rendered or emitted.
    pub fn last_committed(&self) -> Option<&str> {
        self.last_committed.as_deref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The surface, for delivering user edits to it.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
