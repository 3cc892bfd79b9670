//! Editing surfaces
//!
//! A surface owns the formatted content the user sees and types into. The
//! editor treats that content as opaque: it reads it, replaces it, and asks
//! for focus, nothing more.

/// A display surface holding formatted content.
pub trait EditSurface {
    type Content;

    /// The content currently on screen, including unsaved user edits.
    fn content(&self) -> &Self::Content;

    /// Replace the displayed content programmatically.
    ///
    /// Surfaces may reset cursor position and undo history when this is
    /// called; callers should only do so when the content really changed.
    fn replace_content(&mut self, content: Self::Content);

    /// Give the surface input focus.
    fn focus(&mut self);
}

/// An in-memory surface with a cursor and undo history.
///
/// Used by the command line tool and tests in place of an on-screen widget.
#[derive(Debug, Clone, Default)]
pub struct BufferSurface<T> {
    content: T,
    cursor: usize,
    undo: Vec<T>,
    focused: bool,
    replacements: usize,
}

impl<T: Clone + Default> BufferSurface<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a user edit: the old content goes on the undo stack and the
    /// cursor moves to `cursor`.
    pub fn type_content(&mut self, content: T, cursor: usize) {
        let previous = std::mem::replace(&mut self.content, content);
        self.undo.push(previous);
        self.cursor = cursor;
    }

    /// Revert the last user edit. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some(previous) => {
                self.content = previous;
                true
            }
            None => false,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// How many times the content was replaced programmatically.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl<T: Clone + Default> EditSurface for BufferSurface<T> {
    type Content = T;

    fn content(&self) -> &T {
        &self.content
    }

    fn replace_content(&mut self, content: T) {
        self.content = content;
        self.cursor = 0;
        self.undo.clear();
        self.replacements += 1;
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_keeps_history() {
        let mut surface = BufferSurface::<String>::new();
        surface.type_content("a".to_string(), 1);
        surface.type_content("ab".to_string(), 2);

        assert_eq!(surface.content(), "ab");
        assert_eq!(surface.cursor(), 2);
        assert_eq!(surface.undo_depth(), 2);

        assert!(surface.undo());
        assert_eq!(surface.content(), "a");
    }

    #[test]
    fn test_replace_resets_cursor_and_history() {
        let mut surface = BufferSurface::<String>::new();
        surface.type_content("typed".to_string(), 5);
        surface.replace_content("<p>new</p>".to_string());

        assert_eq!(surface.cursor(), 0);
        assert_eq!(surface.undo_depth(), 0);
        assert_eq!(surface.replacements(), 1);
        assert!(!surface.undo());
    }

    #[test]
    fn test_focus() {
        let mut surface = BufferSurface::<String>::new();
        assert!(!surface.is_focused());
        surface.focus();
        assert!(surface.is_focused());
    }
}
