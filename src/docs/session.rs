//! Docs page editing session
//!
//! This module defines `DocsSession`, the state behind the rules docs page:
//! which item is selected, whether its description is being edited, and
//! which item (if any) is shown fullscreen.
//!
//! The session never owns the rule tree. Every operation takes the store,
//! reads the current values from its snapshot and writes changes back as
//! `Mutation`s, so the store stays the single source of truth.

use crate::error::{Error, Result};
use crate::markdown::{ContentCodec, EditSurface, LiveMarkdownEditor};
use crate::rules::{Mutation, RuleDocNode, RuleRoot, RuleStore};
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Session State
// ─────────────────────────────────────────────────────────────────────────────

/// Editing state of the docs page.
pub struct DocsSession<S, C> {
    /// Id of the selected group or rule
    selected: Option<String>,
    /// Open description editor, bound to the selected item
    editor: Option<LiveMarkdownEditor<S, C>>,
    /// Id of the item shown in the fullscreen view
    fullscreen: Option<String>,
    /// Hint for empty description editors
    placeholder: Option<String>,
}

impl<S, C> Default for DocsSession<S, C> {
    fn default() -> Self {
        Self {
            selected: None,
            editor: None,
            fullscreen: None,
            placeholder: None,
        }
    }
}

impl<S, C> DocsSession<S, C>
where
    C: ContentCodec,
    S: EditSurface<Content = C::Content>,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder used by description editors.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Select an item. Any open description editor is closed.
    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        debug!("Selected docs item '{}'", id);
        self.selected = Some(id);
        self.editor = None;
    }

    /// Deselect the current item and close its editor.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.editor = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Resolve the selection against a tree snapshot.
    pub fn selected_node<'a>(&self, root: &'a RuleRoot) -> Option<RuleDocNode<'a>> {
        self.selected.as_deref().and_then(|id| root.find(id))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Title
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the selected item's title from the title field text.
    pub fn set_title(&self, store: &mut impl RuleStore, text: &str) -> Result<()> {
        let id = self.require_selection()?;
        store.apply(Mutation::SetTitle {
            id: id.to_string(),
            title: text.to_string(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Description Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Open a live editor on the selected item's description.
    ///
    /// Replaces any editor that was already open.
    pub fn begin_edit_description(
        &mut self,
        store: &impl RuleStore,
        surface: S,
        codec: C,
    ) -> Result<()> {
        let value = self.current_description(store)?;
        let mut editor = LiveMarkdownEditor::new(surface, codec);
        if let Some(placeholder) = &self.placeholder {
            editor = editor.placeholder(placeholder.clone());
        }
        editor.show(&value);
        self.editor = Some(editor);
        Ok(())
    }

    /// Route a user edit in the description editor into the store.
    ///
    /// Returns whether a new description was stored. A failed conversion
    /// leaves the store untouched.
    pub fn description_input(&mut self, store: &mut impl RuleStore) -> Result<bool> {
        let id = self.require_selection()?.to_string();
        let Some(editor) = self.editor.as_mut() else {
            return Ok(false);
        };
        match editor.handle_input() {
            Some(markdown) => {
                store.apply(Mutation::SetDescription {
                    id,
                    description: markdown,
                })?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-show the open editor with the store's current description.
    ///
    /// Returns whether the editor content was replaced, which only happens
    /// when the description changed outside this editor.
    pub fn refresh(&mut self, store: &impl RuleStore) -> Result<bool> {
        if self.editor.is_none() {
            return Ok(false);
        }
        let value = self.current_description(store)?;
        Ok(self
            .editor
            .as_mut()
            .map(|editor| editor.show(&value))
            .unwrap_or(false))
    }

    /// Close the description editor.
    pub fn end_edit_description(&mut self) {
        self.editor = None;
    }

    pub fn is_editing_description(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editor(&self) -> Option<&LiveMarkdownEditor<S, C>> {
        self.editor.as_ref()
    }

    /// The open editor, for delivering user edits to its surface.
    pub fn editor_mut(&mut self) -> Option<&mut LiveMarkdownEditor<S, C>> {
        self.editor.as_mut()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fullscreen View
    // ─────────────────────────────────────────────────────────────────────────

    /// Show an item fullscreen.
    ///
    /// Returns `Error::UnknownItem` if the store has no item with `id`.
    pub fn open_fullscreen(&mut self, store: &impl RuleStore, id: &str) -> Result<()> {
        if store.snapshot().find(id).is_none() {
            return Err(Error::UnknownItem(id.to_string()));
        }
        self.fullscreen = Some(id.to_string());
        Ok(())
    }

    pub fn close_fullscreen(&mut self) {
        self.fullscreen = None;
    }

    pub fn fullscreen(&self) -> Option<&str> {
        self.fullscreen.as_deref()
    }

    /// Handle the Escape key. Only the fullscreen view reacts to it.
    ///
    /// Returns whether anything was closed.
    pub fn handle_escape(&mut self) -> bool {
        self.fullscreen.take().is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn require_selection(&self) -> Result<&str> {
        self.selected
            .as_deref()
            .ok_or_else(|| Error::Application("No item selected".to_string()))
    }

    fn current_description(&self, store: &impl RuleStore) -> Result<String> {
        let id = self.require_selection()?;
        let node = store
            .snapshot()
            .find(id)
            .ok_or_else(|| Error::UnknownItem(id.to_string()))?;
        Ok(node.description().unwrap_or_default().to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{BufferSurface, HtmlCodec};
    use crate::rules::{Rule, RuleGroup, RuleItem, RulesStore};

    type Session = DocsSession<BufferSurface<String>, HtmlCodec>;

    fn store() -> RulesStore {
        let mut group = RuleGroup::new("g1", "Payments");
        group.description = Some("Handles **card** payments".to_string());
        let mut rule = Rule::new("r1", "http");
        rule.title = Some("Charge".to_string());
        group.items.push(rule.into());
        RulesStore::new(RuleRoot::new(vec![group.into()])).unwrap()
    }

    fn description_of(store: &RulesStore, id: &str) -> Option<String> {
        store
            .snapshot()
            .find(id)
            .and_then(|node| node.description().map(str::to_string))
    }

    fn type_html(session: &mut Session, html: &str) {
        session
            .editor_mut()
            .expect("editor open")
            .surface_mut()
            .type_content(html.to_string(), html.len());
    }

    #[test]
    fn test_select_closes_editor() {
        let store = store();
        let mut session = Session::new();
        session.select("g1");
        session
            .begin_edit_description(&store, BufferSurface::new(), HtmlCodec::default())
            .unwrap();
        assert!(session.is_editing_description());

        session.select("r1");
        assert_eq!(session.selected(), Some("r1"));
        assert!(!session.is_editing_description());

        session.clear_selection();
        assert_eq!(session.selected(), None);
        assert!(session.selected_node(store.snapshot()).is_none());
    }

    #[test]
    fn test_set_title_semantics() {
        let mut store = store();
        let mut session = Session::new();

        session.select("g1");
        session.set_title(&mut store, "").unwrap();
        assert_eq!(session.selected_node(store.snapshot()).unwrap().title(), Some(""));

        session.select("r1");
        session.set_title(&mut store, "").unwrap();
        assert_eq!(session.selected_node(store.snapshot()).unwrap().title(), None);

        session.set_title(&mut store, "Refund").unwrap();
        match store.snapshot().find("r1") {
            Some(RuleDocNode::Rule(rule)) => assert_eq!(rule.title.as_deref(), Some("Refund")),
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_set_title_requires_selection() {
        let mut store = store();
        let session = Session::new();
        assert!(matches!(
            session.set_title(&mut store, "x"),
            Err(Error::Application(_))
        ));
    }

    #[test]
    fn test_begin_edit_renders_current_description() {
        let store = store();
        let mut session = Session::new().placeholder("Markdown here…");
        session.select("g1");
        session
            .begin_edit_description(&store, BufferSurface::new(), HtmlCodec::default())
            .unwrap();

        let editor = session.editor().unwrap();
        assert!(editor.surface().content().contains("<strong>card</strong>"));
        assert!(editor.surface().is_focused());
        assert_eq!(editor.placeholder_visible(), None);
    }

    #[test]
    fn test_begin_edit_unknown_item() {
        let store = store();
        let mut session = Session::new();
        session.select("missing");
        let result = session.begin_edit_description(&store, BufferSurface::new(), HtmlCodec::default());
        assert!(matches!(result, Err(Error::UnknownItem(id)) if id == "missing"));
        assert!(!session.is_editing_description());
    }

    #[test]
    fn test_edit_writes_back_and_refresh_keeps_cursor() {
        let mut store = store();
        let mut session = Session::new();
        session.select("r1");
        session
            .begin_edit_description(&store, BufferSurface::new(), HtmlCodec::default())
            .unwrap();

        type_html(&mut session, "<p><em>Refunds</em> only</p>");
        assert!(session.description_input(&mut store).unwrap());
        let stored = description_of(&store, "r1").unwrap();
        assert!(stored.starts_with("*Refunds* only") || stored.starts_with("_Refunds_ only"));

        // Writing back and re-rendering must not disturb the surface
        assert!(!session.refresh(&store).unwrap());
        let surface = session.editor().unwrap().surface();
        assert_eq!(surface.cursor(), "<p><em>Refunds</em> only</p>".len());
        assert_eq!(surface.undo_depth(), 1);
    }

    #[test]
    fn test_external_change_replaces_editor_content() {
        let mut store = store();
        let mut session = Session::new();
        session.select("g1");
        session
            .begin_edit_description(&store, BufferSurface::new(), HtmlCodec::default())
            .unwrap();

        store
            .apply(Mutation::SetDescription {
                id: "g1".to_string(),
                description: "Replaced elsewhere".to_string(),
            })
            .unwrap();

        assert!(session.refresh(&store).unwrap());
        assert!(session
            .editor()
            .unwrap()
            .surface()
            .content()
            .contains("Replaced elsewhere"));
    }

    #[test]
    fn test_clearing_description_removes_it() {
        let mut store = store();
        let mut session = Session::new().placeholder("Markdown here…");
        session.select("g1");
        session
            .begin_edit_description(&store, BufferSurface::new(), HtmlCodec::default())
            .unwrap();

        type_html(&mut session, "<p><br></p>");
        assert!(session.description_input(&mut store).unwrap());
        assert_eq!(description_of(&store, "g1"), None);
        assert_eq!(
            session.editor().unwrap().placeholder_visible(),
            Some("Markdown here…")
        );
    }

    #[test]
    fn test_input_without_editor_is_ignored() {
        let mut store = store();
        let mut session = Session::new();
        session.select("g1");
        assert!(!session.description_input(&mut store).unwrap());
        assert!(!session.refresh(&store).unwrap());
        assert_eq!(
            description_of(&store, "g1").as_deref(),
            Some("Handles **card** payments")
        );
    }

    #[test]
    fn test_end_edit_description() {
        let store = store();
        let mut session = Session::new();
        session.select("g1");
        session
            .begin_edit_description(&store, BufferSurface::new(), HtmlCodec::default())
            .unwrap();
        session.end_edit_description();
        assert!(!session.is_editing_description());
        assert_eq!(session.selected(), Some("g1"));
    }

    #[test]
    fn test_escape_only_closes_fullscreen() {
        let store = store();
        let mut session = Session::new();
        session.select("g1");
        session
            .begin_edit_description(&store, BufferSurface::new(), HtmlCodec::default())
            .unwrap();

        assert!(!session.handle_escape());

        session.open_fullscreen(&store, "r1").unwrap();
        assert_eq!(session.fullscreen(), Some("r1"));
        assert!(session.handle_escape());
        assert_eq!(session.fullscreen(), None);

        // Selection and editor are unaffected
        assert_eq!(session.selected(), Some("g1"));
        assert!(session.is_editing_description());

        session.open_fullscreen(&store, "g1").unwrap();
        session.close_fullscreen();
        assert_eq!(session.fullscreen(), None);
    }

    #[test]
    fn test_open_fullscreen_unknown_item() {
        let store = store();
        let mut session = Session::new();
        session.open_fullscreen(&store, "r1").unwrap();

        let result = session.open_fullscreen(&store, "missing");
        assert!(matches!(result, Err(Error::UnknownItem(id)) if id == "missing"));
        assert_eq!(session.fullscreen(), Some("r1"));
    }

    #[test]
    fn test_selected_node_resolves_items() {
        let store = store();
        let mut session = Session::new();
        session.select("r1");
        let node = session.selected_node(store.snapshot()).unwrap();
        assert!(matches!(node, RuleDocNode::Rule(_)));
        assert!(matches!(
            store.snapshot().items.first(),
            Some(RuleItem::Group(_))
        ));
    }
}
