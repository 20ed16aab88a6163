//! The mounted tree plus focus and text selection
//!
//! Focus is held by key, so it can be carried from one tree to the next. A
//! selection only exists while a text input is focused.

use super::node::Node;

/// Char offsets inside a text input's value; `start == end` is a caret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Clamp both ends to `len` chars
    pub fn clamped(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

/// Focus captured before a tree is discarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSnapshot {
    pub key: String,
    /// Present only when the focused node was a text input
    pub selection: Option<Selection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Focus {
    key: String,
    selection: Option<Selection>,
}

#[derive(Debug, Default)]
pub struct Document {
    root: Option<Node>,
    focus: Option<Focus>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> Option<&mut Node> {
        self.root.as_mut()
    }

    /// Record what is focused and, for a text input, its selection
    pub fn capture(&self) -> Option<FocusSnapshot> {
        let focus = self.focus.as_ref()?;
        let is_input = self.find(&focus.key).is_some_and(Node::is_text_input);
        Some(FocusSnapshot {
            key: focus.key.clone(),
            selection: if is_input { focus.selection } else { None },
        })
    }

    /// Drop the mounted tree and with it any focus
    pub fn clear(&mut self) {
        self.root = None;
        self.focus = None;
    }

    /// Mount `root` as the only tree. Nothing is focused afterwards.
    pub fn mount(&mut self, root: Node) {
        self.root = Some(root);
        self.focus = None;
    }

    /// Put focus back where `snapshot` says. Returns `false` when the key is
    /// gone from the current tree, in which case focus is left alone.
    pub fn restore(&mut self, snapshot: &FocusSnapshot) -> bool {
        let Some(node) = self.find(&snapshot.key) else {
            return false;
        };
        let selection = match (node.input_value(), snapshot.selection) {
            (Some(value), Some(selection)) => Some(selection.clamped(value.chars().count())),
            (Some(value), None) => Some(Selection::caret(value.chars().count())),
            (None, _) => None,
        };
        self.focus = Some(Focus {
            key: snapshot.key.clone(),
            selection,
        });
        true
    }

    /// First node in tree order that asked for focus
    pub fn autofocus_key(&self) -> Option<String> {
        let mut found = None;
        if let Some(root) = &self.root {
            root.walk(&mut |node| {
                if found.is_none() && node.autofocus && node.key.is_some() {
                    found = node.key.clone();
                }
            });
        }
        found
    }

    pub fn find(&self, key: &str) -> Option<&Node> {
        self.root.as_ref()?.find(key)
    }

    /// Keys of focusable nodes in tree order
    pub fn focusable_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Some(root) = &self.root {
            root.walk(&mut |node| {
                if node.is_focusable() {
                    if let Some(key) = &node.key {
                        keys.push(key.clone());
                    }
                }
            });
        }
        keys
    }

    /// Focus `key`; text inputs get a caret at the end of their value
    pub fn focus(&mut self, key: &str) -> bool {
        let Some(node) = self.find(key) else {
            return false;
        };
        let selection = node
            .input_value()
            .map(|value| Selection::caret(value.chars().count()));
        self.focus = Some(Focus {
            key: key.to_string(),
            selection,
        });
        true
    }

    pub fn blur(&mut self) {
        self.focus = None;
    }

    pub fn focused_key(&self) -> Option<&str> {
        self.focus.as_ref().map(|f| f.key.as_str())
    }

    pub fn focused_node(&self) -> Option<&Node> {
        self.find(self.focused_key()?)
    }

    pub fn selection(&self) -> Option<Selection> {
        self.focus.as_ref()?.selection
    }

    /// Move the selection of the focused text input
    pub fn set_selection(&mut self, selection: Selection) -> bool {
        let is_input = self.focused_node().is_some_and(Node::is_text_input);
        match &mut self.focus {
            Some(focus) if is_input => {
                focus.selection = Some(selection);
                true
            }
            _ => false,
        }
    }

    pub fn focus_next(&mut self) -> bool {
        self.step_focus(1)
    }

    pub fn focus_prev(&mut self) -> bool {
        self.step_focus(-1)
    }

    fn step_focus(&mut self, delta: isize) -> bool {
        let keys = self.focusable_keys();
        if keys.is_empty() {
            return false;
        }

        let len = keys.len() as isize;
        let current = self
            .focused_key()
            .and_then(|key| keys.iter().position(|k| k == key));
        let next = match current {
            Some(i) => (i as isize + delta).rem_euclid(len),
            None if delta >= 0 => 0,
            None => len - 1,
        };
        let key = keys[next as usize].clone();
        self.focus(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medqueue_app::{Binding, Message};
    use medqueue_core::DraftField;

    fn tree(name: &str) -> Node {
        Node::column(vec![
            Node::input("name", "Name", Binding::Draft(DraftField::Name), name),
            Node::input("age", "Age", Binding::Draft(DraftField::Age), "34").autofocus(),
            Node::button("next", "Next", Message::SubmitDetails),
        ])
    }

    fn mounted(name: &str) -> Document {
        let mut doc = Document::new();
        doc.mount(tree(name));
        doc
    }

    #[test]
    fn test_focus_puts_caret_at_end() {
        let mut doc = mounted("Asha");
        assert!(doc.focus("name"));
        assert_eq!(doc.selection(), Some(Selection::caret(4)));
    }

    #[test]
    fn test_button_focus_has_no_selection() {
        let mut doc = mounted("Asha");
        doc.focus("next");
        assert_eq!(doc.selection(), None);
        assert!(!doc.set_selection(Selection::caret(0)));
    }

    #[test]
    fn test_capture_records_selection_for_inputs_only() {
        let mut doc = mounted("Asha");
        doc.focus("name");
        doc.set_selection(Selection::new(1, 3));
        assert_eq!(
            doc.capture(),
            Some(FocusSnapshot {
                key: "name".into(),
                selection: Some(Selection::new(1, 3)),
            })
        );

        doc.focus("next");
        assert_eq!(doc.capture().unwrap().selection, None);
    }

    #[test]
    fn test_restore_into_new_tree() {
        let mut doc = mounted("Asha");
        doc.focus("name");
        doc.set_selection(Selection::new(1, 3));
        let snapshot = doc.capture().unwrap();

        doc.clear();
        assert!(doc.focused_key().is_none());
        doc.mount(tree("Asha K"));
        assert!(doc.restore(&snapshot));

        assert_eq!(doc.focused_key(), Some("name"));
        assert_eq!(doc.selection(), Some(Selection::new(1, 3)));
    }

    #[test]
    fn test_restore_missing_key_leaves_nothing_focused() {
        let mut doc = Document::new();
        doc.mount(Node::column(vec![Node::text("gone")]));

        let snapshot = FocusSnapshot {
            key: "name".into(),
            selection: Some(Selection::caret(2)),
        };
        assert!(!doc.restore(&snapshot));
        assert!(doc.focused_key().is_none());
    }

    #[test]
    fn test_restore_clamps_selection_to_shorter_value() {
        let mut doc = mounted("A");
        let snapshot = FocusSnapshot {
            key: "name".into(),
            selection: Some(Selection::new(2, 5)),
        };
        doc.restore(&snapshot);
        assert_eq!(doc.selection(), Some(Selection::caret(1)));
    }

    #[test]
    fn test_autofocus_key() {
        assert_eq!(mounted("").autofocus_key().as_deref(), Some("age"));
    }

    #[test]
    fn test_focus_cycles_in_tree_order() {
        let mut doc = mounted("");
        doc.focus_next();
        assert_eq!(doc.focused_key(), Some("name"));
        doc.focus_next();
        doc.focus_next();
        assert_eq!(doc.focused_key(), Some("next"));
        doc.focus_next();
        assert_eq!(doc.focused_key(), Some("name"));
        doc.focus_prev();
        assert_eq!(doc.focused_key(), Some("next"));
    }

    #[test]
    fn test_selection_normalises_order() {
        assert_eq!(Selection::new(5, 2), Selection::new(2, 5));
        assert!(Selection::caret(3).is_caret());
    }
}
