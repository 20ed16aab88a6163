//! Key routing: turns a key press into a message against the mounted document
//!
//! Focus and caret moves only touch the document. Text edits update the caret
//! first and then return an `Input` message; the re-render that follows
//! carries the new caret over to the fresh tree.

use medqueue_app::{AppState, Binding, InputKey, Message};

use crate::view::{Document, Node, NodeKind, Selection};

/// Route `key`; returns the message to dispatch, if any
pub fn handle_key(key: InputKey, document: &mut Document, state: &AppState) -> Option<Message> {
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }

    if state.is_blocked() {
        return matches!(key, InputKey::Enter | InputKey::Esc).then_some(Message::DismissNotice);
    }

    match key {
        InputKey::Tab | InputKey::Down => {
            document.focus_next();
            return None;
        }
        InputKey::BackTab | InputKey::Up => {
            document.focus_prev();
            return None;
        }
        InputKey::Esc => return Some(Message::Back),
        _ => {}
    }

    let Some(target) = document.focused_node().map(Target::of) else {
        // Nothing focused yet: the first Enter or arrow picks something
        if matches!(key, InputKey::Enter | InputKey::Right | InputKey::Left) {
            document.focus_next();
        }
        return None;
    };

    match target {
        Target::Input(edit) => edit.apply(key, document),
        Target::Button(action) => match key {
            InputKey::Enter | InputKey::Char(' ') => action,
            InputKey::Right => {
                document.focus_next();
                None
            }
            InputKey::Left => {
                document.focus_prev();
                None
            }
            _ => None,
        },
        Target::Other => None,
    }
}

/// What the focused node can do, detached from the document borrow
enum Target {
    Input(InputEdit),
    /// `None` while the button is disabled
    Button(Option<Message>),
    Other,
}

impl Target {
    fn of(node: &Node) -> Self {
        match &node.kind {
            NodeKind::Input {
                binding,
                value,
                numeric,
                submit,
                ..
            } => Target::Input(InputEdit {
                binding: *binding,
                value: value.clone(),
                numeric: *numeric,
                submit: submit.clone(),
            }),
            NodeKind::Button {
                action, enabled, ..
            } => Target::Button(enabled.then(|| action.clone())),
            _ => Target::Other,
        }
    }
}

struct InputEdit {
    binding: Binding,
    value: String,
    numeric: bool,
    submit: Option<Message>,
}

impl InputEdit {
    fn apply(self, key: InputKey, document: &mut Document) -> Option<Message> {
        let len = self.value.chars().count();
        let sel = document
            .selection()
            .unwrap_or(Selection::caret(len))
            .clamped(len);

        let (value, caret) = match key {
            InputKey::Char(c) => {
                if self.numeric && !c.is_ascii_digit() {
                    return None;
                }
                (splice(&self.value, sel, &c.to_string()), sel.start + 1)
            }
            InputKey::Backspace => {
                if !sel.is_caret() {
                    (splice(&self.value, sel, ""), sel.start)
                } else if sel.start > 0 {
                    let range = Selection::new(sel.start - 1, sel.start);
                    (splice(&self.value, range, ""), sel.start - 1)
                } else {
                    return None;
                }
            }
            InputKey::Delete => {
                if !sel.is_caret() {
                    (splice(&self.value, sel, ""), sel.start)
                } else if sel.start < len {
                    let range = Selection::new(sel.start, sel.start + 1);
                    (splice(&self.value, range, ""), sel.start)
                } else {
                    return None;
                }
            }
            InputKey::Left => {
                let at = if sel.is_caret() {
                    sel.start.saturating_sub(1)
                } else {
                    sel.start
                };
                document.set_selection(Selection::caret(at));
                return None;
            }
            InputKey::Right => {
                let at = if sel.is_caret() {
                    (sel.end + 1).min(len)
                } else {
                    sel.end
                };
                document.set_selection(Selection::caret(at));
                return None;
            }
            InputKey::Home => {
                document.set_selection(Selection::caret(0));
                return None;
            }
            InputKey::End => {
                document.set_selection(Selection::caret(len));
                return None;
            }
            InputKey::Enter => {
                if self.submit.is_none() {
                    document.focus_next();
                }
                return self.submit;
            }
            _ => return None,
        };

        document.set_selection(Selection::caret(caret));
        Some(Message::Input {
            binding: self.binding,
            value,
        })
    }
}

/// Replace the chars in `range` with `insert`
fn splice(value: &str, range: Selection, insert: &str) -> String {
    let start = byte_offset(value, range.start);
    let end = byte_offset(value, range.end);
    let mut out = String::with_capacity(value.len() + insert.len());
    out.push_str(&value[..start]);
    out.push_str(insert);
    out.push_str(&value[end..]);
    out
}

fn byte_offset(value: &str, chars: usize) -> usize {
    value
        .char_indices()
        .nth(chars)
        .map_or(value.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medqueue_app::{Notice, NoticeLevel};
    use medqueue_core::DraftField;

    fn doc(value: &str) -> Document {
        let mut doc = Document::new();
        doc.mount(Node::column(vec![
            Node::input("name", "Name", Binding::Draft(DraftField::Name), value),
            Node::input("age", "Age", Binding::Draft(DraftField::Age), "").numeric(),
            Node::input("addr", "Address", Binding::Address, "")
                .on_submit(Message::SubmitAddress),
            Node::button("next", "Next", Message::SubmitDetails),
            Node::button("off", "Off", Message::Back).enabled(false),
        ]));
        doc
    }

    fn input(value: &str) -> Option<Message> {
        Some(Message::Input {
            binding: Binding::Draft(DraftField::Name),
            value: value.to_string(),
        })
    }

    fn press(doc: &mut Document, key: InputKey) -> Option<Message> {
        handle_key(key, doc, &AppState::new())
    }

    #[test]
    fn test_typing_appends_at_caret() {
        let mut doc = doc("As");
        doc.focus("name");
        assert_eq!(press(&mut doc, InputKey::Char('h')), input("Ash"));
        assert_eq!(doc.selection(), Some(Selection::caret(3)));
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut doc = doc("Asha");
        doc.focus("name");
        doc.set_selection(Selection::new(1, 3));
        assert_eq!(press(&mut doc, InputKey::Char('x')), input("Axa"));
        assert_eq!(doc.selection(), Some(Selection::caret(2)));
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut doc = doc("Asha");
        doc.focus("name");
        assert_eq!(press(&mut doc, InputKey::Backspace), input("Ash"));

        doc.set_selection(Selection::caret(0));
        assert_eq!(press(&mut doc, InputKey::Backspace), None);
        assert_eq!(press(&mut doc, InputKey::Delete), input("sha"));
    }

    #[test]
    fn test_caret_moves_without_messages() {
        let mut doc = doc("Asha");
        doc.focus("name");
        assert_eq!(press(&mut doc, InputKey::Left), None);
        assert_eq!(doc.selection(), Some(Selection::caret(3)));
        press(&mut doc, InputKey::Home);
        assert_eq!(doc.selection(), Some(Selection::caret(0)));
        press(&mut doc, InputKey::Right);
        assert_eq!(doc.selection(), Some(Selection::caret(1)));
        press(&mut doc, InputKey::End);
        assert_eq!(doc.selection(), Some(Selection::caret(4)));
    }

    #[test]
    fn test_multibyte_edit() {
        let mut doc = doc("Zoë");
        doc.focus("name");
        assert_eq!(press(&mut doc, InputKey::Backspace), input("Zo"));
    }

    #[test]
    fn test_numeric_input_rejects_letters() {
        let mut doc = doc("");
        doc.focus("age");
        assert_eq!(press(&mut doc, InputKey::Char('x')), None);
        assert_eq!(
            press(&mut doc, InputKey::Char('4')),
            Some(Message::Input {
                binding: Binding::Draft(DraftField::Age),
                value: "4".into(),
            })
        );
    }

    #[test]
    fn test_enter_submits_or_moves_on() {
        let mut doc = doc("");
        doc.focus("name");
        assert_eq!(press(&mut doc, InputKey::Enter), None);
        assert_eq!(doc.focused_key(), Some("age"));

        doc.focus("addr");
        assert_eq!(press(&mut doc, InputKey::Enter), Some(Message::SubmitAddress));
    }

    #[test]
    fn test_buttons_activate_when_enabled() {
        let mut doc = doc("");
        doc.focus("next");
        assert_eq!(press(&mut doc, InputKey::Enter), Some(Message::SubmitDetails));
        assert_eq!(press(&mut doc, InputKey::Char(' ')), Some(Message::SubmitDetails));

        doc.focus("off");
        assert_eq!(press(&mut doc, InputKey::Enter), None);
    }

    #[test]
    fn test_tab_skips_disabled_buttons() {
        let mut doc = doc("");
        doc.focus("next");
        press(&mut doc, InputKey::Tab);
        assert_eq!(doc.focused_key(), Some("name"));
        press(&mut doc, InputKey::BackTab);
        assert_eq!(doc.focused_key(), Some("next"));
    }

    #[test]
    fn test_escape_goes_back_and_ctrl_c_quits() {
        let mut doc = doc("");
        assert_eq!(press(&mut doc, InputKey::Esc), Some(Message::Back));
        assert_eq!(press(&mut doc, InputKey::CharCtrl('c')), Some(Message::Quit));
    }

    #[test]
    fn test_blocking_notice_swallows_keys() {
        let mut state = AppState::new();
        state.notice = Some(Notice::error("Geolocation denied").blocking());
        assert_eq!(state.notice.as_ref().unwrap().level, NoticeLevel::Error);

        let mut doc = doc("Asha");
        doc.focus("name");
        assert_eq!(handle_key(InputKey::Char('x'), &mut doc, &state), None);
        assert_eq!(handle_key(InputKey::Tab, &mut doc, &state), None);
        assert_eq!(doc.focused_key(), Some("name"));
        assert_eq!(
            handle_key(InputKey::Enter, &mut doc, &state),
            Some(Message::DismissNotice)
        );
        assert_eq!(
            handle_key(InputKey::CharCtrl('c'), &mut doc, &state),
            Some(Message::Quit)
        );
    }
}
