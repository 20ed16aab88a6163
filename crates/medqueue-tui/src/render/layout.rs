//! Screen layout and node measurement
//!
//! Measuring and painting share these functions so a node always gets the
//! height it was measured at.

use ratatui::layout::{Constraint, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::view::{Node, NodeKind};

pub const HEADER_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 1;
pub const INPUT_HEIGHT: u16 = 3;
pub const BARS_HEIGHT: u16 = 8;
pub const MAP_HEIGHT: u16 = 12;

/// Columns between the children of a row
const ROW_SPACING: u16 = 1;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Title bar (glass container)
    pub header: Rect,
    /// Scrollable document
    pub body: Rect,
    /// Key hints
    pub footer: Rect,
}

pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(FOOTER_HEIGHT),
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        body: chunks[1],
        footer: chunks[2],
    }
}

/// Center a fixed-size rect within an area, clamped to the area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Equal-width slots for `count` children of a row
pub fn row_slots(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    Layout::horizontal(vec![Constraint::Fill(1); count])
        .spacing(ROW_SPACING)
        .split(area)
        .to_vec()
}

/// Rows `node` occupies at `width`
pub fn height(node: &Node, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    match &node.kind {
        NodeKind::Column => column_height(&node.children, width),
        NodeKind::Row => row_slots(Rect::new(0, 0, width, 1), node.children.len())
            .iter()
            .zip(&node.children)
            .map(|(slot, child)| height(child, slot.width))
            .max()
            .unwrap_or(0),
        NodeKind::Card { .. } => 2 + column_height(&node.children, width.saturating_sub(2)),
        NodeKind::Text { .. } => line_count(&text_content(node), width),
        NodeKind::Input { .. } => INPUT_HEIGHT,
        NodeKind::Button { .. } => 1,
        NodeKind::Notice { blocking: true, .. } => 0,
        NodeKind::Notice { message, .. } => line_count(&notice_content(message), width),
        NodeKind::Bars { .. } => BARS_HEIGHT,
        NodeKind::Map { .. } => MAP_HEIGHT,
        NodeKind::Spacer => 1,
    }
}

pub fn column_height(children: &[Node], width: u16) -> u16 {
    children
        .iter()
        .map(|child| height(child, width))
        .fold(0u16, u16::saturating_add)
}

/// Text node contents with its glyph, if any
pub fn text_content(node: &Node) -> String {
    match &node.kind {
        NodeKind::Text { text, icon, .. } => match icon.and_then(|i| i.glyph) {
            Some(glyph) => format!("{glyph} {text}"),
            None => text.clone(),
        },
        _ => String::new(),
    }
}

pub fn notice_content(message: &str) -> String {
    format!("▌ {message}")
}

fn line_count(text: &str, width: u16) -> u16 {
    u16::try_from(wrap(text, width).len()).unwrap_or(u16::MAX)
}

/// Greedy word wrap by display width. Words wider than a line are split.
pub fn wrap(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width);
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split(' ') {
            let word_width = word.width();
            let gap = usize::from(line_width > 0);

            if line_width + gap + word_width <= width {
                if gap == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += gap + word_width;
                continue;
            }

            if line_width > 0 {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            for c in word.chars() {
                let w = c.width().unwrap_or(0);
                if line_width + w > width {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(c);
                line_width += w;
            }
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use medqueue_app::{Binding, Message};
    use medqueue_core::DraftField;

    #[test]
    fn test_create_layout() {
        let areas = create(Rect::new(0, 0, 80, 24));
        assert_eq!(areas.header.height, 3);
        assert_eq!(areas.body.y, 3);
        assert_eq!(areas.body.height, 20);
        assert_eq!(areas.footer.y, 23);
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect(40, 10, area), Rect::new(20, 7, 40, 10));
        assert_eq!(centered_rect(100, 30, area), area);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), ["one two", "three"]);
        assert_eq!(wrap("abcdefgh", 3), ["abc", "def", "gh"]);
        assert_eq!(wrap("", 10), [""]);
        assert_eq!(wrap("a\nb", 10), ["a", "b"]);
        assert!(wrap("anything", 0).is_empty());
    }

    #[test]
    fn test_wrap_wide_chars() {
        assert_eq!(wrap("₹75.00 fee", 6), ["₹75.00", "fee"]);
    }

    #[test]
    fn test_heights() {
        let input = Node::input("n", "Name", Binding::Draft(DraftField::Name), "");
        let card = Node::card("Card", vec![Node::text("a"), Node::spacer()]);
        let row = Node::row(vec![
            Node::button("a", "A", Message::Back),
            input.clone(),
        ]);

        assert_eq!(height(&input, 40), INPUT_HEIGHT);
        assert_eq!(height(&card, 40), 4);
        assert_eq!(height(&row, 40), INPUT_HEIGHT);
        assert_eq!(height(&Node::column(vec![card, row]), 40), 7);
    }

    #[test]
    fn test_blocking_notice_takes_no_space() {
        let notice = Node::notice(medqueue_app::NoticeLevel::Error, "Denied", true);
        assert_eq!(height(&notice, 40), 0);
        let notice = Node::notice(medqueue_app::NoticeLevel::Error, "Denied", false);
        assert_eq!(height(&notice, 40), 1);
    }

    #[test]
    fn test_row_slots_are_equal() {
        let slots = row_slots(Rect::new(0, 0, 21, 1), 2);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].width, 10);
        assert_eq!(slots[1].x, 11);
    }
}
