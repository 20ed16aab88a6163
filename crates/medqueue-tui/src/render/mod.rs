//! Paints the mounted document (View in TEA pattern)
//!
//! The document is laid out at full height into an off-screen buffer, then
//! the window that keeps the focused node visible is copied into the frame.

pub mod layout;
pub mod widgets;

use medqueue_app::NoticeLevel;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Widget};
use ratatui::Frame;

use crate::render_loop::RenderLoop;
use crate::theme::{palette, styles};
use crate::view::{Node, NodeKind};
use widgets::{PaintContext, PaintOutput};

/// Vertical scroll of the body, kept between frames
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub scroll: u16,
}

impl Viewport {
    /// Scroll just enough to show `target`, then clamp to the content
    fn follow(&mut self, target: Option<Rect>, visible: u16, content: u16) {
        if let Some(target) = target {
            if target.y < self.scroll {
                self.scroll = target.y;
            } else if target.bottom() > self.scroll + visible {
                self.scroll = target.bottom().saturating_sub(visible);
            }
        }
        self.scroll = self.scroll.min(content.saturating_sub(visible));
    }
}

/// Render the complete UI
pub fn view(frame: &mut Frame, render_loop: &RenderLoop, viewport: &mut Viewport) {
    let area = frame.area();
    let areas = layout::create(area);
    let document = render_loop.document();

    render_header(frame, areas.header, render_loop.title());

    let body_block = styles::glass_block(false);
    let body = body_block.inner(areas.body);
    frame.render_widget(body_block, areas.body);

    let Some(root) = document.root() else {
        return;
    };

    let content_height = layout::height(root, body.width).max(1);
    let mut content = Buffer::empty(Rect::new(0, 0, body.width, content_height));
    let cx = PaintContext {
        focused: document.focused_key(),
        selection: document.selection(),
    };
    let mut out = PaintOutput::default();
    widgets::paint(root, content.area, &mut content, &cx, &mut out);

    viewport.follow(out.focus_area, body.height, content_height);
    copy_window(&content, viewport.scroll, body, frame.buffer_mut());

    let blocking = blocking_notice(root);
    if blocking.is_none() {
        if let Some(cursor) = out.cursor {
            if cursor.y >= viewport.scroll && cursor.y < viewport.scroll + body.height {
                frame.set_cursor_position(Position::new(
                    body.x + cursor.x,
                    body.y + cursor.y - viewport.scroll,
                ));
            }
        }
    }

    render_footer(frame, areas.footer, document.focused_node(), blocking.is_some());

    if let Some((level, message)) = blocking {
        render_notice_overlay(frame, area, level, message);
    }
}

fn copy_window(content: &Buffer, scroll: u16, target: Rect, dst: &mut Buffer) {
    for y in 0..target.height {
        for x in 0..target.width {
            let Some(cell) = content.cell((x, y + scroll)) else {
                continue;
            };
            if let Some(slot) = dst.cell_mut((target.x + x, target.y + y)) {
                *slot = cell.clone();
            }
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, title: &str) {
    let block = styles::glass_block(false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = Line::from(vec![
        Span::styled(" MedQueue ", styles::focused_selected()),
        Span::raw("  "),
        Span::styled(title.to_string(), styles::text_primary()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_footer(frame: &mut Frame, area: Rect, focused: Option<&Node>, blocked: bool) {
    let hints: &[(&str, &str)] = if blocked {
        &[("Enter", "dismiss"), ("Ctrl+C", "quit")]
    } else {
        match focused.map(|n| &n.kind) {
            Some(NodeKind::Input { submit: Some(_), .. }) => &[
                ("Enter", "submit"),
                ("Tab", "next"),
                ("Esc", "back"),
                ("Ctrl+C", "quit"),
            ],
            Some(NodeKind::Input { .. }) => &[("Tab", "next"), ("Esc", "back"), ("Ctrl+C", "quit")],
            None => &[("Tab", "focus"), ("Esc", "back"), ("Ctrl+C", "quit")],
            Some(_) => &[
                ("Enter", "select"),
                ("Tab", "next"),
                ("Esc", "back"),
                ("Ctrl+C", "quit"),
            ],
        }
    };

    let mut spans = vec![Span::raw(" ")];
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", styles::text_muted()));
        }
        spans.push(Span::styled(*key, Style::default().fg(palette::STATUS_YELLOW)));
        spans.push(Span::styled(format!(" {action}"), styles::text_muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn blocking_notice(root: &Node) -> Option<(NoticeLevel, &str)> {
    let mut found = None;
    root.walk(&mut |node| {
        if let NodeKind::Notice {
            level,
            message,
            blocking: true,
        } = &node.kind
        {
            found = Some((*level, message.as_str()));
        }
    });
    found
}

fn render_notice_overlay(frame: &mut Frame, area: Rect, level: NoticeLevel, message: &str) {
    let width = area.width.saturating_sub(4).min(60);
    let lines = layout::wrap(message, width.saturating_sub(4));
    let height = (lines.len() as u16).saturating_add(4);
    let popup = layout::centered_rect(width, height, area);

    let title = match level {
        NoticeLevel::Info => " Notice ",
        NoticeLevel::Warning => " Warning ",
        NoticeLevel::Error => " Error ",
    };

    frame.render_widget(Clear, popup);
    let block = styles::modal_block(title);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut text: Vec<Line> = lines
        .into_iter()
        .map(|l| Line::styled(format!(" {l}"), styles::notice(level)))
        .collect();
    text.push(Line::default());
    text.push(Line::styled(" Enter to dismiss", styles::text_muted()));
    Paragraph::new(text).render(inner, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_loop::attach;
    use crate::test_utils::TestTerminal;
    use medqueue_app::config::IconMode;
    use medqueue_app::{step, AppState, Notice, Store};
    use medqueue_core::{DraftField, Screen};

    fn setup(screen: Screen) -> (Store, crate::render_loop::SharedRenderLoop) {
        let mut store = Store::new(AppState::new());
        let render_loop = attach(&mut store, IconMode::Unicode);
        store.set_screen(screen);
        (store, render_loop)
    }

    #[test]
    fn test_landing_renders_header_and_actions() {
        let (_store, render_loop) = setup(Screen::Landing);
        let mut term = TestTerminal::new();
        let mut viewport = Viewport::default();

        term.draw_with(|f| view(f, &render_loop.borrow(), &mut viewport));

        assert!(term.line_contains(1, "MedQueue"));
        assert!(term.buffer_contains("Book a Visit"));
        assert!(term.buffer_contains("Doctor"));
        assert!(term.buffer_contains("Ctrl+C"));
    }

    #[test]
    fn test_cursor_sits_in_focused_input() {
        let (mut store, render_loop) = setup(Screen::PatientWizard);
        store.update_draft(DraftField::Name.edit("Asha"));
        render_loop.borrow_mut().document_mut().focus("name");

        let mut term = TestTerminal::new();
        let mut viewport = Viewport::default();
        term.draw_with(|f| view(f, &render_loop.borrow(), &mut viewport));

        assert!(term.buffer_contains("Asha"));
        let cursor = term.cursor();
        // header (3) + body border (1) + progress (1) + heading (1) + input border (1)
        assert_eq!(cursor.y, 7);
        assert_eq!(cursor.x, 2 + 4);
    }

    #[test]
    fn test_scrolls_to_focused_node() {
        let (mut store, render_loop) = setup(Screen::PatientWizard);
        store.set_wizard_step(step::QUOTE);
        render_loop.borrow_mut().document_mut().focus("confirm");

        let mut term = TestTerminal::with_size(60, 12);
        let mut viewport = Viewport::default();
        term.draw_with(|f| view(f, &render_loop.borrow(), &mut viewport));

        assert!(viewport.scroll > 0);
        assert!(term.buffer_contains("Confirm & Get Token"));
    }

    #[test]
    fn test_blocking_notice_overlay() {
        let (mut store, render_loop) = setup(Screen::PatientWizard);
        store.set_notice(Notice::error("Geolocation is not available on this device").blocking());

        let mut term = TestTerminal::new();
        let mut viewport = Viewport::default();
        term.draw_with(|f| view(f, &render_loop.borrow(), &mut viewport));

        assert!(term.buffer_contains("Error"));
        assert!(term.buffer_contains("Geolocation is not available"));
        assert!(term.buffer_contains("Enter to dismiss"));
    }

    #[test]
    fn test_viewport_follow() {
        let mut viewport = Viewport::default();
        viewport.follow(Some(Rect::new(0, 30, 10, 3)), 10, 50);
        assert_eq!(viewport.scroll, 23);
        viewport.follow(Some(Rect::new(0, 5, 10, 1)), 10, 50);
        assert_eq!(viewport.scroll, 5);
        viewport.follow(None, 10, 8);
        assert_eq!(viewport.scroll, 0);
    }
}
