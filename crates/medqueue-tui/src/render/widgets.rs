//! Painting the document tree into a buffer

use medqueue_core::Coordinates;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{BarChart, Widget};
use unicode_width::UnicodeWidthChar;

use super::layout;
use crate::theme::{palette, styles};
use crate::view::{BarItem, MapMarker, Node, NodeKind, Selection};

/// Smallest half-span of the map, in degrees (roughly 1 km)
const MIN_MAP_SPAN: f64 = 0.01;

/// What the painter needs to know about focus
#[derive(Debug, Clone, Copy, Default)]
pub struct PaintContext<'a> {
    pub focused: Option<&'a str>,
    pub selection: Option<Selection>,
}

impl PaintContext<'_> {
    fn is_focused(&self, node: &Node) -> bool {
        self.focused.is_some() && node.key.as_deref() == self.focused
    }
}

/// Where the focused node and the text cursor ended up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintOutput {
    pub focus_area: Option<Rect>,
    pub cursor: Option<Position>,
}

pub fn paint(node: &Node, area: Rect, buf: &mut Buffer, cx: &PaintContext, out: &mut PaintOutput) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    match &node.kind {
        NodeKind::Column => paint_column(&node.children, area, buf, cx, out),
        NodeKind::Row => {
            for (slot, child) in layout::row_slots(area, node.children.len())
                .into_iter()
                .zip(&node.children)
            {
                let h = layout::height(child, slot.width).min(slot.height);
                paint(child, Rect { height: h, ..slot }, buf, cx, out);
            }
        }
        NodeKind::Card { title } => {
            let mut block = styles::glass_block(false);
            if let Some(title) = title {
                block = block.title(format!(" {title} "));
            }
            let inner = block.inner(area);
            block.render(area, buf);
            paint_column(&node.children, inner, buf, cx, out);
        }
        NodeKind::Text { style, .. } => {
            let text = layout::text_content(node);
            paint_lines(&text, area, buf, styles::text(*style));
        }
        NodeKind::Input { .. } => paint_input(node, area, buf, cx, out),
        NodeKind::Button {
            label,
            enabled,
            variant,
            icon,
            ..
        } => {
            let focused = cx.is_focused(node);
            let text = match icon.and_then(|i| i.glyph) {
                Some(glyph) => format!(" {glyph} {label} "),
                None => format!(" {label} "),
            };
            buf.set_stringn(
                area.x,
                area.y,
                text,
                usize::from(area.width),
                styles::button(*variant, focused, *enabled),
            );
            if focused {
                out.focus_area = Some(area);
            }
        }
        NodeKind::Notice {
            level,
            message,
            blocking: false,
        } => {
            paint_lines(&layout::notice_content(message), area, buf, styles::notice(*level));
        }
        // Drawn as an overlay on top of the whole screen
        NodeKind::Notice { blocking: true, .. } => {}
        NodeKind::Bars { items } => paint_bars(items, area, buf),
        NodeKind::Map {
            center,
            user,
            markers,
        } => paint_map(*center, *user, markers, area, buf),
        NodeKind::Spacer => {}
    }
}

fn paint_column(children: &[Node], area: Rect, buf: &mut Buffer, cx: &PaintContext, out: &mut PaintOutput) {
    let bottom = area.bottom();
    let mut y = area.y;
    for child in children {
        if y >= bottom {
            break;
        }
        let h = layout::height(child, area.width).min(bottom - y);
        if h == 0 {
            continue;
        }
        paint(child, Rect::new(area.x, y, area.width, h), buf, cx, out);
        y += h;
    }
}

fn paint_lines(text: &str, area: Rect, buf: &mut Buffer, style: Style) {
    for (row, line) in layout::wrap(text, area.width)
        .into_iter()
        .take(usize::from(area.height))
        .enumerate()
    {
        buf.set_stringn(area.x, area.y + row as u16, line, usize::from(area.width), style);
    }
}

fn paint_input(node: &Node, area: Rect, buf: &mut Buffer, cx: &PaintContext, out: &mut PaintOutput) {
    let NodeKind::Input {
        label,
        value,
        placeholder,
        masked,
        ..
    } = &node.kind
    else {
        return;
    };

    let focused = cx.is_focused(node);
    let block = styles::glass_block(focused).title(format!(" {label} "));
    let inner = block.inner(area);
    block.render(area, buf);
    if focused {
        out.focus_area = Some(area);
    }
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if value.is_empty() {
        buf.set_stringn(
            inner.x,
            inner.y,
            placeholder,
            usize::from(inner.width),
            styles::text_muted(),
        );
        if focused {
            out.cursor = Some(Position::new(inner.x, inner.y));
        }
        return;
    }

    let chars: Vec<char> = if *masked {
        vec!['•'; value.chars().count()]
    } else {
        value.chars().collect()
    };
    let selection = cx
        .selection
        .filter(|_| focused)
        .map(|s| s.clamped(chars.len()));

    // Scroll horizontally so the caret stays in view
    let caret = selection.map_or(0, |s| s.end);
    let offset = caret.saturating_sub(usize::from(inner.width).saturating_sub(1));

    let mut x = inner.x;
    for (i, c) in chars.iter().enumerate().skip(offset) {
        if focused && i == caret {
            out.cursor = Some(Position::new(x, inner.y));
        }
        let w = c.width().unwrap_or(0) as u16;
        if x + w > inner.right() {
            break;
        }
        let selected = selection.is_some_and(|s| !s.is_caret() && (s.start..s.end).contains(&i));
        let style = if selected {
            styles::text_primary().add_modifier(Modifier::REVERSED)
        } else {
            styles::text_primary()
        };
        buf.set_string(x, inner.y, c.to_string(), style);
        x += w;
    }
    if focused && caret >= chars.len() {
        out.cursor = Some(Position::new(x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

fn paint_bars(items: &[BarItem], area: Rect, buf: &mut Buffer) {
    let count = items.len().max(1) as u16;
    let bar_width = (area.width.saturating_sub(count - 1) / count).max(1);
    let data: Vec<(&str, u64)> = items.iter().map(|i| (i.label.as_str(), i.value)).collect();

    BarChart::default()
        .data(data.as_slice())
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(styles::accent())
        .value_style(styles::focused_selected())
        .label_style(styles::text_muted())
        .render(area, buf);
}

fn paint_map(center: Coordinates, user: Coordinates, markers: &[MapMarker], area: Rect, buf: &mut Buffer) {
    let span = markers
        .iter()
        .map(|m| m.coords)
        .chain(std::iter::once(user))
        .map(|c| {
            (c.latitude - center.latitude)
                .abs()
                .max((c.longitude - center.longitude).abs())
        })
        .fold(MIN_MAP_SPAN, f64::max)
        * 1.2;

    let hospitals: Vec<(f64, f64)> = markers
        .iter()
        .map(|m| (m.coords.longitude, m.coords.latitude))
        .collect();
    let user_point = [(user.longitude, user.latitude)];

    Canvas::default()
        .block(styles::glass_block(false).title(" Map "))
        .marker(Marker::Braille)
        .x_bounds([center.longitude - span, center.longitude + span])
        .y_bounds([center.latitude - span, center.latitude + span])
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &hospitals,
                color: palette::MAP_HOSPITAL,
            });
            ctx.draw(&Points {
                coords: &user_point,
                color: palette::MAP_USER,
            });
            ctx.layer();
            for (index, marker) in markers.iter().enumerate() {
                ctx.print(
                    marker.coords.longitude,
                    marker.coords.latitude,
                    format!("{}", index + 1),
                );
            }
            ctx.print(user.longitude, user.latitude, "you");
        })
        .render(area, buf);
}
