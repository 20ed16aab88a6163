//! Semantic style builders

use medqueue_app::NoticeLevel;
use medqueue_core::Triage;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use super::palette;
use crate::view::{ButtonVariant, TextStyle};

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

pub fn text(style: TextStyle) -> Style {
    match style {
        TextStyle::Title => Style::default()
            .fg(palette::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD),
        TextStyle::Heading => Style::default()
            .fg(palette::ACCENT)
            .add_modifier(Modifier::BOLD),
        TextStyle::Body => text_primary(),
        TextStyle::Strong => text_primary().add_modifier(Modifier::BOLD),
        TextStyle::Muted => text_muted(),
        TextStyle::Accent => accent(),
        TextStyle::Success => Style::default().fg(palette::STATUS_GREEN),
        TextStyle::Warning => Style::default().fg(palette::STATUS_YELLOW),
        TextStyle::Danger => Style::default().fg(palette::STATUS_RED),
    }
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default().fg(palette::BORDER_ACTIVE)
}

// --- Accent styles ---
pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

/// "Black on Cyan" for whatever holds focus
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn button(variant: ButtonVariant, focused: bool, enabled: bool) -> Style {
    if !enabled {
        return text_muted().add_modifier(Modifier::DIM);
    }
    if focused {
        return focused_selected();
    }
    match variant {
        ButtonVariant::Primary => Style::default()
            .fg(palette::TEXT_PRIMARY)
            .bg(palette::BRAND)
            .add_modifier(Modifier::BOLD),
        ButtonVariant::Secondary => text_secondary(),
        ButtonVariant::Choice { selected: true } => Style::default()
            .fg(palette::ACCENT)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ButtonVariant::Choice { selected: false } => text_secondary(),
        ButtonVariant::Danger => Style::default().fg(palette::STATUS_RED),
    }
}

pub fn notice(level: NoticeLevel) -> Style {
    let fg = match level {
        NoticeLevel::Info => palette::STATUS_BLUE,
        NoticeLevel::Warning => palette::STATUS_YELLOW,
        NoticeLevel::Error => palette::STATUS_RED,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

pub fn triage(level: Triage) -> Style {
    let fg = match level {
        Triage::Green => palette::STATUS_GREEN,
        Triage::Yellow => palette::STATUS_YELLOW,
        Triage::Red => palette::STATUS_RED,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

// --- Block builders ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_active()
        } else {
            border_inactive()
        })
}

pub fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_active())
        .style(Style::default().bg(palette::POPUP_BG))
}
