//! Icon glyphs for the TUI.
//!
//! Views only name their icons ([`IconName`]). [`IconSet::apply`] walks a
//! freshly built tree and fills in the glyph for the configured [`IconMode`].

use medqueue_app::config::IconMode;

use crate::view::{IconName, Node, NodeKind};

#[derive(Debug, Clone, Copy)]
pub struct IconSet {
    mode: IconMode,
}

impl IconSet {
    pub fn new(mode: IconMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> IconMode {
        self.mode
    }

    pub fn glyph(&self, name: IconName) -> &'static str {
        match self.mode {
            IconMode::NerdFonts => nerd_glyph(name),
            IconMode::Unicode => unicode_glyph(name),
        }
    }

    /// Resolve every named icon in `root`. Returns how many were filled.
    pub fn apply(&self, root: &mut Node) -> usize {
        let mut filled = 0;
        root.walk_mut(&mut |node| {
            if let NodeKind::Text { icon: Some(icon), .. } | NodeKind::Button { icon: Some(icon), .. } =
                &mut node.kind
            {
                icon.glyph = Some(self.glyph(icon.name));
                filled += 1;
            }
        });
        filled
    }
}

fn nerd_glyph(name: IconName) -> &'static str {
    match name {
        IconName::Hospital => "\u{f0f8}",   // nf-fa-hospital_o
        IconName::User => "\u{f007}",       // nf-fa-user
        IconName::Doctor => "\u{f0f0}",     // nf-fa-user_md
        IconName::Staff => "\u{f0b1}",      // nf-fa-briefcase
        IconName::MapPin => "\u{f041}",     // nf-fa-map_marker
        IconName::Crosshair => "\u{f05b}",  // nf-fa-crosshairs
        IconName::Search => "\u{f002}",     // nf-fa-search
        IconName::Clock => "\u{f017}",      // nf-fa-clock_o
        IconName::Wallet => "\u{f555}",     // nf-fa-wallet
        IconName::Users => "\u{f0c0}",      // nf-fa-users
        IconName::Activity => "\u{f0f1}",   // nf-fa-heartbeat
        IconName::Alert => "\u{f071}",      // nf-fa-warning
        IconName::Check => "\u{f00c}",      // nf-fa-check
        IconName::ArrowLeft => "\u{f060}",  // nf-fa-arrow_left
        IconName::ArrowRight => "\u{f061}", // nf-fa-arrow_right
        IconName::Lock => "\u{f023}",       // nf-fa-lock
        IconName::Ticket => "\u{f145}",     // nf-fa-ticket
    }
}

fn unicode_glyph(name: IconName) -> &'static str {
    match name {
        IconName::Hospital => "\u{271a}",   // ✚
        IconName::User => "\u{263a}",       // ☺
        IconName::Doctor => "\u{2695}",     // ⚕
        IconName::Staff => "[S]",
        IconName::MapPin => "\u{2316}",     // ⌖
        IconName::Crosshair => "\u{2295}",  // ⊕
        IconName::Search => "?",
        IconName::Clock => "\u{25f7}",      // ◷
        IconName::Wallet => "\u{20b9}",     // ₹
        IconName::Users => "#",
        IconName::Activity => "~",
        IconName::Alert => "\u{26a0}",      // ⚠
        IconName::Check => "\u{2713}",      // ✓
        IconName::ArrowLeft => "\u{2190}",  // ←
        IconName::ArrowRight => "\u{2192}", // →
        IconName::Lock => "*",
        IconName::Ticket => "\u{2116}",     // №
    }
}
