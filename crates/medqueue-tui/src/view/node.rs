//! Node tree produced by the screen builders

use medqueue_app::{Binding, Message, NoticeLevel};
use medqueue_core::Coordinates;

/// Named icon slot. Resolved to a glyph by the glyph pass after each render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconName {
    Hospital,
    User,
    Doctor,
    Staff,
    MapPin,
    Crosshair,
    Search,
    Clock,
    Wallet,
    Users,
    Activity,
    Alert,
    Check,
    ArrowLeft,
    ArrowRight,
    Lock,
    Ticket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    pub name: IconName,
    /// Filled in by the glyph pass
    pub glyph: Option<&'static str>,
}

impl Icon {
    pub fn new(name: IconName) -> Self {
        Self { name, glyph: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    Title,
    Heading,
    #[default]
    Body,
    Strong,
    Muted,
    Accent,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    /// Toggle-style choice; `selected` marks the current value
    Choice { selected: bool },
    Danger,
}

/// One labelled bar of a bar chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarItem {
    pub label: String,
    pub value: u64,
}

/// Marker drawn on the map
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub label: String,
    pub coords: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Children stacked vertically
    Column,
    /// Children side by side with equal widths
    Row,
    /// Bordered box around a column of children
    Card { title: Option<String> },
    Text {
        text: String,
        style: TextStyle,
        icon: Option<Icon>,
    },
    Input {
        label: String,
        binding: Binding,
        value: String,
        placeholder: String,
        /// Only ASCII digits are accepted
        numeric: bool,
        /// Rendered as bullets
        masked: bool,
        /// Sent on Enter
        submit: Option<Message>,
    },
    Button {
        label: String,
        action: Message,
        enabled: bool,
        variant: ButtonVariant,
        icon: Option<Icon>,
    },
    Notice {
        level: NoticeLevel,
        message: String,
        blocking: bool,
    },
    Bars { items: Vec<BarItem> },
    Map {
        center: Coordinates,
        user: Coordinates,
        markers: Vec<MapMarker>,
    },
    /// Empty line
    Spacer,
}

/// A node in the rendered tree. `key` is the node's identity across renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub key: Option<String>,
    pub kind: NodeKind,
    pub children: Vec<Node>,
    /// Requests focus when nothing else is restored
    pub autofocus: bool,
}

impl Node {
    fn leaf(kind: NodeKind) -> Self {
        Self {
            key: None,
            kind,
            children: Vec::new(),
            autofocus: false,
        }
    }

    pub fn column(children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::leaf(NodeKind::Column)
        }
    }

    pub fn row(children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::leaf(NodeKind::Row)
        }
    }

    pub fn card(title: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::leaf(NodeKind::Card {
                title: Some(title.into()),
            })
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::styled(text, TextStyle::Body)
    }

    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self::leaf(NodeKind::Text {
            text: text.into(),
            style,
            icon: None,
        })
    }

    pub fn spacer() -> Self {
        Self::leaf(NodeKind::Spacer)
    }

    /// Text input bound to `binding`, keyed by `key`
    pub fn input(
        key: impl Into<String>,
        label: impl Into<String>,
        binding: Binding,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::leaf(NodeKind::Input {
                label: label.into(),
                binding,
                value: value.into(),
                placeholder: String::new(),
                numeric: false,
                masked: false,
                submit: None,
            })
        }
    }

    pub fn button(key: impl Into<String>, label: impl Into<String>, action: Message) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::leaf(NodeKind::Button {
                label: label.into(),
                action,
                enabled: true,
                variant: ButtonVariant::Primary,
                icon: None,
            })
        }
    }

    pub fn notice(level: NoticeLevel, message: impl Into<String>, blocking: bool) -> Self {
        Self {
            key: Some("notice".to_string()),
            ..Self::leaf(NodeKind::Notice {
                level,
                message: message.into(),
                blocking,
            })
        }
    }

    pub fn bars(items: Vec<BarItem>) -> Self {
        Self::leaf(NodeKind::Bars { items })
    }

    pub fn map(center: Coordinates, user: Coordinates, markers: Vec<MapMarker>) -> Self {
        Self::leaf(NodeKind::Map {
            center,
            user,
            markers,
        })
    }

    // ─────────────────────────────────────────────────────────
    // Builder modifiers
    // ─────────────────────────────────────────────────────────

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn autofocus(mut self) -> Self {
        self.autofocus = true;
        self
    }

    pub fn with_icon(mut self, name: IconName) -> Self {
        match &mut self.kind {
            NodeKind::Text { icon, .. } | NodeKind::Button { icon, .. } => {
                *icon = Some(Icon::new(name));
            }
            _ => {}
        }
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        if let NodeKind::Input { placeholder, .. } = &mut self.kind {
            *placeholder = text.into();
        }
        self
    }

    pub fn numeric(mut self) -> Self {
        if let NodeKind::Input { numeric, .. } = &mut self.kind {
            *numeric = true;
        }
        self
    }

    pub fn masked(mut self) -> Self {
        if let NodeKind::Input { masked, .. } = &mut self.kind {
            *masked = true;
        }
        self
    }

    pub fn on_submit(mut self, msg: Message) -> Self {
        if let NodeKind::Input { submit, .. } = &mut self.kind {
            *submit = Some(msg);
        }
        self
    }

    pub fn enabled(mut self, value: bool) -> Self {
        if let NodeKind::Button { enabled, .. } = &mut self.kind {
            *enabled = value;
        }
        self
    }

    pub fn variant(mut self, value: ButtonVariant) -> Self {
        if let NodeKind::Button { variant, .. } = &mut self.kind {
            *variant = value;
        }
        self
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn is_text_input(&self) -> bool {
        matches!(self.kind, NodeKind::Input { .. })
    }

    /// Inputs and enabled buttons take focus
    pub fn is_focusable(&self) -> bool {
        self.key.is_some()
            && match self.kind {
                NodeKind::Input { .. } => true,
                NodeKind::Button { enabled, .. } => enabled,
                _ => false,
            }
    }

    /// Current value of a text input
    pub fn input_value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Input { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Depth-first, parent before children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Node)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    pub fn find(&self, key: &str) -> Option<&Node> {
        if self.key.as_deref() == Some(key) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(key))
    }

    /// Concatenated visible text (card titles, text, labels and notices) in
    /// tree order, for tests and headless snapshots
    pub fn plain_text(&self) -> String {
        let mut out = Vec::new();
        self.walk(&mut |node| match &node.kind {
            NodeKind::Card { title: Some(title) } => out.push(title.clone()),
            NodeKind::Text { text, .. } => out.push(text.clone()),
            NodeKind::Button { label, .. } => out.push(label.clone()),
            NodeKind::Notice { message, .. } => out.push(message.clone()),
            NodeKind::Input { label, .. } => out.push(label.clone()),
            _ => {}
        });
        out.join("\n")
    }
}
