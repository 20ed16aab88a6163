//! Keyboard input independent of the terminal library.
//!
//! The TUI converts crossterm key events into [`InputKey`] at its boundary so
//! the headless runner can script the same keys without pulling in crossterm.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Printable character
    Char(char),
    /// Character with Ctrl held (Ctrl+C quits)
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,
    Home,
    End,

    Enter,
    Esc,
    Tab,
    /// Shift+Tab
    BackTab,
    Backspace,
    Delete,
}

impl InputKey {
    /// Parse the names used by scripted input: single characters, `ctrl+x`,
    /// and key names such as `enter`, `esc`, `tab`, `backtab`.
    pub fn parse(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(InputKey::Char(c));
        }

        let lower = name.to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix("ctrl+") {
            let mut chars = rest.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Some(InputKey::CharCtrl(c)),
                _ => None,
            };
        }

        Some(match lower.as_str() {
            "space" => InputKey::Char(' '),
            "up" => InputKey::Up,
            "down" => InputKey::Down,
            "left" => InputKey::Left,
            "right" => InputKey::Right,
            "home" => InputKey::Home,
            "end" => InputKey::End,
            "enter" | "return" => InputKey::Enter,
            "esc" | "escape" => InputKey::Esc,
            "tab" => InputKey::Tab,
            "backtab" | "shift+tab" => InputKey::BackTab,
            "backspace" => InputKey::Backspace,
            "delete" | "del" => InputKey::Delete,
            _ => return None,
        })
    }
}
