//! Theme for the medqueue TUI.
//!
//! - `palette`: raw colour constants
//! - `styles`: semantic style builders
//! - `icons`: icon glyphs for both icon modes, plus the glyph pass

pub mod icons;
pub mod palette;
pub mod styles;
