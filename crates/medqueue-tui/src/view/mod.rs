//! In-memory document the screens render into
//!
//! - `node`: the tree built by the screen builders
//! - `document`: the mounted tree plus focus and selection

pub mod document;
pub mod node;

pub use document::{Document, FocusSnapshot, Selection};
pub use node::{BarItem, ButtonVariant, Icon, IconName, MapMarker, Node, NodeKind, TextStyle};
