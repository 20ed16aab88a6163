//! medqueue-tui - Terminal UI for medqueue
//!
//! Turns the state held by the [`medqueue_app::Engine`] into a node tree
//! (the document), keeps it rebuilt on every store notification with focus
//! and text selection carried across, and paints it with ratatui.

pub mod event;
pub mod input;
pub mod render;
pub mod render_loop;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod view;
pub mod views;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry points
pub use render_loop::{attach, RenderLoop, SharedRenderLoop};
pub use runner::run;
pub use view::{Document, FocusSnapshot, Node, NodeKind, Selection};
