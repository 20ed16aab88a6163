//! medqueue-app - Application state and orchestration for medqueue
//!
//! Holds the state container ([`Store`]) and the TEA update function that
//! drives the booking wizard, the login gate and the doctor queue actions.
//! The [`Engine`] owns the message channel, running position watches and the
//! remote sync task shared by the TUI and headless frontends.

pub mod actions;
pub mod config;
pub mod engine;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod process;
pub mod services;
pub mod signals;
pub mod state;
pub mod stats;
pub mod store;
pub mod sync;

// Re-export primary types
pub use engine::Engine;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use services::Services;
pub use state::{step, AppState, Binding, Confirmation, LookupStage, Notice, NoticeLevel};
pub use stats::QueueStats;
pub use store::Store;
pub use sync::{ChangeSubscription, SyncAdapter};
