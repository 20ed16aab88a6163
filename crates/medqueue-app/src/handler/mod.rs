//! Handler module - TEA update function and message handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `wizard`: Booking wizard steps 1, 4, 5 and 6
//! - `location`: Wizard steps 2 and 3 (live tracking, address search, hospital pick)
//! - `staff`: Login gate and doctor queue actions

pub(crate) mod location;
pub(crate) mod staff;
pub(crate) mod update;
pub(crate) mod wizard;

#[cfg(test)]
mod tests;

use medqueue_core::{Coordinates, EntryId, EntryPatch, NewQueueEntry};

use crate::message::Message;

// Re-export main entry point
pub use update::update;
pub use wizard::SYMPTOM_CHIPS;

/// Actions that the engine should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Start polling the position source; updates carry `watch_id`
    StartWatch { watch_id: u64 },

    /// Release the position watch with this id
    StopWatch { watch_id: u64 },

    /// Geocode a typed address, then search near it
    ResolveAddress { query: String },

    /// Search for hospitals around a position
    FindNearby { origin: Coordinates, area: String },

    /// Insert the booking into the remote queue
    SubmitBooking(NewQueueEntry),

    /// Patch one remote queue row
    UpdateEntry { id: EntryId, patch: EntryPatch },

    /// Delete one remote queue row
    RemoveEntry { id: EntryId },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Actions for the engine to perform, in order
    pub actions: Vec<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            actions: Vec::new(),
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            actions: vec![action],
        }
    }

    /// Queue another action after the ones already present
    pub fn and(mut self, action: UpdateAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Prefix a watch teardown when one was active
    pub(crate) fn stopping(mut self, watch_id: Option<u64>) -> Self {
        if let Some(watch_id) = watch_id {
            self.actions.insert(0, UpdateAction::StopWatch { watch_id });
        }
        self
    }
}
