//! Booking wizard: details, symptoms, quote and confirmation steps, plus back
//! navigation

use medqueue_core::{DraftEdit, EntryId, NewQueueEntry, Screen};
use tracing::{info, warn};

use crate::state::{step, Confirmation, Notice};
use crate::store::Store;

use super::{UpdateAction, UpdateResult};

/// Quick-insert chips on the symptoms step
pub const SYMPTOM_CHIPS: [&str; 7] = [
    "Fever", "Headache", "Cough", "Cold", "Body Pain", "Fatigue", "Nausea",
];

/// Move to another step; a notice belongs to the step that raised it
pub(super) fn go_to_step(store: &mut Store, wizard_step: u8) {
    store.batch(|s| {
        s.clear_notice();
        s.set_wizard_step(wizard_step);
    });
}

/// Back: one step back, or Landing from step 1. Tears down live tracking and
/// forgets any lookup in flight.
pub fn handle_back(store: &mut Store) -> UpdateResult {
    if store.state().submitting {
        return UpdateResult::none();
    }

    let current = store.state().wizard_step;
    let watch = store.batch(|s| {
        let watch = s.end_watch();
        if s.state().pending_lookup.is_some() {
            s.set_pending_lookup(None);
        }
        if current <= step::DETAILS {
            s.set_screen(Screen::Landing);
        } else {
            go_to_step(s, current - 1);
        }
        watch
    });
    UpdateResult::none().stopping(watch)
}

pub fn handle_submit_details(store: &mut Store) -> UpdateResult {
    if !store.state().on_wizard_step(step::DETAILS) {
        return UpdateResult::none();
    }

    let missing = store.state().draft.missing_details();
    if missing.is_empty() {
        go_to_step(store, step::LOCATION);
    } else {
        info!("details incomplete, missing {}", missing.join(", "));
        store.set_notice(Notice::warning("Please fill in all fields."));
    }
    UpdateResult::none()
}

/// Append a chip to the symptoms text, comma separated
pub fn handle_add_symptom(store: &mut Store, chip: &str) -> UpdateResult {
    if !store.state().on_wizard_step(step::SYMPTOMS) {
        return UpdateResult::none();
    }

    let current = store.state().draft.symptoms.as_str();
    let symptoms = if current.is_empty() {
        chip.to_string()
    } else {
        format!("{current}, {chip}")
    };
    store.update_draft(DraftEdit::Symptoms(symptoms));
    UpdateResult::none()
}

pub fn handle_submit_symptoms(store: &mut Store) -> UpdateResult {
    if store.state().on_wizard_step(step::SYMPTOMS) {
        go_to_step(store, step::QUOTE);
    }
    UpdateResult::none()
}

/// Disable the confirm control and hand the draft to the remote store
pub fn handle_confirm_booking(store: &mut Store) -> UpdateResult {
    let state = store.state();
    if !state.on_wizard_step(step::QUOTE) || state.submitting {
        return UpdateResult::none();
    }

    let entry = NewQueueEntry::from_draft(&state.draft, state.settings.booking.fee);
    store.batch(|s| {
        s.clear_notice();
        s.set_submitting(true);
    });
    UpdateResult::action(UpdateAction::SubmitBooking(entry))
}

pub fn handle_booking_saved(store: &mut Store, id: EntryId) -> UpdateResult {
    if !store.state().submitting {
        warn!("booking {} saved after the wizard moved on", id);
        return UpdateResult::none();
    }

    let confirmation = Confirmation::generate(id, &mut rand::thread_rng());
    info!("booking {} confirmed with token {}", id, confirmation.token);
    store.batch(|s| {
        s.set_submitting(false);
        s.set_confirmation(Some(confirmation));
        go_to_step(s, step::CONFIRMATION);
    });
    UpdateResult::none()
}

/// Stay on the quote step with the control re-enabled
pub fn handle_booking_failed(store: &mut Store, message: String) -> UpdateResult {
    if !store.state().submitting {
        return UpdateResult::none();
    }

    store.batch(|s| {
        s.set_submitting(false);
        s.set_notice(Notice::error(format!("Failed to confirm booking: {message}")).blocking());
    });
    UpdateResult::none()
}
