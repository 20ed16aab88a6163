//! Main update function - handles state transitions (TEA pattern)
//!
//! All writes go through [`Store`] actions, so every handler either notifies
//! once per action or groups its writes in a `batch` scope.

use medqueue_core::{AuthRole, DraftEdit, DraftField, Screen};
use tracing::debug;

use crate::message::Message;
use crate::state::Binding;
use crate::store::Store;

use super::{location, staff, wizard, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or actions
pub fn update(store: &mut Store, message: Message) -> UpdateResult {
    if store.state().is_blocked() && message.is_user_input() {
        debug!("notice is blocking, dropped {:?}", message);
        return UpdateResult::none();
    }

    match message {
        Message::Quit => {
            let watch = store.batch(|s| {
                let watch = s.end_watch();
                s.request_quit();
                watch
            });
            UpdateResult::none().stopping(watch)
        }

        Message::Navigate(screen) => navigate(store, screen),
        Message::ChooseRole(role) => staff::handle_choose_role(store, role),
        Message::Back => handle_back(store),
        Message::DismissNotice => {
            store.clear_notice();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Form Input
        // ─────────────────────────────────────────────────────────
        Message::Input { binding, value } => handle_input(store, binding, value),
        Message::SelectGender(gender) => {
            store.update_draft(DraftEdit::Gender(gender));
            UpdateResult::none()
        }
        Message::SelectDoctorPref(pref) => {
            store.update_draft(DraftEdit::DoctorPref(pref));
            UpdateResult::none()
        }
        Message::SubmitDetails => wizard::handle_submit_details(store),

        // ─────────────────────────────────────────────────────────
        // Location
        // ─────────────────────────────────────────────────────────
        Message::StartLiveLocation => location::handle_start_live(store),
        Message::SubmitAddress => location::handle_submit_address(store),
        Message::PositionUpdate { watch_id, coords } => {
            location::handle_position_update(store, watch_id, coords)
        }
        Message::PositionFailed {
            watch_id,
            message,
            ended,
        } => location::handle_position_failed(store, watch_id, message, ended),
        Message::AddressNotFound { query } => location::handle_address_not_found(store, query),
        Message::NearbyFound {
            origin,
            area,
            results,
            radius_meters,
        } => location::handle_nearby_found(store, origin, area, results, radius_meters),
        Message::LookupFailed { message } => location::handle_lookup_failed(store, message),
        Message::SelectHospital(index) => location::handle_select_hospital(store, index),
        Message::ChangeLocation => location::handle_change_location(store),

        // ─────────────────────────────────────────────────────────
        // Symptoms / Quote / Confirmation
        // ─────────────────────────────────────────────────────────
        Message::AddSymptom(chip) => wizard::handle_add_symptom(store, &chip),
        Message::SubmitSymptoms => wizard::handle_submit_symptoms(store),
        Message::ConfirmBooking => wizard::handle_confirm_booking(store),
        Message::BookingSaved { id } => wizard::handle_booking_saved(store, id),
        Message::BookingFailed { message } => wizard::handle_booking_failed(store, message),

        // ─────────────────────────────────────────────────────────
        // Login / Doctor
        // ─────────────────────────────────────────────────────────
        Message::SubmitPasscode => staff::handle_submit_passcode(store),
        Message::EscalateTriage(id) => staff::handle_escalate_triage(store, id),
        Message::Discharge(id) => staff::handle_discharge(store, id),
        Message::QueueWriteFailed { message } => staff::handle_queue_write_failed(store, message),

        // ─────────────────────────────────────────────────────────
        // Remote Sync
        // ─────────────────────────────────────────────────────────
        Message::QueueReplaced(queue) => {
            debug!("queue replaced: {} entries", queue.len());
            store.replace_queue(queue);
            UpdateResult::none()
        }
    }
}

/// Switch screens. Doctor and Staff always go through the login gate, and
/// leaving the wizard releases any live position watch.
pub(super) fn navigate(store: &mut Store, screen: Screen) -> UpdateResult {
    match screen {
        Screen::DoctorView if store.state().screen != Screen::DoctorView => {
            return staff::handle_choose_role(store, AuthRole::Doctor);
        }
        Screen::StaffView if store.state().screen != Screen::StaffView => {
            return staff::handle_choose_role(store, AuthRole::Staff);
        }
        Screen::LoginView if store.state().auth_target.is_none() => {
            return UpdateResult::none();
        }
        _ => {}
    }

    let watch = store.batch(|s| {
        let watch = s.end_watch();
        s.set_screen(screen);
        watch
    });
    UpdateResult::none().stopping(watch)
}

fn handle_back(store: &mut Store) -> UpdateResult {
    match store.state().screen {
        Screen::Landing => UpdateResult::none(),
        Screen::PatientWizard => wizard::handle_back(store),
        Screen::DoctorView | Screen::StaffView | Screen::LoginView => {
            navigate(store, Screen::Landing)
        }
    }
}

fn handle_input(store: &mut Store, binding: Binding, value: String) -> UpdateResult {
    let value = match binding {
        Binding::Draft(DraftField::Age) => value.chars().filter(char::is_ascii_digit).collect(),
        _ => value,
    };
    store.set_form_input(binding, value);
    UpdateResult::none()
}
