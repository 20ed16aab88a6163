//! Tests for handler module

use super::*;
use crate::handler::location::LIVE_LOCATION_AREA;
use crate::message::Message;
use crate::state::{step, AppState, Binding, LookupStage, NoticeLevel};
use crate::store::Store;
use medqueue_core::{
    AuthRole, Coordinates, DoctorPref, DraftField, EntryId, Gender, Hospital, PatientDraft,
    QueueEntry, Screen, Triage,
};
use std::cell::Cell;
use std::rc::Rc;

fn test_store() -> Store {
    Store::new(AppState::new())
}

/// Store with a notification counter attached
fn counted_store() -> (Store, Rc<Cell<usize>>) {
    let count = Rc::new(Cell::new(0));
    let mut store = test_store();
    let c = Rc::clone(&count);
    store.subscribe(move |_| c.set(c.get() + 1));
    (store, count)
}

fn hospital(name: &str) -> Hospital {
    Hospital {
        name: name.to_string(),
        kind: "hospital".to_string(),
        coords: Coordinates::new(12.97, 77.59),
    }
}

fn queue_entry(id: i64, triage: Triage) -> QueueEntry {
    let mut entry = medqueue_core::NewQueueEntry::from_draft(&PatientDraft::default(), 75.0)
        .into_entry(EntryId(id), chrono::Utc::now());
    entry.triage = triage;
    entry
}

fn send(store: &mut Store, msg: Message) -> UpdateResult {
    update(store, msg)
}

/// Fill step 1 and advance to the location step
fn store_on_location_step() -> Store {
    let mut store = test_store();
    send(&mut store, Message::Navigate(Screen::PatientWizard));
    send(
        &mut store,
        Message::Input {
            binding: Binding::Draft(DraftField::Name),
            value: "Asha".into(),
        },
    );
    send(
        &mut store,
        Message::Input {
            binding: Binding::Draft(DraftField::Age),
            value: "34".into(),
        },
    );
    send(&mut store, Message::SelectGender(Gender::Female));
    send(&mut store, Message::SelectDoctorPref(DoctorPref::Any));
    send(&mut store, Message::SubmitDetails);
    assert_eq!(store.state().wizard_step, step::LOCATION);
    store
}

fn nearby(store: &mut Store, area: &str) {
    send(
        store,
        Message::NearbyFound {
            origin: Coordinates::new(12.97, 77.64),
            area: area.to_string(),
            results: vec![hospital("City General"), hospital("St. Mary's")],
            radius_meters: 5000,
        },
    );
}

/// Walk the manual path through to the quote step
fn store_on_quote_step() -> Store {
    let mut store = store_on_location_step();
    send(
        &mut store,
        Message::Input {
            binding: Binding::Address,
            value: "Indiranagar".into(),
        },
    );
    send(&mut store, Message::SubmitAddress);
    nearby(&mut store, "Indiranagar");
    send(&mut store, Message::SelectHospital(0));
    send(&mut store, Message::AddSymptom("Fever".into()));
    send(&mut store, Message::SubmitSymptoms);
    assert_eq!(store.state().wizard_step, step::QUOTE);
    store
}

// ─────────────────────────────────────────────────────────
// Quit / navigation
// ─────────────────────────────────────────────────────────

#[test]
fn test_quit_message_sets_quitting_phase() {
    let mut store = test_store();
    assert!(!store.state().should_quit());

    send(&mut store, Message::Quit);

    assert!(store.state().should_quit());
}

#[test]
fn test_quit_releases_live_watch() {
    let mut store = store_on_location_step();
    let result = send(&mut store, Message::StartLiveLocation);
    let Some(UpdateAction::StartWatch { watch_id }) = result.actions.first().cloned() else {
        panic!("expected StartWatch, got {:?}", result.actions);
    };

    let result = send(&mut store, Message::Quit);
    assert_eq!(result.actions, vec![UpdateAction::StopWatch { watch_id }]);
}

#[test]
fn test_navigate_to_staff_goes_through_login() {
    let mut store = test_store();
    send(&mut store, Message::Navigate(Screen::StaffView));

    assert_eq!(store.state().screen, Screen::LoginView);
    assert_eq!(store.state().auth_target, Some(AuthRole::Staff));
}

#[test]
fn test_navigate_to_login_without_target_is_ignored() {
    let mut store = test_store();
    send(&mut store, Message::Navigate(Screen::LoginView));
    assert_eq!(store.state().screen, Screen::Landing);
}

#[test]
fn test_back_from_staff_returns_to_landing() {
    let mut store = test_store();
    store.set_screen(Screen::StaffView);
    send(&mut store, Message::Back);
    assert_eq!(store.state().screen, Screen::Landing);
}

#[test]
fn test_back_on_landing_does_nothing() {
    let (mut store, count) = counted_store();
    send(&mut store, Message::Back);
    assert_eq!(count.get(), 0);
}

// ─────────────────────────────────────────────────────────
// Step 1: details
// ─────────────────────────────────────────────────────────

#[test]
fn test_each_keystroke_notifies_once() {
    let (mut store, count) = counted_store();
    for value in ["A", "As", "Ash", "Asha"] {
        send(
            &mut store,
            Message::Input {
                binding: Binding::Draft(DraftField::Name),
                value: value.into(),
            },
        );
    }
    assert_eq!(count.get(), 4);
    assert_eq!(store.state().draft.name, "Asha");
}

#[test]
fn test_age_input_keeps_digits_only() {
    let mut store = test_store();
    send(
        &mut store,
        Message::Input {
            binding: Binding::Draft(DraftField::Age),
            value: "4a2".into(),
        },
    );
    assert_eq!(store.state().draft.age, "42");
}

#[test]
fn test_submit_details_with_empty_age_is_blocked() {
    let mut store = test_store();
    send(&mut store, Message::Navigate(Screen::PatientWizard));
    send(
        &mut store,
        Message::Input {
            binding: Binding::Draft(DraftField::Name),
            value: "Ravi".into(),
        },
    );
    send(&mut store, Message::SelectGender(Gender::Male));

    send(&mut store, Message::SubmitDetails);

    let state = store.state();
    assert_eq!(state.wizard_step, step::DETAILS);
    let notice = state.notice.as_ref().expect("validation notice");
    assert_eq!(notice.message, "Please fill in all fields.");
    assert!(!notice.blocking);
}

#[test]
fn test_submit_details_doctor_pref_optional() {
    let mut store = test_store();
    send(&mut store, Message::Navigate(Screen::PatientWizard));
    store.update_draft(DraftField::Name.edit("Ravi"));
    store.update_draft(DraftField::Age.edit("40"));
    store.update_draft(medqueue_core::DraftEdit::Gender(Gender::Male));

    send(&mut store, Message::SubmitDetails);
    assert_eq!(store.state().wizard_step, step::LOCATION);
    assert!(store.state().notice.is_none());
}

#[test]
fn test_back_from_step_one_resets_to_landing() {
    let mut store = test_store();
    send(&mut store, Message::Navigate(Screen::PatientWizard));
    store.update_draft(DraftField::Name.edit("Ravi"));

    send(&mut store, Message::Back);

    assert_eq!(store.state().screen, Screen::Landing);
    assert!(store.state().draft.is_empty());
}

// ─────────────────────────────────────────────────────────
// Steps 2 / 3: location
// ─────────────────────────────────────────────────────────

#[test]
fn test_start_live_location_starts_one_watch() {
    let mut store = store_on_location_step();

    let result = send(&mut store, Message::StartLiveLocation);
    assert!(matches!(
        result.actions.as_slice(),
        [UpdateAction::StartWatch { .. }]
    ));
    assert_eq!(store.state().pending_lookup, Some(LookupStage::AwaitingFix));

    let again = send(&mut store, Message::StartLiveLocation);
    assert!(again.actions.is_empty());
}

#[test]
fn test_first_fix_on_step_two_searches_once() {
    let mut store = store_on_location_step();
    send(&mut store, Message::StartLiveLocation);
    let watch_id = store.state().watch_id.unwrap();
    let fix = Coordinates::new(12.97, 77.64);

    let first = send(&mut store, Message::PositionUpdate { watch_id, coords: fix });
    assert_eq!(
        first.actions,
        vec![UpdateAction::FindNearby {
            origin: fix,
            area: LIVE_LOCATION_AREA.to_string(),
        }]
    );

    let second = send(&mut store, Message::PositionUpdate { watch_id, coords: fix });
    assert!(second.actions.is_empty());
}

#[test]
fn test_live_path_populates_search_and_area() {
    let mut store = store_on_location_step();
    send(&mut store, Message::StartLiveLocation);
    let watch_id = store.state().watch_id.unwrap();
    send(
        &mut store,
        Message::PositionUpdate {
            watch_id,
            coords: Coordinates::new(12.97, 77.64),
        },
    );

    nearby(&mut store, LIVE_LOCATION_AREA);

    let state = store.state();
    assert_eq!(state.wizard_step, step::HOSPITALS);
    assert_eq!(state.draft.area, "Live Location");
    assert_eq!(state.location_search.as_ref().unwrap().results.len(), 2);
    assert!(state.pending_lookup.is_none());
    // Watch keeps running on step 3 to move the marker
    assert_eq!(state.watch_id, Some(watch_id));
}

#[test]
fn test_nearby_results_notify_once() {
    let mut store = store_on_location_step();
    send(
        &mut store,
        Message::Input {
            binding: Binding::Address,
            value: "Koramangala".into(),
        },
    );
    send(&mut store, Message::SubmitAddress);

    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    store.subscribe(move |_| c.set(c.get() + 1));
    nearby(&mut store, "Koramangala");

    assert_eq!(count.get(), 1);
    assert_eq!(store.state().draft.area, "Koramangala");
}

#[test]
fn test_fix_on_step_three_moves_marker_only() {
    let mut store = store_on_location_step();
    send(&mut store, Message::StartLiveLocation);
    let watch_id = store.state().watch_id.unwrap();
    send(
        &mut store,
        Message::PositionUpdate {
            watch_id,
            coords: Coordinates::new(12.97, 77.64),
        },
    );
    nearby(&mut store, LIVE_LOCATION_AREA);

    let moved = Coordinates::new(12.98, 77.65);
    let result = send(&mut store, Message::PositionUpdate { watch_id, coords: moved });

    assert!(result.actions.is_empty());
    let search = store.state().location_search.as_ref().unwrap();
    assert_eq!(search.user, moved);
    assert_ne!(search.center, moved);
}

#[test]
fn test_stale_watch_updates_are_ignored() {
    let mut store = store_on_location_step();
    send(&mut store, Message::StartLiveLocation);
    let old = store.state().watch_id.unwrap();
    send(&mut store, Message::Back);
    send(&mut store, Message::SubmitDetails);

    let result = send(
        &mut store,
        Message::PositionUpdate {
            watch_id: old,
            coords: Coordinates::new(1.0, 1.0),
        },
    );
    assert!(result.actions.is_empty());
    assert_eq!(store.state().wizard_step, step::LOCATION);
}

#[test]
fn test_back_from_location_tears_down_watch() {
    let mut store = store_on_location_step();
    send(&mut store, Message::StartLiveLocation);
    let watch_id = store.state().watch_id.unwrap();

    let result = send(&mut store, Message::Back);

    assert_eq!(result.actions, vec![UpdateAction::StopWatch { watch_id }]);
    assert_eq!(store.state().wizard_step, step::DETAILS);
    assert!(store.state().watch_id.is_none());
    assert!(store.state().pending_lookup.is_none());
}

#[test]
fn test_watch_unavailable_shows_blocking_notice() {
    let mut store = store_on_location_step();
    send(&mut store, Message::StartLiveLocation);
    let watch_id = store.state().watch_id.unwrap();

    let result = send(
        &mut store,
        Message::PositionFailed {
            watch_id,
            message: "Geolocation is not available on this device".into(),
            ended: true,
        },
    );

    assert_eq!(result.actions, vec![UpdateAction::StopWatch { watch_id }]);
    let state = store.state();
    assert!(state.is_blocked());
    assert_eq!(state.wizard_step, step::LOCATION);
    assert!(state.watch_id.is_none());

    // Input is swallowed until the notice is dismissed
    send(&mut store, Message::Back);
    assert_eq!(store.state().wizard_step, step::LOCATION);
    send(&mut store, Message::DismissNotice);
    send(&mut store, Message::Back);
    assert_eq!(store.state().wizard_step, step::DETAILS);
}

#[test]
fn test_watch_timeout_is_a_warning() {
    let mut store = store_on_location_step();
    send(&mut store, Message::StartLiveLocation);
    let watch_id = store.state().watch_id.unwrap();

    send(
        &mut store,
        Message::PositionFailed {
            watch_id,
            message: "Timed out waiting for a position fix".into(),
            ended: false,
        },
    );

    let state = store.state();
    assert_eq!(state.notice.as_ref().unwrap().level, NoticeLevel::Warning);
    assert!(!state.is_blocked());
    assert_eq!(state.watch_id, Some(watch_id));
}

#[test]
fn test_submit_address_requires_text() {
    let mut store = store_on_location_step();
    let result = send(&mut store, Message::SubmitAddress);
    assert!(result.actions.is_empty());
}

#[test]
fn test_address_not_found_keeps_input() {
    let mut store = store_on_location_step();
    send(
        &mut store,
        Message::Input {
            binding: Binding::Address,
            value: "Atlantis".into(),
        },
    );
    let result = send(&mut store, Message::SubmitAddress);
    assert_eq!(
        result.actions,
        vec![UpdateAction::ResolveAddress {
            query: "Atlantis".into()
        }]
    );

    send(
        &mut store,
        Message::AddressNotFound {
            query: "Atlantis".into(),
        },
    );

    let state = store.state();
    assert_eq!(state.wizard_step, step::LOCATION);
    assert_eq!(state.forms.address, "Atlantis");
    assert_eq!(state.notice.as_ref().unwrap().message, "Location not found");
    assert!(state.pending_lookup.is_none());
}

#[test]
fn test_nearby_results_after_leaving_step_are_dropped() {
    let mut store = store_on_location_step();
    store.set_form_input(Binding::Address, "Hebbal".into());
    send(&mut store, Message::SubmitAddress);
    send(&mut store, Message::Back);

    nearby(&mut store, "Hebbal");

    assert_eq!(store.state().wizard_step, step::DETAILS);
    assert!(store.state().location_search.is_none());
}

#[test]
fn test_select_hospital_records_name_and_advances() {
    let mut store = store_on_location_step();
    store.set_form_input(Binding::Address, "Indiranagar".into());
    send(&mut store, Message::SubmitAddress);
    nearby(&mut store, "Indiranagar");

    send(&mut store, Message::SelectHospital(1));

    assert_eq!(store.state().draft.hospital, "St. Mary's");
    assert_eq!(store.state().wizard_step, step::SYMPTOMS);
}

#[test]
fn test_select_hospital_out_of_range_is_ignored() {
    let mut store = store_on_location_step();
    store.set_form_input(Binding::Address, "Indiranagar".into());
    send(&mut store, Message::SubmitAddress);
    nearby(&mut store, "Indiranagar");

    send(&mut store, Message::SelectHospital(9));
    assert_eq!(store.state().wizard_step, step::HOSPITALS);
}

#[test]
fn test_change_location_returns_to_step_two() {
    let mut store = store_on_location_step();
    send(&mut store, Message::StartLiveLocation);
    let watch_id = store.state().watch_id.unwrap();
    send(
        &mut store,
        Message::PositionUpdate {
            watch_id,
            coords: Coordinates::new(12.97, 77.64),
        },
    );
    nearby(&mut store, LIVE_LOCATION_AREA);

    let result = send(&mut store, Message::ChangeLocation);

    assert_eq!(result.actions, vec![UpdateAction::StopWatch { watch_id }]);
    assert_eq!(store.state().wizard_step, step::LOCATION);
}

// ─────────────────────────────────────────────────────────
// Steps 4-6
// ─────────────────────────────────────────────────────────

#[test]
fn test_symptom_chips_append_with_separator() {
    let mut store = store_on_quote_step();
    send(&mut store, Message::Back);
    assert_eq!(store.state().wizard_step, step::SYMPTOMS);

    send(&mut store, Message::AddSymptom("Cough".into()));
    assert_eq!(store.state().draft.symptoms, "Fever, Cough");
}

#[test]
fn test_confirm_booking_submits_accumulated_draft() {
    let mut store = store_on_quote_step();

    let result = send(&mut store, Message::ConfirmBooking);

    let [UpdateAction::SubmitBooking(entry)] = result.actions.as_slice() else {
        panic!("expected SubmitBooking, got {:?}", result.actions);
    };
    assert_eq!(entry.name, "Asha");
    assert_eq!(entry.age, Some(34));
    assert_eq!(entry.gender.as_deref(), Some("Female"));
    assert_eq!(entry.doctor_pref.as_deref(), Some("Any"));
    assert_eq!(entry.area, "Indiranagar");
    assert_eq!(entry.hospital, "City General");
    assert_eq!(entry.symptoms, "Fever");
    assert_eq!(entry.problem, "Fever");
    assert_eq!(entry.triage, Triage::Green);
    assert_eq!(entry.fee, 75.0);
    assert!(store.state().submitting);
}

#[test]
fn test_confirm_twice_submits_once() {
    let mut store = store_on_quote_step();
    send(&mut store, Message::ConfirmBooking);
    let second = send(&mut store, Message::ConfirmBooking);
    assert!(second.actions.is_empty());
}

#[test]
fn test_booking_saved_moves_to_confirmation() {
    let mut store = store_on_quote_step();
    send(&mut store, Message::ConfirmBooking);

    send(&mut store, Message::BookingSaved { id: EntryId(41) });

    let state = store.state();
    assert_eq!(state.wizard_step, step::CONFIRMATION);
    assert!(!state.submitting);
    let confirmation = state.confirmation.as_ref().unwrap();
    assert_eq!(confirmation.entry_id, EntryId(41));
    assert!(confirmation.token.starts_with('#'));
}

#[test]
fn test_booking_failure_stays_on_quote_with_draft_intact() {
    let mut store = store_on_quote_step();
    let draft_before = store.state().draft.clone();
    send(&mut store, Message::ConfirmBooking);

    send(
        &mut store,
        Message::BookingFailed {
            message: "relation \"queue\" does not exist".into(),
        },
    );

    let state = store.state();
    assert_eq!(state.wizard_step, step::QUOTE);
    assert!(!state.submitting);
    assert_eq!(state.draft, draft_before);
    let notice = state.notice.as_ref().unwrap();
    assert!(notice.message.starts_with("Failed to confirm booking:"));

    // Retry after dismissing
    send(&mut store, Message::DismissNotice);
    let retry = send(&mut store, Message::ConfirmBooking);
    assert_eq!(retry.actions.len(), 1);
}

#[test]
fn test_back_is_ignored_while_submitting() {
    let mut store = store_on_quote_step();
    send(&mut store, Message::ConfirmBooking);
    send(&mut store, Message::Back);
    assert_eq!(store.state().wizard_step, step::QUOTE);
}

#[test]
fn test_home_from_confirmation_clears_everything() {
    let mut store = store_on_quote_step();
    send(&mut store, Message::ConfirmBooking);
    send(&mut store, Message::BookingSaved { id: EntryId(1) });

    send(&mut store, Message::Navigate(Screen::Landing));

    let state = store.state();
    assert_eq!(state.screen, Screen::Landing);
    assert_eq!(state.wizard_step, step::DETAILS);
    assert!(state.draft.is_empty());
    assert!(state.confirmation.is_none());
    assert!(state.location_search.is_none());
}

// ─────────────────────────────────────────────────────────
// Login / doctor
// ─────────────────────────────────────────────────────────

#[test]
fn test_choose_role_shows_login() {
    let mut store = test_store();
    send(&mut store, Message::ChooseRole(AuthRole::Doctor));
    assert_eq!(store.state().screen, Screen::LoginView);
    assert_eq!(store.state().auth_target, Some(AuthRole::Doctor));
}

#[test]
fn test_correct_passcode_opens_target() {
    let mut store = test_store();
    send(&mut store, Message::ChooseRole(AuthRole::Doctor));
    send(
        &mut store,
        Message::Input {
            binding: Binding::Passcode,
            value: "1234".into(),
        },
    );
    send(&mut store, Message::SubmitPasscode);

    assert_eq!(store.state().screen, Screen::DoctorView);
    assert!(store.state().forms.passcode.is_empty());
}

#[test]
fn test_wrong_passcode_stays_on_login() {
    let mut store = test_store();
    send(&mut store, Message::ChooseRole(AuthRole::Staff));
    store.set_form_input(Binding::Passcode, "0000".into());
    send(&mut store, Message::SubmitPasscode);

    assert_eq!(store.state().screen, Screen::LoginView);
    assert_eq!(
        store.state().notice.as_ref().unwrap().message,
        "Invalid access code"
    );
}

#[test]
fn test_escalate_triage_requests_next_level() {
    let mut store = test_store();
    store.set_screen(Screen::DoctorView);
    store.replace_queue(vec![queue_entry(3, Triage::Yellow)]);

    let result = send(&mut store, Message::EscalateTriage(EntryId(3)));

    assert_eq!(
        result.actions,
        vec![UpdateAction::UpdateEntry {
            id: EntryId(3),
            patch: medqueue_core::EntryPatch::triage(Triage::Red),
        }]
    );
    // Local copy waits for the refetch
    assert_eq!(store.state().queue[0].triage, Triage::Yellow);
}

#[test]
fn test_discharge_unknown_entry_is_ignored() {
    let mut store = test_store();
    store.set_screen(Screen::DoctorView);
    store.replace_queue(vec![queue_entry(3, Triage::Green)]);

    assert!(send(&mut store, Message::Discharge(EntryId(9)))
        .actions
        .is_empty());
    assert_eq!(
        send(&mut store, Message::Discharge(EntryId(3))).actions,
        vec![UpdateAction::RemoveEntry { id: EntryId(3) }]
    );
}

#[test]
fn test_queue_replaced_is_applied_even_when_blocked() {
    let mut store = test_store();
    store.set_notice(crate::state::Notice::error("x").blocking());

    send(
        &mut store,
        Message::QueueReplaced(vec![queue_entry(1, Triage::Green)]),
    );
    assert_eq!(store.state().queue.len(), 1);
}
