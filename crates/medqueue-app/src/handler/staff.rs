//! Login gate and doctor queue actions

use medqueue_core::{AuthRole, EntryId, EntryPatch, Screen};
use tracing::{info, warn};

use crate::state::{Binding, Notice};
use crate::store::Store;

use super::{UpdateAction, UpdateResult};

/// Remember the role and show the login form with an empty code
pub fn handle_choose_role(store: &mut Store, role: AuthRole) -> UpdateResult {
    store.batch(|s| {
        s.set_auth_target(role);
        s.set_form_input(Binding::Passcode, String::new());
        s.set_screen(Screen::LoginView);
    });
    UpdateResult::none()
}

pub fn handle_submit_passcode(store: &mut Store) -> UpdateResult {
    let state = store.state();
    if state.screen != Screen::LoginView {
        return UpdateResult::none();
    }
    let Some(role) = state.auth_target else {
        return UpdateResult::none();
    };

    let granted = state.forms.passcode == state.settings.auth.access_code;
    store.batch(|s| {
        s.set_form_input(Binding::Passcode, String::new());
        if granted {
            info!("{} signed in", role.title());
            s.set_screen(role.screen());
        } else {
            warn!("rejected access code for {}", role.title());
            s.set_notice(Notice::warning("Invalid access code"));
        }
    });
    UpdateResult::none()
}

/// Ask the store to bump the entry's triage; the push refetch brings the
/// new value back into the queue.
pub fn handle_escalate_triage(store: &mut Store, id: EntryId) -> UpdateResult {
    let state = store.state();
    if state.screen != Screen::DoctorView {
        return UpdateResult::none();
    }
    let Some(entry) = state.queue.iter().find(|e| e.id == id) else {
        return UpdateResult::none();
    };

    UpdateResult::action(UpdateAction::UpdateEntry {
        id,
        patch: EntryPatch::triage(entry.triage.escalated()),
    })
}

pub fn handle_discharge(store: &mut Store, id: EntryId) -> UpdateResult {
    let state = store.state();
    if state.screen != Screen::DoctorView || !state.queue.iter().any(|e| e.id == id) {
        return UpdateResult::none();
    }
    UpdateResult::action(UpdateAction::RemoveEntry { id })
}

pub fn handle_queue_write_failed(store: &mut Store, message: String) -> UpdateResult {
    store.set_notice(Notice::error(message));
    UpdateResult::none()
}
