//! State container: the single owner of [`AppState`] plus change notification.
//!
//! Every write goes through an action method. Notifying actions call each
//! subscriber synchronously, in registration order, once per action.
//! [`Store::stage_draft`] and [`Store::set_auth_target`] write without
//! notifying, and [`Store::batch`] defers notification until its scope closes
//! (one notification for the whole scope, only if something in it would have
//! notified).
//!
//! The store is single-threaded by construction (`!Send` subscribers); async
//! completions reach it as messages on the engine's channel.

use medqueue_core::{AuthRole, Coordinates, DraftEdit, LocationSearch, PatientDraft, QueueEntry, Screen};

use crate::state::{step, AppPhase, AppState, Binding, Confirmation, LookupStage, Notice};

/// Callback invoked with the new state after every notifying action
pub type Subscriber = Box<dyn FnMut(&AppState)>;

pub struct Store {
    state: AppState,
    subscribers: Vec<Subscriber>,
    batch_depth: usize,
    /// A notifying action ran inside the current batch
    dirty: bool,
    notifications: u64,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("screen", &self.state.screen)
            .field("wizard_step", &self.state.wizard_step)
            .field("subscribers", &self.subscribers.len())
            .field("notifications", &self.notifications)
            .finish()
    }
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
            batch_depth: 0,
            dirty: false,
            notifications: 0,
        }
    }

    /// Current snapshot. Writes must go through the action methods.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Register a callback; subscribers fire in registration order
    pub fn subscribe(&mut self, subscriber: impl FnMut(&AppState) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Total notification rounds delivered so far
    pub fn notification_count(&self) -> u64 {
        self.notifications
    }

    fn notify(&mut self) {
        if self.batch_depth > 0 {
            self.dirty = true;
            return;
        }
        self.notifications += 1;
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&self.state);
        }
    }

    /// Run `f` with notifications deferred; subscribers fire at most once,
    /// after the outermost batch closes.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Store) -> R) -> R {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;

        if self.batch_depth == 0 && self.dirty {
            self.dirty = false;
            self.notify();
        }
        result
    }

    // ─────────────────────────────────────────────────────────
    // Core actions
    // ─────────────────────────────────────────────────────────

    /// Switch screens. Returning to Landing resets the wizard: step 1, empty
    /// draft, and no step-scoped location or confirmation data.
    pub fn set_screen(&mut self, screen: Screen) {
        self.state.screen = screen;
        self.state.notice = None;
        if screen == Screen::Landing {
            self.state.wizard_step = step::DETAILS;
            self.state.draft = PatientDraft::default();
            self.state.location_search = None;
            self.state.confirmation = None;
            self.state.forms = Default::default();
            self.state.submitting = false;
            self.state.pending_lookup = None;
        }
        self.notify();
    }

    /// Set the wizard step; bounds are the caller's responsibility
    pub fn set_wizard_step(&mut self, wizard_step: u8) {
        self.state.wizard_step = wizard_step;
        self.notify();
    }

    /// Write one draft field and notify
    pub fn update_draft(&mut self, edit: DraftEdit) {
        self.state.draft.apply(edit);
        self.notify();
    }

    /// Write one draft field without notifying, ahead of a change that will
    pub fn stage_draft(&mut self, edit: DraftEdit) {
        self.state.draft.apply(edit);
    }

    /// Replace the queue wholesale (never patched in place)
    pub fn replace_queue(&mut self, queue: Vec<QueueEntry>) {
        self.state.queue = queue;
        self.notify();
    }

    // ─────────────────────────────────────────────────────────
    // Supporting actions
    // ─────────────────────────────────────────────────────────

    /// Remember which role the login form unlocks (no notification)
    pub fn set_auth_target(&mut self, role: AuthRole) {
        self.state.auth_target = Some(role);
    }

    pub fn set_form_input(&mut self, binding: Binding, value: String) {
        match binding {
            Binding::Draft(field) => self.state.draft.apply(field.edit(value)),
            Binding::Address => self.state.forms.address = value,
            Binding::Passcode => self.state.forms.passcode = value,
        }
        self.notify();
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.state.notice = Some(notice);
        self.notify();
    }

    pub fn clear_notice(&mut self) {
        if self.state.notice.take().is_some() {
            self.notify();
        }
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.state.submitting = submitting;
        self.notify();
    }

    pub fn set_pending_lookup(&mut self, stage: Option<LookupStage>) {
        self.state.pending_lookup = stage;
        self.notify();
    }

    /// Allocate a fresh watch id and mark it as the active watch
    pub fn begin_watch(&mut self) -> u64 {
        self.state.watch_seq += 1;
        self.state.watch_id = Some(self.state.watch_seq);
        self.notify();
        self.state.watch_seq
    }

    /// Forget the active watch; returns the id that was active
    pub fn end_watch(&mut self) -> Option<u64> {
        let ended = self.state.watch_id.take();
        if ended.is_some() {
            self.notify();
        }
        ended
    }

    pub fn set_location_search(&mut self, search: Option<LocationSearch>) {
        self.state.location_search = search;
        self.notify();
    }

    /// Move the live user marker; no-op without an active search
    pub fn move_user_marker(&mut self, coords: Coordinates) {
        if let Some(search) = self.state.location_search.as_mut() {
            search.user = coords;
            self.notify();
        }
    }

    pub fn set_confirmation(&mut self, confirmation: Option<Confirmation>) {
        self.state.confirmation = confirmation;
        self.notify();
    }

    pub fn request_quit(&mut self) {
        self.state.phase = AppPhase::Quitting;
        self.notify();
    }
}
