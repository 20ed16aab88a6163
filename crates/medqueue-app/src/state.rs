//! Application state (Model in TEA pattern)

use medqueue_core::{AuthRole, DraftField, EntryId, LocationSearch, PatientDraft, QueueEntry, Screen};
use rand::Rng;

use crate::config::Settings;

/// Wizard step numbers
pub mod step {
    pub const DETAILS: u8 = 1;
    pub const LOCATION: u8 = 2;
    pub const HOSPITALS: u8 = 3;
    pub const SYMPTOMS: u8 = 4;
    pub const QUOTE: u8 = 5;
    pub const CONFIRMATION: u8 = 6;

    /// Number of steps shown in the progress bar
    pub const COUNT: u8 = 6;
}

/// Current application phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// What a text input writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Draft(DraftField),
    /// Manual address on the location step
    Address,
    /// Access code on the login screen
    Passcode,
}

/// Text inputs whose values are not part of the draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInputs {
    pub address: String,
    pub passcode: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A user-visible message.
///
/// Blocking notices are modal: they must be dismissed before anything else
/// on the screen reacts to input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub blocking: bool,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            blocking: false,
        }
    }

    pub fn blocking(mut self) -> Self {
        self.blocking = true;
        self
    }
}

/// What the location step is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStage {
    /// Live tracking started, no fix yet
    AwaitingFix,
    /// Manual address sent to the geocoder
    ResolvingAddress,
    /// Nearby-hospital search running
    FindingNearby,
}

impl LookupStage {
    pub fn label(&self) -> &'static str {
        match self {
            LookupStage::AwaitingFix => "Searching...",
            LookupStage::ResolvingAddress => "Locating address...",
            LookupStage::FindingNearby => "Finding hospitals...",
        }
    }
}

/// Token and wait estimate shown after a successful booking (not persisted)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub entry_id: EntryId,
    /// `#K-42`
    pub token: String,
    pub wait_minutes: u32,
}

impl Confirmation {
    pub fn generate<R: Rng>(entry_id: EntryId, rng: &mut R) -> Self {
        let letter = char::from(b'A' + rng.gen_range(0..26u8));
        let number: u32 = rng.gen_range(10..100);
        Self {
            entry_id,
            token: format!("#{letter}-{number}"),
            wait_minutes: rng.gen_range(5..30),
        }
    }
}

/// Complete application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub phase: AppPhase,

    pub screen: Screen,

    /// 1..=6, meaningful only on the patient wizard
    pub wizard_step: u8,

    pub draft: PatientDraft,

    /// Authoritative copy of the remote queue, creation order
    pub queue: Vec<QueueEntry>,

    /// Candidate hospitals; only set on wizard steps 2 and 3
    pub location_search: Option<LocationSearch>,

    /// Screen the login form unlocks
    pub auth_target: Option<AuthRole>,

    pub forms: FormInputs,

    pub notice: Option<Notice>,

    /// Booking insert in flight; the confirm control is disabled meanwhile
    pub submitting: bool,

    /// Location lookup in flight on step 2
    pub pending_lookup: Option<LookupStage>,

    /// Id of the live position watch, if one is running
    pub watch_id: Option<u64>,

    /// Last watch id handed out; updates from older watches are stale
    pub watch_seq: u64,

    pub confirmation: Option<Confirmation>,

    pub settings: Settings,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            phase: AppPhase::Running,
            screen: Screen::Landing,
            wizard_step: step::DETAILS,
            draft: PatientDraft::default(),
            queue: Vec::new(),
            location_search: None,
            auth_target: None,
            forms: FormInputs::default(),
            notice: None,
            submitting: false,
            pending_lookup: None,
            watch_id: None,
            watch_seq: 0,
            confirmation: None,
            settings,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    /// Current text behind an input binding
    pub fn binding_value(&self, binding: Binding) -> &str {
        match binding {
            Binding::Draft(field) => self.draft.text(field),
            Binding::Address => &self.forms.address,
            Binding::Passcode => &self.forms.passcode,
        }
    }

    pub fn on_wizard_step(&self, wizard_step: u8) -> bool {
        self.screen == Screen::PatientWizard && self.wizard_step == wizard_step
    }

    /// A blocking notice is up and swallows input
    pub fn is_blocked(&self) -> bool {
        self.notice.as_ref().is_some_and(|n| n.blocking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_state_starts_on_landing_step_one() {
        let state = AppState::new();
        assert_eq!(state.screen, Screen::Landing);
        assert_eq!(state.wizard_step, step::DETAILS);
        assert!(state.draft.is_empty());
        assert!(!state.should_quit());
    }

    #[test]
    fn test_confirmation_token_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let c = Confirmation::generate(EntryId(1), &mut rng);
            let bytes = c.token.as_bytes();
            assert_eq!(bytes.len(), 5, "{}", c.token);
            assert_eq!(bytes[0], b'#');
            assert!(bytes[1].is_ascii_uppercase());
            assert_eq!(bytes[2], b'-');
            let n: u32 = c.token[3..].parse().unwrap();
            assert!((10..100).contains(&n));
            assert!((5..30).contains(&c.wait_minutes));
        }
    }

    #[test]
    fn test_binding_value_reads_draft_and_forms() {
        let mut state = AppState::new();
        state.draft.name = "Ravi".into();
        state.forms.passcode = "12".into();

        assert_eq!(state.binding_value(Binding::Draft(DraftField::Name)), "Ravi");
        assert_eq!(state.binding_value(Binding::Passcode), "12");
        assert_eq!(state.binding_value(Binding::Address), "");
    }

    #[test]
    fn test_blocking_notice() {
        let mut state = AppState::new();
        state.notice = Some(Notice::warning("Location not found"));
        assert!(!state.is_blocked());
        state.notice = Some(Notice::error("Geolocation unavailable").blocking());
        assert!(state.is_blocked());
    }
}
