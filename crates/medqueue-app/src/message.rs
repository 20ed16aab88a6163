//! Message types for the application (TEA pattern)

use medqueue_core::{AuthRole, Coordinates, DoctorPref, EntryId, Gender, Hospital, QueueEntry, Screen};

use crate::state::Binding;

/// All possible messages/actions in the application
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Request to quit the application
    Quit,

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    /// Switch to a top-level screen
    Navigate(Screen),
    /// Landing: Doctor / Staff entry, goes through the login gate
    ChooseRole(AuthRole),
    /// Esc / back button: one wizard step back, or back to Landing
    Back,
    /// Close the current notice
    DismissNotice,

    // ─────────────────────────────────────────────────────────
    // Form Input
    // ─────────────────────────────────────────────────────────
    /// A text input's value changed
    Input { binding: Binding, value: String },
    SelectGender(Gender),
    SelectDoctorPref(DoctorPref),
    /// Step 1 "Next"
    SubmitDetails,

    // ─────────────────────────────────────────────────────────
    // Location (step 2 / 3)
    // ─────────────────────────────────────────────────────────
    /// "Use Live Location"
    StartLiveLocation,
    /// Manual address search
    SubmitAddress,
    /// Fix from a position watch
    PositionUpdate { watch_id: u64, coords: Coordinates },
    /// Error from a position watch; `ended` when the watch stopped because of it
    PositionFailed {
        watch_id: u64,
        message: String,
        ended: bool,
    },
    /// Geocoder had no match for the typed address
    AddressNotFound { query: String },
    /// Nearby search finished
    NearbyFound {
        origin: Coordinates,
        area: String,
        results: Vec<Hospital>,
        radius_meters: u32,
    },
    /// Geocoding or nearby search failed
    LookupFailed { message: String },
    /// Pick the hospital at this index of the candidate list
    SelectHospital(usize),
    /// Step 3 "Change Location"
    ChangeLocation,

    // ─────────────────────────────────────────────────────────
    // Symptoms, Quote, Confirmation (steps 4-6)
    // ─────────────────────────────────────────────────────────
    /// Append a quick-symptom chip
    AddSymptom(String),
    SubmitSymptoms,
    /// "Confirm & Get Token"
    ConfirmBooking,
    BookingSaved { id: EntryId },
    BookingFailed { message: String },

    // ─────────────────────────────────────────────────────────
    // Login / Doctor
    // ─────────────────────────────────────────────────────────
    SubmitPasscode,
    /// Cycle triage Green -> Yellow -> Red -> Green
    EscalateTriage(EntryId),
    /// Remove a patient from the queue
    Discharge(EntryId),
    /// Update or delete failed
    QueueWriteFailed { message: String },

    // ─────────────────────────────────────────────────────────
    // Remote Sync
    // ─────────────────────────────────────────────────────────
    /// Fresh authoritative queue from the sync adapter
    QueueReplaced(Vec<QueueEntry>),
}

impl Message {
    /// Messages that come from the user rather than from a background task.
    /// A blocking notice swallows these until it is dismissed.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Message::Navigate(_)
                | Message::ChooseRole(_)
                | Message::Back
                | Message::Input { .. }
                | Message::SelectGender(_)
                | Message::SelectDoctorPref(_)
                | Message::SubmitDetails
                | Message::StartLiveLocation
                | Message::SubmitAddress
                | Message::SelectHospital(_)
                | Message::ChangeLocation
                | Message::AddSymptom(_)
                | Message::SubmitSymptoms
                | Message::ConfirmBooking
                | Message::SubmitPasscode
                | Message::EscalateTriage(_)
                | Message::Discharge(_)
        )
    }
}
