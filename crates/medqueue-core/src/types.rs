//! Core domain types for patient intake and the hospital queue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Consultation fee applied when the draft does not carry one
pub const DEFAULT_FEE: f64 = 75.0;

// ─────────────────────────────────────────────────────────────────────────────
// Screen
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level UI mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Landing,
    PatientWizard,
    DoctorView,
    StaffView,
    LoginView,
}

impl Screen {
    pub fn label(&self) -> &'static str {
        match self {
            Screen::Landing => "landing",
            Screen::PatientWizard => "patient",
            Screen::DoctorView => "doctor",
            Screen::StaffView => "staff",
            Screen::LoginView => "login",
        }
    }
}

/// Role a login attempt is targeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthRole {
    Doctor,
    Staff,
}

impl AuthRole {
    /// Screen shown after a successful login
    pub fn screen(&self) -> Screen {
        match self {
            AuthRole::Doctor => Screen::DoctorView,
            AuthRole::Staff => Screen::StaffView,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AuthRole::Doctor => "Doctor",
            AuthRole::Staff => "Staff",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Closed enums used by the draft
// ─────────────────────────────────────────────────────────────────────────────

/// Patient gender as collected in the details step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("unknown gender: {s}")),
        }
    }
}

/// Preferred doctor gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoctorPref {
    Male,
    Female,
    Any,
}

impl DoctorPref {
    pub const ALL: [DoctorPref; 3] = [DoctorPref::Male, DoctorPref::Female, DoctorPref::Any];

    pub fn as_str(&self) -> &'static str {
        match self {
            DoctorPref::Male => "Male",
            DoctorPref::Female => "Female",
            DoctorPref::Any => "Any",
        }
    }

    /// Human label used on the confirmation card
    pub fn describe(&self) -> &'static str {
        match self {
            DoctorPref::Male => "Male",
            DoctorPref::Female => "Female",
            DoctorPref::Any => "Any Available",
        }
    }
}

impl fmt::Display for DoctorPref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoctorPref {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Ok(DoctorPref::Male),
            "female" => Ok(DoctorPref::Female),
            "any" => Ok(DoctorPref::Any),
            _ => Err(format!("unknown doctor preference: {s}")),
        }
    }
}

/// Triage level of a queue entry
///
/// Unknown strings coming back from the store are read as `Green`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Triage {
    #[default]
    Green,
    Yellow,
    Red,
}

impl Triage {
    /// Next level in the doctor's escalation cycle
    pub fn escalated(&self) -> Triage {
        match self {
            Triage::Green => Triage::Yellow,
            Triage::Yellow => Triage::Red,
            Triage::Red => Triage::Green,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Triage::Green => "Green",
            Triage::Yellow => "Yellow",
            Triage::Red => "Red",
        }
    }
}

impl From<String> for Triage {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "yellow" => Triage::Yellow,
            "red" => Triage::Red,
            _ => Triage::Green,
        }
    }
}

impl fmt::Display for Triage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Patient draft
// ─────────────────────────────────────────────────────────────────────────────

/// Free-text fields of the draft that are edited through text inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Name,
    Age,
    Area,
    Symptoms,
    Hospital,
}

impl DraftField {
    /// Build the edit that writes `value` into this field
    pub fn edit(self, value: impl Into<String>) -> DraftEdit {
        let value = value.into();
        match self {
            DraftField::Name => DraftEdit::Name(value),
            DraftField::Age => DraftEdit::Age(value),
            DraftField::Area => DraftEdit::Area(value),
            DraftField::Symptoms => DraftEdit::Symptoms(value),
            DraftField::Hospital => DraftEdit::Hospital(value),
        }
    }
}

/// A single field write against the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    Name(String),
    Age(String),
    Gender(Gender),
    DoctorPref(DoctorPref),
    Area(String),
    Symptoms(String),
    Hospital(String),
}

/// In-progress intake data staged before submission
///
/// Never validated field-by-field; the details step only checks that the
/// required fields are present before moving on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatientDraft {
    pub name: String,
    /// Numeric string as typed by the user
    pub age: String,
    pub gender: Option<Gender>,
    pub doctor_pref: Option<DoctorPref>,
    pub area: String,
    pub symptoms: String,
    pub hospital: String,
}

impl PatientDraft {
    /// Apply one field write (last write wins)
    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Name(v) => self.name = v,
            DraftEdit::Age(v) => self.age = v,
            DraftEdit::Gender(v) => self.gender = Some(v),
            DraftEdit::DoctorPref(v) => self.doctor_pref = Some(v),
            DraftEdit::Area(v) => self.area = v,
            DraftEdit::Symptoms(v) => self.symptoms = v,
            DraftEdit::Hospital(v) => self.hospital = v,
        }
    }

    /// Current text of a free-text field
    pub fn text(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Age => &self.age,
            DraftField::Area => &self.area,
            DraftField::Symptoms => &self.symptoms,
            DraftField::Hospital => &self.hospital,
        }
    }

    /// Labels of the required details that are still empty
    pub fn missing_details(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.age.trim().is_empty() {
            missing.push("age");
        }
        if self.gender.is_none() {
            missing.push("gender");
        }
        missing
    }

    pub fn is_empty(&self) -> bool {
        *self == PatientDraft::default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Queue entries
// ─────────────────────────────────────────────────────────────────────────────

/// Identity assigned by the remote store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted queue row (read-only copy held by the client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: EntryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub doctor_pref: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub hospital: Option<String>,
    #[serde(default)]
    pub triage: Triage,
    #[serde(default = "default_fee")]
    pub fee: f64,
    #[serde(default)]
    pub problem: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn default_fee() -> f64 {
    DEFAULT_FEE
}

impl QueueEntry {
    /// Minutes this entry has been waiting at `now`
    pub fn waiting_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_minutes().max(0)
    }

    /// Short complaint line for list views
    pub fn complaint(&self) -> &str {
        self.symptoms
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.problem.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Insert payload for a new queue row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewQueueEntry {
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub doctor_pref: Option<String>,
    pub area: String,
    pub symptoms: String,
    pub hospital: String,
    pub triage: Triage,
    pub fee: f64,
    pub problem: String,
}

impl NewQueueEntry {
    /// Map a staged draft onto the row the store expects
    pub fn from_draft(draft: &PatientDraft, fee: f64) -> Self {
        let problem = if draft.symptoms.is_empty() {
            "Unknown".to_string()
        } else {
            draft.symptoms.clone()
        };

        Self {
            name: draft.name.clone(),
            age: draft.age.trim().parse().ok(),
            gender: draft.gender.map(|g| g.as_str().to_string()),
            doctor_pref: draft.doctor_pref.map(|p| p.as_str().to_string()),
            area: draft.area.clone(),
            symptoms: draft.symptoms.clone(),
            hospital: draft.hospital.clone(),
            triage: Triage::Green,
            fee,
            problem,
        }
    }

    /// Materialize the stored row once the store has assigned identity
    pub fn into_entry(self, id: EntryId, created_at: DateTime<Utc>) -> QueueEntry {
        QueueEntry {
            id,
            name: self.name,
            age: self.age,
            gender: self.gender,
            doctor_pref: self.doctor_pref,
            area: Some(self.area),
            symptoms: Some(self.symptoms),
            hospital: Some(self.hospital),
            triage: self.triage,
            fee: self.fee,
            problem: Some(self.problem),
            created_at,
        }
    }
}

/// Partial update applied to an existing row
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triage: Option<Triage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
}

impl EntryPatch {
    pub fn triage(triage: Triage) -> Self {
        Self {
            triage: Some(triage),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triage.is_none() && self.hospital.is_none() && self.fee.is_none()
    }

    /// Apply this patch to a local copy of the row
    pub fn apply_to(&self, entry: &mut QueueEntry) {
        if let Some(triage) = self.triage {
            entry.triage = triage;
        }
        if let Some(ref hospital) = self.hospital {
            entry.hospital = Some(hospital.clone());
        }
        if let Some(fee) = self.fee {
            entry.fee = fee;
        }
    }
}
