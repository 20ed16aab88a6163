//! # medqueue-core - Core Domain Types
//!
//! Foundation crate for medqueue. Provides the domain types shared by every
//! other crate, the error taxonomy, and logging initialisation.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`Screen`] - Top-level UI mode (Landing, PatientWizard, DoctorView, StaffView, LoginView)
//! - [`PatientDraft`] - In-progress intake data staged before submission
//! - [`QueueEntry`] - A persisted queue row with its store-assigned [`EntryId`]
//! - [`NewQueueEntry`] / [`EntryPatch`] - Insert and update payloads
//!
//! ### Location Types (`location`)
//! - [`Coordinates`], [`Hospital`], [`NearbyResults`], [`LocationSearch`]
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error enum grouped by layer
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use medqueue_core::prelude::*;
//! ```

pub mod error;
pub mod location;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all medqueue crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use location::{Coordinates, Hospital, LocationSearch, NearbyResults, DEFAULT_RADIUS_METERS};
pub use types::{
    AuthRole, DoctorPref, DraftEdit, DraftField, EntryId, EntryPatch, Gender, NewQueueEntry,
    PatientDraft, QueueEntry, Screen, Triage, DEFAULT_FEE,
};
