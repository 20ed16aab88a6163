//! # medqueue-remote - External Collaborators
//!
//! Everything medqueue talks to outside the process: the hosted queue table
//! and its realtime change channel, the device position source, and the
//! geocoding / nearby-hospital search.
//!
//! Depends on [`medqueue_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Queue Store (`store`)
//! - [`QueueStore`] - Ordered read, insert, update, delete, change subscription
//! - [`MemoryQueueStore`] - In-process table used for demos and tests
//! - [`PostgrestStore`] - PostgREST endpoint with a Phoenix realtime feed
//! - [`RemoteStore`] - Configured backend chosen at startup
//! - [`ChangeFeed`] - Stream of "something changed" events
//!
//! ### Location (`geo`)
//! - [`PositionSource`] / [`FixedPosition`] / [`DevicePosition`] - One-shot position reads
//! - [`watch_position()`] / [`PositionWatch`] - Continuous tracking handle
//! - [`Geocoder`] / [`OsmGeocoder`] / [`OfflineGeocoder`] - Address and nearby lookups

pub mod geo;
pub mod store;

pub use geo::{
    watch_position, DevicePosition, FixedPosition, GeoBackend, Geocoder, OfflineGeocoder,
    OsmGeocoder, PositionSource, PositionWatch, WatchOptions,
};
pub use store::{
    ChangeEvent, ChangeFeed, ChangeKind, MemoryQueueStore, PostgrestConfig, PostgrestStore,
    QueueStore, RemoteStore,
};

#[cfg(any(test, feature = "test-helpers"))]
pub use geo::ScriptedPosition;
