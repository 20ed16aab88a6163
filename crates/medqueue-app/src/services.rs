//! Collaborators the engine talks to, built from [`Settings`]
//!
//! A misconfigured remote or geocoder never stops the app: it logs a warning
//! and falls back to the in-process implementation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use medqueue_core::prelude::*;
use medqueue_core::{DoctorPref, EntryId, Gender, NewQueueEntry, PatientDraft, QueueEntry, Triage};
use medqueue_remote::{
    DevicePosition, FixedPosition, GeoBackend, MemoryQueueStore, OfflineGeocoder, OsmGeocoder,
    PostgrestConfig, PostgrestStore, RemoteStore, WatchOptions,
};

use crate::config::{GeocoderKind, RemoteBackend, RemoteSettings, Settings};
use crate::sync::SyncAdapter;

/// Everything background actions need
#[derive(Debug, Clone)]
pub struct Services {
    pub sync: Arc<SyncAdapter>,
    pub geocoder: Arc<GeoBackend>,
    pub position: DevicePosition,
    pub watch_options: WatchOptions,
}

impl Services {
    pub fn from_settings(settings: &Settings) -> Self {
        let store = build_store(&settings.remote);
        info!("queue backend: {}", store.name());

        Self {
            sync: Arc::new(SyncAdapter::new(store)),
            geocoder: Arc::new(build_geocoder(settings.location.geocoder)),
            position: DevicePosition::Fixed(FixedPosition::new(
                settings.location.fixed_position(),
            )),
            watch_options: settings.location.watch_options(),
        }
    }

    /// In-process services around an existing memory store
    pub fn in_memory(store: MemoryQueueStore, position: DevicePosition) -> Self {
        Self {
            sync: Arc::new(SyncAdapter::new(RemoteStore::Memory(store))),
            geocoder: Arc::new(GeoBackend::Offline(OfflineGeocoder::bengaluru())),
            position,
            watch_options: WatchOptions::default(),
        }
    }
}

fn build_store(remote: &RemoteSettings) -> RemoteStore {
    match remote.backend {
        RemoteBackend::Memory => RemoteStore::Memory(memory_store(remote.seed_demo)),
        RemoteBackend::Postgrest => match postgrest_store(remote) {
            Ok(store) => RemoteStore::Postgrest(store),
            Err(e) => {
                warn!("Remote store unavailable ({}), using in-memory queue", e);
                RemoteStore::Memory(memory_store(remote.seed_demo))
            }
        },
    }
}

fn postgrest_store(remote: &RemoteSettings) -> Result<PostgrestStore> {
    let url = remote.url.as_deref().ok_or_else(|| Error::Config {
        message: "remote.url is required for the postgrest backend".to_string(),
    })?;
    let api_key = remote.resolved_api_key().unwrap_or_default();
    let config = PostgrestConfig::new(url, api_key, remote.table.clone(), remote.realtime)?;
    PostgrestStore::new(config)
}

fn memory_store(seed: bool) -> MemoryQueueStore {
    if seed {
        MemoryQueueStore::with_rows(demo_rows())
    } else {
        MemoryQueueStore::new()
    }
}

fn build_geocoder(kind: GeocoderKind) -> GeoBackend {
    match kind {
        GeocoderKind::Offline => GeoBackend::Offline(OfflineGeocoder::bengaluru()),
        GeocoderKind::Osm => match OsmGeocoder::new() {
            Ok(geocoder) => GeoBackend::Osm(geocoder),
            Err(e) => {
                warn!("OSM geocoder unavailable ({}), using offline catalogue", e);
                GeoBackend::Offline(OfflineGeocoder::bengaluru())
            }
        },
    }
}

/// A few waiting patients so the dashboards are not empty on first run
fn demo_rows() -> Vec<QueueEntry> {
    let now = Utc::now();
    let patients = [
        ("Meera Iyer", "52", Gender::Female, "Chest pain", "Apollo Hospital", Triage::Red, 45),
        ("Arjun Rao", "29", Gender::Male, "Fever, Cough", "Manipal Hospital", Triage::Yellow, 30),
        ("Kavya Nair", "8", Gender::Female, "Headache", "St. John's Hospital", Triage::Green, 12),
    ];

    patients
        .into_iter()
        .enumerate()
        .map(|(i, (name, age, gender, symptoms, hospital, triage, minutes_ago))| {
            let draft = PatientDraft {
                name: name.to_string(),
                age: age.to_string(),
                gender: Some(gender),
                doctor_pref: Some(DoctorPref::Any),
                area: "Bengaluru".to_string(),
                symptoms: symptoms.to_string(),
                hospital: hospital.to_string(),
            };
            let mut entry = NewQueueEntry::from_draft(&draft, medqueue_core::DEFAULT_FEE)
                .into_entry(EntryId(i as i64 + 1), now - Duration::minutes(minutes_ago));
            entry.triage = triage;
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_seeds_demo_rows() {
        let settings = Settings::default();
        match build_store(&settings.remote) {
            RemoteStore::Memory(store) => assert_eq!(store.rows().len(), 3),
            other => panic!("expected memory store, got {}", other.name()),
        }
    }

    #[test]
    fn test_seed_can_be_disabled() {
        let remote = RemoteSettings {
            seed_demo: false,
            ..Default::default()
        };
        match build_store(&remote) {
            RemoteStore::Memory(store) => assert!(store.rows().is_empty()),
            other => panic!("expected memory store, got {}", other.name()),
        }
    }

    #[test]
    fn test_postgrest_without_url_falls_back_to_memory() {
        let remote = RemoteSettings {
            backend: RemoteBackend::Postgrest,
            ..Default::default()
        };
        assert_eq!(build_store(&remote).name(), "memory");
    }

    #[test]
    fn test_postgrest_with_url() {
        let remote = RemoteSettings {
            backend: RemoteBackend::Postgrest,
            url: Some("https://db.example.org".into()),
            api_key: Some("anon".into()),
            ..Default::default()
        };
        assert_eq!(build_store(&remote).name(), "postgrest");
    }

    #[test]
    fn test_demo_rows_are_in_creation_order() {
        let rows = demo_rows();
        assert!(rows.windows(2).all(|w| w[0].created_at < w[1].created_at));
        assert_eq!(rows[0].triage, Triage::Red);
    }
}
