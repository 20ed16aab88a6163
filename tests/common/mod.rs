//! Shared helpers for integration tests

#![allow(dead_code)]

use std::time::Duration;

use chrono::{DateTime, Utc};
use medqueue_app::{config::Settings, Engine, Message, Services};
use medqueue_core::{EntryId, NewQueueEntry, PatientDraft, QueueEntry};
use medqueue_remote::{DevicePosition, MemoryQueueStore, ScriptedPosition};

/// Give up on a background reply after this long
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// Engine over an in-process queue and the offline geocoder
pub fn engine_with(store: MemoryQueueStore) -> Engine {
    let services = Services::in_memory(
        store,
        DevicePosition::Scripted(ScriptedPosition::new().then_fix(12.9784, 77.6408)),
    );
    Engine::with_services(Settings::default(), services)
}

/// A row created at `created_at`
pub fn row(id: i64, name: &str, created_at: DateTime<Utc>) -> QueueEntry {
    let draft = PatientDraft {
        name: name.to_string(),
        age: "40".to_string(),
        symptoms: "Cough".to_string(),
        ..Default::default()
    };
    NewQueueEntry::from_draft(&draft, 75.0).into_entry(EntryId(id), created_at)
}

/// Process background messages until `done` holds or nothing more arrives
pub async fn pump_until(engine: &mut Engine, mut done: impl FnMut(&Engine) -> bool) -> bool {
    for _ in 0..100 {
        if done(engine) {
            return true;
        }
        match tokio::time::timeout(REPLY_TIMEOUT, engine.process_next()).await {
            Ok(true) => {}
            _ => break,
        }
    }
    done(engine)
}

/// Mark the engine ready and process the initial queue fetch
pub async fn start(engine: &mut Engine) {
    engine.mark_ready();
    let processed = tokio::time::timeout(REPLY_TIMEOUT, engine.process_next()).await;
    assert!(matches!(processed, Ok(true)), "initial fetch never arrived");
}

/// Wait until the engine's change subscription is open
pub async fn wait_for_feed(store: &MemoryQueueStore) {
    for _ in 0..200 {
        if store.open_feeds() > 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("change feed never opened");
}

pub fn send_all(engine: &mut Engine, messages: impl IntoIterator<Item = Message>) {
    for msg in messages {
        engine.process_message(msg);
    }
}
