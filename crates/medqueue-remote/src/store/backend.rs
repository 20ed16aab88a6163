use medqueue_core::prelude::*;
use medqueue_core::{EntryId, EntryPatch, NewQueueEntry, QueueEntry};

use super::{ChangeFeed, MemoryQueueStore, PostgrestStore, QueueStore};

/// The queue backend selected by configuration
#[derive(Debug, Clone)]
pub enum RemoteStore {
    Memory(MemoryQueueStore),
    Postgrest(PostgrestStore),
}

impl RemoteStore {
    pub fn name(&self) -> &'static str {
        match self {
            RemoteStore::Memory(_) => "memory",
            RemoteStore::Postgrest(_) => "postgrest",
        }
    }
}

impl QueueStore for RemoteStore {
    async fn fetch_ordered(&self) -> Result<Vec<QueueEntry>> {
        match self {
            RemoteStore::Memory(s) => s.fetch_ordered().await,
            RemoteStore::Postgrest(s) => s.fetch_ordered().await,
        }
    }

    async fn insert(&self, entry: &NewQueueEntry) -> Result<EntryId> {
        match self {
            RemoteStore::Memory(s) => s.insert(entry).await,
            RemoteStore::Postgrest(s) => s.insert(entry).await,
        }
    }

    async fn update(&self, id: EntryId, patch: &EntryPatch) -> Result<()> {
        match self {
            RemoteStore::Memory(s) => s.update(id, patch).await,
            RemoteStore::Postgrest(s) => s.update(id, patch).await,
        }
    }

    async fn delete(&self, id: EntryId) -> Result<()> {
        match self {
            RemoteStore::Memory(s) => s.delete(id).await,
            RemoteStore::Postgrest(s) => s.delete(id).await,
        }
    }

    async fn subscribe(&self) -> Result<ChangeFeed> {
        match self {
            RemoteStore::Memory(s) => s.subscribe().await,
            RemoteStore::Postgrest(s) => s.subscribe().await,
        }
    }
}
