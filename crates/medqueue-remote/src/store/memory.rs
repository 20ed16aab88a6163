//! In-process queue table

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use medqueue_core::prelude::*;
use medqueue_core::{EntryId, EntryPatch, NewQueueEntry, QueueEntry};
use tokio::sync::mpsc;

use super::{ChangeEvent, ChangeFeed, ChangeKind, QueueStore};

/// A queue table kept in memory.
///
/// Cloning shares the table. Every successful write broadcasts a change event
/// to all open feeds, including feeds held by the writer itself.
#[derive(Clone, Default)]
pub struct MemoryQueueStore {
    table: Arc<Mutex<Table>>,
}

#[derive(Default)]
struct Table {
    rows: Vec<QueueEntry>,
    last_id: i64,
    feeds: Vec<mpsc::UnboundedSender<ChangeEvent>>,
    read_failure: Option<String>,
    write_failure: Option<String>,
    fetches: usize,
    inserts: Vec<NewQueueEntry>,
}

impl Table {
    fn broadcast(&mut self, kind: ChangeKind) {
        self.feeds
            .retain(|tx| tx.send(ChangeEvent::new(kind)).is_ok());
    }

    fn check_write(&self) -> Result<()> {
        match &self.write_failure {
            Some(message) => Err(Error::remote_write(message.clone())),
            None => Ok(()),
        }
    }

    fn ordered(&self) -> Vec<QueueEntry> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        rows
    }
}

impl std::fmt::Debug for MemoryQueueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.lock();
        f.debug_struct("MemoryQueueStore")
            .field("rows", &table.rows.len())
            .field("feeds", &table.feeds.len())
            .finish()
    }
}

impl MemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing rows; new ids continue after the largest one
    pub fn with_rows(rows: Vec<QueueEntry>) -> Self {
        let store = Self::new();
        {
            let mut table = store.lock();
            table.last_id = rows.iter().map(|r| r.id.0).max().unwrap_or(0);
            table.rows = rows;
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every read fail with `message` (`None` restores normal reads)
    pub fn set_read_failure(&self, message: Option<&str>) {
        self.lock().read_failure = message.map(str::to_string);
    }

    /// Make every write fail with `message` (`None` restores normal writes)
    pub fn set_write_failure(&self, message: Option<&str>) {
        self.lock().write_failure = message.map(str::to_string);
    }

    /// Number of full reads served so far, failed ones included
    pub fn fetch_count(&self) -> usize {
        self.lock().fetches
    }

    /// Every accepted insert payload, in call order
    pub fn insert_log(&self) -> Vec<NewQueueEntry> {
        self.lock().inserts.clone()
    }

    /// Current rows in creation order
    pub fn rows(&self) -> Vec<QueueEntry> {
        self.lock().ordered()
    }

    /// Feeds that are still open
    pub fn open_feeds(&self) -> usize {
        let mut table = self.lock();
        table.feeds.retain(|tx| !tx.is_closed());
        table.feeds.len()
    }
}

impl QueueStore for MemoryQueueStore {
    async fn fetch_ordered(&self) -> Result<Vec<QueueEntry>> {
        let mut table = self.lock();
        table.fetches += 1;
        if let Some(message) = &table.read_failure {
            return Err(Error::remote_read(message.clone()));
        }
        Ok(table.ordered())
    }

    async fn insert(&self, entry: &NewQueueEntry) -> Result<EntryId> {
        let mut table = self.lock();
        table.check_write()?;

        table.last_id += 1;
        let id = EntryId(table.last_id);
        table.inserts.push(entry.clone());
        table.rows.push(entry.clone().into_entry(id, Utc::now()));
        table.broadcast(ChangeKind::Insert);

        debug!("memory store: inserted row {}", id);
        Ok(id)
    }

    async fn update(&self, id: EntryId, patch: &EntryPatch) -> Result<()> {
        let mut table = self.lock();
        table.check_write()?;

        let row = table
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::remote_write(format!("no row with id {id}")))?;
        patch.apply_to(row);
        table.broadcast(ChangeKind::Update);
        Ok(())
    }

    async fn delete(&self, id: EntryId) -> Result<()> {
        let mut table = self.lock();
        table.check_write()?;

        let before = table.rows.len();
        table.rows.retain(|r| r.id != id);
        if table.rows.len() == before {
            return Err(Error::remote_write(format!("no row with id {id}")));
        }
        table.broadcast(ChangeKind::Delete);
        Ok(())
    }

    async fn subscribe(&self) -> Result<ChangeFeed> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().feeds.push(tx);
        Ok(ChangeFeed::from_receiver(rx))
    }
}
