//! Remote queue store abstraction
//!
//! The queue table lives outside the process. Clients read it in creation
//! order, write single rows, and subscribe to a change feed that only says
//! "something changed".

mod backend;
mod memory;
mod postgrest;
mod realtime;

pub use backend::RemoteStore;
pub use memory::MemoryQueueStore;
pub use postgrest::{PostgrestConfig, PostgrestStore};

use medqueue_core::prelude::*;
use medqueue_core::{EntryId, EntryPatch, NewQueueEntry, QueueEntry};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Operations the sync adapter needs from a queue table.
///
/// Use [`QueueStore`] (the `Send` variant) everywhere; the local variant only
/// exists because the macro generates it.
#[trait_variant::make(QueueStore: Send)]
pub trait LocalQueueStore {
    /// Full read, ordered by creation time ascending
    async fn fetch_ordered(&self) -> Result<Vec<QueueEntry>>;

    /// Insert one row and return the identity the store assigned
    async fn insert(&self, entry: &NewQueueEntry) -> Result<EntryId>;

    /// Apply a partial update to the row with `id`
    async fn update(&self, id: EntryId, patch: &EntryPatch) -> Result<()>;

    /// Delete the row with `id`
    async fn delete(&self, id: EntryId) -> Result<()>;

    /// Open a change feed; it stays open until dropped
    async fn subscribe(&self) -> Result<ChangeFeed>;
}

/// Kind of row change reported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    /// The store reported a change without saying which kind
    Unknown,
}

impl ChangeKind {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "INSERT" => ChangeKind::Insert,
            "UPDATE" => ChangeKind::Update,
            "DELETE" => ChangeKind::Delete,
            _ => ChangeKind::Unknown,
        }
    }
}

/// A push notification from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind) -> Self {
        Self { kind }
    }
}

/// Receiving end of a store's change channel.
///
/// Dropping the feed releases the channel: any background task that produces
/// events is aborted.
pub struct ChangeFeed {
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
    task: Option<JoinHandle<()>>,
    /// Held by feeds that never produce events so `next()` stays pending
    _idle_tx: Option<mpsc::UnboundedSender<ChangeEvent>>,
}

impl std::fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("has_task", &self.task.is_some())
            .finish()
    }
}

impl ChangeFeed {
    pub(crate) fn from_receiver(rx: mpsc::UnboundedReceiver<ChangeEvent>) -> Self {
        Self {
            rx,
            task: None,
            _idle_tx: None,
        }
    }

    pub(crate) fn with_task(rx: mpsc::UnboundedReceiver<ChangeEvent>, task: JoinHandle<()>) -> Self {
        Self {
            rx,
            task: Some(task),
            _idle_tx: None,
        }
    }

    /// A feed that stays open but never reports a change
    pub fn idle() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            rx,
            task: None,
            _idle_tx: Some(tx),
        }
    }

    /// Wait for the next change; `None` once the channel is gone for good
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }

    /// Non-blocking poll, used by tests
    pub fn try_next(&mut self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for ChangeFeed {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_kind_parse() {
        assert_eq!(ChangeKind::parse("INSERT"), ChangeKind::Insert);
        assert_eq!(ChangeKind::parse("update"), ChangeKind::Update);
        assert_eq!(ChangeKind::parse("DELETE"), ChangeKind::Delete);
        assert_eq!(ChangeKind::parse("TRUNCATE"), ChangeKind::Unknown);
    }

    #[tokio::test]
    async fn test_idle_feed_stays_pending() {
        let mut feed = ChangeFeed::idle();
        let res = tokio::time::timeout(std::time::Duration::from_millis(20), feed.next()).await;
        assert!(res.is_err(), "idle feed should not yield");
    }

    #[tokio::test]
    async fn test_feed_ends_when_sender_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut feed = ChangeFeed::from_receiver(rx);
        tx.send(ChangeEvent::new(ChangeKind::Insert)).unwrap();
        drop(tx);

        assert_eq!(feed.next().await, Some(ChangeEvent::new(ChangeKind::Insert)));
        assert_eq!(feed.next().await, None);
    }

    #[tokio::test]
    async fn test_dropping_feed_aborts_task() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let (alive_tx, alive_rx) = tokio::sync::oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let _alive = alive_tx;
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        });
        let feed = ChangeFeed::with_task(rx, task);
        drop(feed);

        // The sender is dropped without sending once the task is aborted
        assert!(alive_rx.await.is_err());
    }
}
