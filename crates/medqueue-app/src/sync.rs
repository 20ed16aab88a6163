//! Remote sync adapter: bridges the hosted queue table into the [`Store`].
//!
//! Reads never fail from the caller's point of view: a failed fetch is logged
//! and reads as an empty queue. Writes are logged and returned so the UI can
//! offer a retry. Any change notification triggers a full refetch; the pushed
//! payload is never applied on its own.
//!
//! [`Store`]: crate::store::Store

use std::future::Future;
use std::sync::Arc;

use medqueue_core::prelude::*;
use medqueue_core::{EntryId, EntryPatch, NewQueueEntry, QueueEntry};
use medqueue_remote::{QueueStore, RemoteStore};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::message::Message;

/// Adapter over a [`QueueStore`]
#[derive(Debug)]
pub struct SyncAdapter<S = RemoteStore> {
    store: S,
}

/// Handle to a running change subscription; dropping it releases the channel
#[derive(Debug)]
pub struct ChangeSubscription {
    task: Option<JoinHandle<()>>,
}

impl ChangeSubscription {
    /// Release the push channel
    pub fn teardown(mut self) {
        self.stop();
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("change subscription released");
        }
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S> SyncAdapter<S>
where
    S: QueueStore + Send + Sync + 'static,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Full queue in creation order; empty on failure
    pub async fn fetch_all(&self) -> Vec<QueueEntry> {
        match self.store.fetch_ordered().await {
            Ok(queue) => queue,
            Err(e) => {
                error!("Failed to fetch queue: {}", e);
                Vec::new()
            }
        }
    }

    /// Refetch the whole queue on every change notification and hand it to
    /// `on_change`. The next notification is not read until the returned
    /// future completes, so a slow consumer applies back-pressure instead of
    /// losing snapshots.
    pub async fn subscribe_to_changes<F, Fut>(
        self: &Arc<Self>,
        mut on_change: F,
    ) -> Result<ChangeSubscription>
    where
        F: FnMut(Vec<QueueEntry>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let mut feed = self.store.subscribe().await?;
        let adapter = Arc::clone(self);

        let task = tokio::spawn(async move {
            while let Some(event) = feed.next().await {
                debug!("queue change pushed: {:?}", event.kind);
                let queue = adapter.fetch_all().await;
                on_change(queue).await;
            }
            debug!("change feed closed");
        });

        Ok(ChangeSubscription { task: Some(task) })
    }

    /// Insert one booking; the store assigns the id
    pub async fn create(&self, entry: &NewQueueEntry) -> Result<EntryId> {
        match self.store.insert(entry).await {
            Ok(id) => {
                info!("queue entry {} created for {}", id, entry.name);
                Ok(id)
            }
            Err(e) => {
                error!("Failed to create queue entry: {}", e);
                Err(e)
            }
        }
    }

    pub async fn update(&self, id: EntryId, patch: &EntryPatch) -> Result<()> {
        self.store.update(id, patch).await.map_err(|e| {
            error!("Failed to update queue entry {}: {}", id, e);
            e
        })
    }

    pub async fn remove(&self, id: EntryId) -> Result<()> {
        self.store.delete(id).await.map_err(|e| {
            error!("Failed to remove queue entry {}: {}", id, e);
            e
        })
    }

    /// Startup sequence: wait for `ready`, fetch once into the app, then keep
    /// it current from the change feed until shutdown.
    pub fn spawn_startup(
        self: &Arc<Self>,
        msg_tx: mpsc::Sender<Message>,
        mut ready: watch::Receiver<bool>,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let adapter = Arc::clone(self);

        tokio::spawn(async move {
            if ready.wait_for(|ready| *ready).await.is_err() {
                debug!("engine dropped before sync started");
                return;
            }

            let queue = adapter.fetch_all().await;
            info!("initial queue fetch: {} entries", queue.len());
            if msg_tx.send(Message::QueueReplaced(queue)).await.is_err() {
                return;
            }

            let push_tx = msg_tx.clone();
            let subscription = adapter
                .subscribe_to_changes(move |queue| {
                    let tx = push_tx.clone();
                    async move {
                        if tx.send(Message::QueueReplaced(queue)).await.is_err() {
                            debug!("engine gone; pushed queue discarded");
                        }
                    }
                })
                .await;

            let subscription = match subscription {
                Ok(subscription) => subscription,
                Err(e) => {
                    error!("Failed to subscribe to queue changes: {}", e);
                    return;
                }
            };

            let _ = shutdown.wait_for(|stop| *stop).await;
            subscription.teardown();
        })
    }
}
