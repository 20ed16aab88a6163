//! Engine - shared orchestration state for the TUI and headless runners
//!
//! Owns the [`Store`], the message channel, running position watches, the
//! remote sync task and the shutdown signal. Frontends feed it messages and
//! subscribe to the store to learn when to redraw.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::actions::WatchMap;
use crate::config::Settings;
use crate::message::Message;
use crate::process;
use crate::services::Services;
use crate::signals;
use crate::state::AppState;
use crate::store::Store;
use crate::sync::SyncAdapter;

/// How long shutdown waits for the sync task to release its channel
const SYNC_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Orchestration engine for medqueue.
///
/// Not `Send`: store subscribers are plain closures owned by the frontend
/// thread. Everything that crosses threads goes through `msg_tx`.
pub struct Engine {
    /// Application state container (the Model)
    pub store: Store,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, terminal events).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    /// Sender for the shutdown signal. Send `true` to initiate shutdown.
    pub shutdown_tx: watch::Sender<bool>,

    /// Receiver for the shutdown signal. Clone for background tasks.
    pub shutdown_rx: watch::Receiver<bool>,

    /// Flipped once the first frame is on screen; gates the initial fetch
    ready_tx: watch::Sender<bool>,

    services: Services,

    watches: WatchMap,

    sync_task: Option<JoinHandle<()>>,

    pub settings: Settings,
}

impl Engine {
    /// Create an engine with collaborators built from `settings`.
    ///
    /// Must be called inside a tokio runtime: the signal handler and the
    /// sync task are spawned here.
    pub fn new(settings: Settings) -> Self {
        let services = Services::from_settings(&settings);
        Self::with_services(settings, services)
    }

    /// Create an engine around explicit collaborators
    pub fn with_services(settings: Settings, services: Services) -> Self {
        let store = Store::new(AppState::with_settings(settings.clone()));

        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (ready_tx, ready_rx) = watch::channel(false);

        signals::spawn_signal_handler(msg_tx.clone());

        let sync_task = services
            .sync
            .spawn_startup(msg_tx.clone(), ready_rx, shutdown_rx.clone());

        Self {
            store,
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            ready_tx,
            services,
            watches: WatchMap::new(),
            sync_task: Some(sync_task),
            settings,
        }
    }

    /// Signal that the frontend has rendered once; the initial queue fetch
    /// and change subscription start now.
    pub fn mark_ready(&self) {
        if !*self.ready_tx.borrow() {
            info!("frontend ready, starting queue sync");
            let _ = self.ready_tx.send(true);
        }
    }

    /// Process a single message through the update cycle
    pub fn process_message(&mut self, msg: Message) {
        process::process_message(
            &mut self.store,
            msg,
            &self.msg_tx,
            &self.services,
            &mut self.watches,
        );
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Wait for the next message and process it. Returns `false` once the
    /// channel is closed.
    pub async fn process_next(&mut self) -> bool {
        match self.msg_rx.recv().await {
            Some(msg) => {
                self.process_message(msg);
                true
            }
            None => false,
        }
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn sync(&self) -> &Arc<SyncAdapter> {
        &self.services.sync
    }

    pub fn should_quit(&self) -> bool {
        self.store.state().should_quit()
    }

    /// Number of position watches still running
    pub fn active_watches(&self) -> usize {
        self.watches.values().filter(|w| w.is_active()).count()
    }

    /// Stop watches, signal background tasks and release the change channel
    pub async fn shutdown(&mut self) {
        for (_, watch) in self.watches.drain() {
            watch.clear();
        }

        let _ = self.shutdown_tx.send(true);

        if let Some(task) = self.sync_task.take() {
            // Never released if the frontend quit before becoming ready
            if !*self.ready_tx.borrow() {
                task.abort();
            }
            match tokio::time::timeout(SYNC_SHUTDOWN_TIMEOUT, task).await {
                Ok(Ok(())) => info!("queue sync stopped"),
                Ok(Err(e)) if e.is_cancelled() => info!("queue sync cancelled"),
                Ok(Err(e)) => warn!("queue sync task panicked: {}", e),
                Err(_) => warn!("queue sync shutdown timed out"),
            }
        }
    }
}
