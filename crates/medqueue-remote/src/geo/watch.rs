//! Continuous position tracking on top of a [`PositionSource`]

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use medqueue_core::prelude::*;
use medqueue_core::Coordinates;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::PositionSource;

static NEXT_WATCH_ID: AtomicU64 = AtomicU64::new(1);

/// Tuning for [`watch_position`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// A read that takes longer than this is abandoned with `GeolocationTimeout`
    pub timeout: Duration,
    /// A fix younger than this is reported again instead of reading the source
    pub maximum_age: Duration,
    /// Delay between reads
    pub poll_interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
            poll_interval: Duration::from_secs(3),
        }
    }
}

/// Handle to a running watch. Dropping it stops the watch.
#[derive(Debug)]
pub struct PositionWatch {
    id: u64,
    task: Option<JoinHandle<()>>,
}

impl PositionWatch {
    /// Identifier carried by every update this watch produces
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the watch; no callback runs after this returns
    pub fn clear(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("position watch {} cleared", self.id);
        }
    }
}

impl Drop for PositionWatch {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start polling `source`, reporting every fix or error to `on_update`.
///
/// Timeouts and other transient errors are reported and polling continues.
/// An unavailable or denied source is reported once and ends the watch.
pub fn watch_position<P, F>(source: P, options: WatchOptions, mut on_update: F) -> PositionWatch
where
    P: PositionSource + Send + Sync + 'static,
    F: FnMut(Result<Coordinates>) + Send + 'static,
{
    let id = NEXT_WATCH_ID.fetch_add(1, Ordering::Relaxed);

    let task = tokio::spawn(async move {
        info!("position watch {} started", id);
        let mut last_fix: Option<(Instant, Coordinates)> = None;

        loop {
            match last_fix {
                Some((at, coords)) if at.elapsed() < options.maximum_age => {
                    on_update(Ok(coords));
                }
                _ => {
                    let read = tokio::time::timeout(
                        options.timeout,
                        source.current_position(options.high_accuracy),
                    )
                    .await;

                    match read {
                        Ok(Ok(coords)) => {
                            last_fix = Some((Instant::now(), coords));
                            on_update(Ok(coords));
                        }
                        Ok(Err(err)) if err.ends_position_watch() => {
                            warn!("position watch {} ended: {}", id, err);
                            on_update(Err(err));
                            break;
                        }
                        Ok(Err(err)) => {
                            debug!("position watch {}: {}", id, err);
                            on_update(Err(err));
                        }
                        Err(_elapsed) => {
                            debug!("position watch {}: read timed out", id);
                            on_update(Err(Error::GeolocationTimeout));
                        }
                    }
                }
            }

            tokio::time::sleep(options.poll_interval).await;
        }
    });

    PositionWatch {
        id,
        task: Some(task),
    }
}
