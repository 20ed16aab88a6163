//! Action handlers: UpdateAction dispatch and background task spawning

use std::collections::HashMap;

use medqueue_core::{Coordinates, Error};
use medqueue_remote::{watch_position, Geocoder, PositionWatch};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::handler::UpdateAction;
use crate::message::Message;
use crate::services::Services;

/// Running position watches keyed by the app-side watch id
pub type WatchMap = HashMap<u64, PositionWatch>;

/// Execute an action, spawning a background task where it needs I/O
pub fn handle_action(
    action: UpdateAction,
    msg_tx: &mpsc::Sender<Message>,
    services: &Services,
    watches: &mut WatchMap,
) {
    match action {
        UpdateAction::StartWatch { watch_id } => {
            // The watch callback is synchronous; fixes queue here in order and
            // a forwarder waits for room in the engine channel.
            let (fix_tx, mut fix_rx) = mpsc::unbounded_channel();
            let tx = msg_tx.clone();
            tokio::spawn(async move {
                while let Some(msg) = fix_rx.recv().await {
                    if tx.send(msg).await.is_err() {
                        debug!("engine gone; watch {} forwarder exiting", watch_id);
                        break;
                    }
                }
            });

            let watch = watch_position(
                services.position.clone(),
                services.watch_options,
                move |update| {
                    let msg = match update {
                        Ok(coords) => Message::PositionUpdate { watch_id, coords },
                        Err(e) => position_failed(watch_id, e),
                    };
                    let _ = fix_tx.send(msg);
                },
            );
            if let Some(previous) = watches.insert(watch_id, watch) {
                previous.clear();
            }
        }

        UpdateAction::StopWatch { watch_id } => match watches.remove(&watch_id) {
            Some(watch) => watch.clear(),
            None => debug!("watch {} already stopped", watch_id),
        },

        UpdateAction::ResolveAddress { query } => {
            let tx = msg_tx.clone();
            let geocoder = services.geocoder.clone();
            tokio::spawn(async move {
                let msg = match geocoder.resolve_address(&query).await {
                    Ok(Some(origin)) => nearby_message(&*geocoder, origin, query).await,
                    Ok(None) => Message::AddressNotFound { query },
                    Err(e) => Message::LookupFailed {
                        message: e.to_string(),
                    },
                };
                let _ = tx.send(msg).await;
            });
        }

        UpdateAction::FindNearby { origin, area } => {
            let tx = msg_tx.clone();
            let geocoder = services.geocoder.clone();
            tokio::spawn(async move {
                let msg = nearby_message(&*geocoder, origin, area).await;
                let _ = tx.send(msg).await;
            });
        }

        UpdateAction::SubmitBooking(entry) => {
            let tx = msg_tx.clone();
            let sync = services.sync.clone();
            tokio::spawn(async move {
                let msg = match sync.create(&entry).await {
                    Ok(id) => Message::BookingSaved { id },
                    Err(e) => Message::BookingFailed {
                        message: e.to_string(),
                    },
                };
                let _ = tx.send(msg).await;
            });
        }

        UpdateAction::UpdateEntry { id, patch } => {
            let tx = msg_tx.clone();
            let sync = services.sync.clone();
            tokio::spawn(async move {
                if let Err(e) = sync.update(id, &patch).await {
                    let _ = tx
                        .send(Message::QueueWriteFailed {
                            message: format!("Failed to update patient: {}", e),
                        })
                        .await;
                }
            });
        }

        UpdateAction::RemoveEntry { id } => {
            let tx = msg_tx.clone();
            let sync = services.sync.clone();
            tokio::spawn(async move {
                match sync.remove(id).await {
                    Ok(()) => info!("discharged queue entry {}", id),
                    Err(e) => {
                        let _ = tx
                            .send(Message::QueueWriteFailed {
                                message: format!("Failed to discharge patient: {}", e),
                            })
                            .await;
                    }
                }
            });
        }
    }
}

fn position_failed(watch_id: u64, err: Error) -> Message {
    Message::PositionFailed {
        watch_id,
        message: err.to_string(),
        ended: err.ends_position_watch(),
    }
}

async fn nearby_message<G: Geocoder + Sync>(
    geocoder: &G,
    origin: Coordinates,
    area: String,
) -> Message {
    match geocoder.find_nearby(origin).await {
        Ok(nearby) => Message::NearbyFound {
            origin,
            area,
            results: nearby.results,
            radius_meters: nearby.radius_meters,
        },
        Err(e) => Message::LookupFailed {
            message: e.to_string(),
        },
    }
}
