//! Phoenix realtime channel for table change notifications.
//!
//! The socket joins `realtime:public:<table>` with a `postgres_changes`
//! filter for every event on the table, heartbeats on a fixed interval, and
//! forwards one [`ChangeEvent`] per change frame. Row payloads are ignored:
//! subscribers refetch the whole table anyway.
//!
//! The task ends when the feed receiver is dropped, or after the reconnect
//! budget is exhausted.

use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use medqueue_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use super::{ChangeEvent, ChangeKind};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Interval between `phoenix` heartbeats
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Initial reconnection backoff duration.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum reconnection backoff duration (cap).
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Consecutive failed reconnects before the feed is closed.
const MAX_RECONNECT_ATTEMPTS: u32 = 10;

/// One Phoenix channel frame
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PhoenixFrame {
    topic: String,
    event: String,
    #[serde(default)]
    payload: Value,
    #[serde(rename = "ref", default)]
    reference: Option<String>,
}

/// Websocket endpoint for the hosted project at `base`
pub(crate) fn socket_url(base: &Url, api_key: &str) -> Result<Url> {
    let mut url = base.clone();
    let scheme = match base.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => {
            return Err(Error::ConfigInvalid {
                message: format!("unsupported remote.url scheme '{other}'"),
            })
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| Error::config(format!("cannot switch {base} to {scheme}")))?;
    url.set_path("/realtime/v1/websocket");
    url.query_pairs_mut()
        .clear()
        .append_pair("apikey", api_key)
        .append_pair("vsn", "1.0.0");
    Ok(url)
}

fn topic_for(table: &str) -> String {
    format!("realtime:public:{table}")
}

fn join_frame(table: &str, api_key: &str, reference: u64) -> PhoenixFrame {
    PhoenixFrame {
        topic: topic_for(table),
        event: "phx_join".to_string(),
        payload: json!({
            "config": {
                "postgres_changes": [
                    { "event": "*", "schema": "public", "table": table }
                ]
            },
            "access_token": api_key,
        }),
        reference: Some(reference.to_string()),
    }
}

fn heartbeat_frame(reference: u64) -> PhoenixFrame {
    PhoenixFrame {
        topic: "phoenix".to_string(),
        event: "heartbeat".to_string(),
        payload: json!({}),
        reference: Some(reference.to_string()),
    }
}

/// What an incoming text frame means for the feed
#[derive(Debug, PartialEq)]
enum Incoming {
    Change(ChangeEvent),
    JoinRejected(String),
    Ignored,
}

fn classify_frame(text: &str, topic: &str) -> Incoming {
    let frame: PhoenixFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            trace!("realtime: unparseable frame ({e}): {text}");
            return Incoming::Ignored;
        }
    };
    if frame.topic != topic {
        return Incoming::Ignored;
    }

    match frame.event.as_str() {
        "postgres_changes" => {
            let kind = frame
                .payload
                .pointer("/data/type")
                .and_then(Value::as_str)
                .map(ChangeKind::parse)
                .unwrap_or(ChangeKind::Unknown);
            Incoming::Change(ChangeEvent::new(kind))
        }
        // Older servers push the row event directly on the channel
        "INSERT" | "UPDATE" | "DELETE" => {
            Incoming::Change(ChangeEvent::new(ChangeKind::parse(&frame.event)))
        }
        "phx_reply" => {
            let status = frame.payload.get("status").and_then(Value::as_str);
            if status == Some("error") {
                let reason = frame
                    .payload
                    .pointer("/response/reason")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown reason");
                Incoming::JoinRejected(reason.to_string())
            } else {
                Incoming::Ignored
            }
        }
        _ => Incoming::Ignored,
    }
}

/// Background task: connect, join, forward changes, reconnect on loss.
pub(crate) async fn run(
    ws_url: Url,
    api_key: String,
    table: String,
    tx: mpsc::UnboundedSender<ChangeEvent>,
) {
    let mut attempt: u32 = 0;
    loop {
        if tx.is_closed() {
            break;
        }

        match connect_ws(&ws_url).await {
            Ok(ws_stream) => {
                info!("realtime: connected, joining {}", topic_for(&table));
                attempt = 0;
                if !run_io_loop(ws_stream, &api_key, &table, &tx).await {
                    break;
                }
            }
            Err(err) => {
                warn!("realtime: connection attempt failed: {}", err);
            }
        }

        attempt += 1;
        if attempt > MAX_RECONNECT_ATTEMPTS {
            error!(
                "realtime: exceeded {} reconnection attempts, giving up",
                MAX_RECONNECT_ATTEMPTS
            );
            break;
        }

        let backoff = compute_backoff(attempt);
        warn!(
            "realtime: connection lost, retrying in {:?} (attempt {}/{})",
            backoff, attempt, MAX_RECONNECT_ATTEMPTS
        );
        tokio::select! {
            _ = tokio::time::sleep(backoff) => {}
            _ = tx.closed() => break,
        }
    }

    debug!("realtime task exiting");
}

/// Run one connection's select loop.
///
/// Returns `true` if the connection was lost and the caller should reconnect,
/// `false` once the feed receiver is gone.
async fn run_io_loop(
    ws_stream: WsStream,
    api_key: &str,
    table: &str,
    tx: &mpsc::UnboundedSender<ChangeEvent>,
) -> bool {
    let (mut ws_sink, mut ws_stream) = ws_stream.split();
    let topic = topic_for(table);
    let mut next_ref: u64 = 1;

    if let Err(err) = send_frame(&mut ws_sink, &join_frame(table, api_key, next_ref)).await {
        warn!("realtime: join failed: {}", err);
        return true;
    }

    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        match classify_frame(text.as_str(), &topic) {
                            Incoming::Change(event) => {
                                debug!("realtime: {:?} on {}", event.kind, topic);
                                if tx.send(event).is_err() {
                                    send_close(&mut ws_sink).await;
                                    return false;
                                }
                            }
                            Incoming::JoinRejected(reason) => {
                                error!("realtime: join rejected: {}", reason);
                            }
                            Incoming::Ignored => {}
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        debug!("realtime: received Close frame");
                        return true;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!("realtime: websocket read error: {}", err);
                        return true;
                    }
                    None => {
                        debug!("realtime: websocket stream ended");
                        return true;
                    }
                }
            }

            _ = heartbeat.tick() => {
                next_ref += 1;
                if let Err(err) = send_frame(&mut ws_sink, &heartbeat_frame(next_ref)).await {
                    warn!("realtime: heartbeat failed: {}", err);
                    return true;
                }
            }

            _ = tx.closed() => {
                debug!("realtime: feed dropped, closing socket");
                send_close(&mut ws_sink).await;
                return false;
            }
        }
    }
}

async fn connect_ws(url: &Url) -> Result<WsStream> {
    let (ws_stream, _response) = connect_async(url.as_str())
        .await
        .map_err(|err| Error::remote_protocol(format!("failed to connect to realtime: {err}")))?;
    Ok(ws_stream)
}

async fn send_frame(ws_sink: &mut SplitSink<WsStream, WsMessage>, frame: &PhoenixFrame) -> Result<()> {
    let json = serde_json::to_string(frame)?;
    ws_sink
        .send(WsMessage::Text(json.into()))
        .await
        .map_err(|e| Error::remote_protocol(e.to_string()))
}

/// Send a WebSocket Close frame, ignoring any write errors.
async fn send_close(ws_sink: &mut SplitSink<WsStream, WsMessage>) {
    let _ = ws_sink.send(WsMessage::Close(None)).await;
    let _ = ws_sink.close().await;
}

/// Exponential backoff for reconnection attempt `n`: `INITIAL_BACKOFF * 2^(n-1)`,
/// capped at `MAX_BACKOFF`.
fn compute_backoff(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1);
    let multiplier: u64 = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    let secs = INITIAL_BACKOFF.as_secs().saturating_mul(multiplier);
    Duration::from_secs(secs.min(MAX_BACKOFF.as_secs()))
}
