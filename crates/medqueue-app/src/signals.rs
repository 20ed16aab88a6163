//! Process signals end the run the same way the quit key does

use medqueue_core::prelude::*;
use tokio::sync::mpsc;

use crate::message::Message;

/// Forward the first interrupt or terminate signal to the engine as
/// [`Message::Quit`]
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        match shutdown_signal().await {
            Ok(name) => {
                info!("{name} received, quitting");
                if tx.send(Message::Quit).await.is_err() {
                    debug!("engine already gone");
                }
            }
            Err(e) => error!("cannot listen for shutdown signals: {e}"),
        }
    });
}

/// Resolves with the signal's name
#[cfg(unix)]
async fn shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    })
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl+C")
}
