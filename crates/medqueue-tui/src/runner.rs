//! Main TUI runner - entry point and event loop

use medqueue_app::config::Settings;
use medqueue_app::Engine;
use medqueue_core::prelude::*;

use crate::render::{self, Viewport};
use crate::render_loop::{self, SharedRenderLoop};
use crate::{event, input, terminal};

/// Run the TUI until the user quits or a signal arrives
pub async fn run(settings: Settings) -> Result<()> {
    let mut term = terminal::init().context("entering the TUI")?;

    let mut engine = Engine::new(settings);
    let render_loop = render_loop::attach(&mut engine.store, engine.settings.ui.icons);
    info!(
        "medqueue TUI starting (queue backend: {})",
        engine.sync().store().name()
    );

    let result = run_loop(&mut term, &mut engine, &render_loop);

    engine.shutdown().await;
    let restored = terminal::restore().context("leaving the TUI");

    // A loop failure is the more useful report; restore errors are logged above
    result.and(restored)
}

/// Main event loop
fn run_loop(
    term: &mut ratatui::DefaultTerminal,
    engine: &mut Engine,
    render_loop: &SharedRenderLoop,
) -> Result<()> {
    let mut viewport = Viewport::default();
    let mut first_frame = true;

    while !engine.should_quit() {
        // Completions from background tasks and the signal handler
        engine.drain_pending_messages();

        term.draw(|frame| render::view(frame, &render_loop.borrow(), &mut viewport))
            .map_err(|e| Error::terminal(e.to_string()))?;

        if first_frame {
            // The initial fetch waits for something to be on screen
            engine.mark_ready();
            first_frame = false;
        }

        let Some(key) = event::poll()? else {
            continue;
        };

        // The borrow must end before dispatching: the dispatch re-renders
        let message = {
            let mut render_loop = render_loop.borrow_mut();
            input::handle_key(key, render_loop.document_mut(), engine.state())
        };
        if let Some(message) = message {
            engine.process_message(message);
        }
    }

    Ok(())
}
