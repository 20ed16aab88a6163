//! Headless mode runner - main event loop without a terminal
//!
//! The render loop still builds the document so scripted keys go through the
//! same focus and input handling as the TUI. A second store subscriber turns
//! state changes into NDJSON events on stdout.

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use medqueue_app::{config::Settings, Engine, InputKey, Message};
use medqueue_core::prelude::*;
use medqueue_tui::{input::handle_key, SharedRenderLoop};

use super::{EventTracker, HeadlessEvent};

/// One line of scripted stdin input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `key <name>`: a single key, named as [`InputKey::parse`] accepts
    Key(InputKey),
    /// `type <text>`: every character of the rest of the line
    Type(String),
    /// `focus <node>`: move focus to a node by key
    Focus(String),
    /// `press <node>`: focus a node and hit Enter
    Press(String),
    /// `q` / `quit`
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (verb, rest) = match line.trim_start().split_once(' ') {
            Some((verb, rest)) => (verb, rest),
            None => (line.trim(), ""),
        };

        match verb {
            "q" | "quit" => Ok(Command::Quit),
            "key" => InputKey::parse(rest.trim())
                .map(Command::Key)
                .ok_or_else(|| format!("unknown key: {}", rest.trim())),
            "type" if !rest.is_empty() => Ok(Command::Type(rest.to_string())),
            "focus" if !rest.trim().is_empty() => Ok(Command::Focus(rest.trim().to_string())),
            "press" if !rest.trim().is_empty() => Ok(Command::Press(rest.trim().to_string())),
            _ => Err(format!("unknown command: {}", line.trim())),
        }
    }
}

/// Run in headless mode - output JSON events instead of a TUI
pub async fn run_headless(settings: Settings) -> Result<()> {
    info!("medqueue starting in HEADLESS mode");

    let mut engine = Engine::new(settings);

    // Registered first: the document is current before events go out
    let render_loop = medqueue_tui::attach(&mut engine.store, engine.settings.ui.icons);

    let mut tracker = EventTracker::new();
    for event in tracker.observe(engine.state()) {
        event.emit();
    }
    engine.store.subscribe(move |state| {
        for event in tracker.observe(state) {
            event.emit();
        }
    });

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(64);
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(cmd_tx);
    });

    HeadlessEvent::ready(engine.sync().store().name()).emit();
    engine.mark_ready();

    let result = headless_event_loop(&mut engine, &render_loop, cmd_rx).await;

    engine.shutdown().await;

    info!("medqueue headless mode exiting");
    result
}

/// Main headless event loop
async fn headless_event_loop(
    engine: &mut Engine,
    render_loop: &SharedRenderLoop,
    mut commands: mpsc::Receiver<Command>,
) -> Result<()> {
    let mut stdin_open = true;

    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        tokio::select! {
            msg = engine.msg_rx.recv() => match msg {
                Some(msg) => engine.process_message(msg),
                None => {
                    info!("Message channel closed");
                    break;
                }
            },
            cmd = commands.recv(), if stdin_open => match cmd {
                Some(cmd) => apply_command(cmd, engine, render_loop),
                None => {
                    // Keep serving remote updates until a signal ends the run
                    info!("stdin closed");
                    stdin_open = false;
                }
            },
        }
    }

    Ok(())
}

/// Apply one scripted command to the engine through the document
pub fn apply_command(cmd: Command, engine: &mut Engine, render_loop: &SharedRenderLoop) {
    match cmd {
        Command::Quit => engine.process_message(Message::Quit),
        Command::Key(key) => send_key(key, engine, render_loop),
        Command::Type(text) => {
            for c in text.chars() {
                send_key(InputKey::Char(c), engine, render_loop);
            }
        }
        Command::Focus(node) => {
            focus_node(&node, render_loop);
        }
        Command::Press(node) => {
            if focus_node(&node, render_loop) {
                send_key(InputKey::Enter, engine, render_loop);
            }
        }
    }
}

fn focus_node(node: &str, render_loop: &SharedRenderLoop) -> bool {
    let focused = render_loop.borrow_mut().document_mut().focus(node);
    if !focused {
        warn!("No focusable node '{}'", node);
        HeadlessEvent::error(format!("no focusable node: {node}"), false).emit();
    }
    focused
}

/// Each key is processed before the next is read; typing depends on the
/// document holding the previous keystroke's value.
fn send_key(key: InputKey, engine: &mut Engine, render_loop: &SharedRenderLoop) {
    let msg = {
        let mut render_loop = render_loop.borrow_mut();
        handle_key(key, render_loop.document_mut(), engine.state())
    };
    if let Some(msg) = msg {
        engine.process_message(msg);
    }
}

/// Read commands from stdin until EOF (blocking, runs on its own thread)
fn spawn_stdin_reader_blocking(cmd_tx: mpsc::Sender<Command>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match Command::parse(&line) {
            Ok(cmd) => {
                let quit = cmd == Command::Quit;
                if cmd_tx.blocking_send(cmd).is_err() || quit {
                    break;
                }
            }
            Err(e) => {
                warn!("Stdin: {}", e);
                HeadlessEvent::error(e, false).emit();
            }
        }
    }

    info!("Stdin reader exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use medqueue_app::Services;
    use medqueue_core::Screen;
    use medqueue_remote::{DevicePosition, MemoryQueueStore, ScriptedPosition};

    fn engine() -> Engine {
        let services = Services::in_memory(
            MemoryQueueStore::new(),
            DevicePosition::Scripted(ScriptedPosition::new()),
        );
        Engine::with_services(Settings::default(), services)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
        assert_eq!(Command::parse("key enter"), Ok(Command::Key(InputKey::Enter)));
        assert_eq!(
            Command::parse("key ctrl+c"),
            Ok(Command::Key(InputKey::CharCtrl('c')))
        );
        assert_eq!(Command::parse("press book"), Ok(Command::Press("book".into())));
        assert_eq!(Command::parse("focus age"), Ok(Command::Focus("age".into())));
    }

    #[test]
    fn test_parse_type_keeps_spaces() {
        assert_eq!(
            Command::parse("type Asha Rao"),
            Ok(Command::Type("Asha Rao".into()))
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(Command::parse("reload").is_err());
        assert!(Command::parse("key hyper").is_err());
        assert!(Command::parse("press").is_err());
    }

    #[tokio::test]
    async fn test_press_navigates_through_document() {
        let mut engine = engine();
        let render_loop = medqueue_tui::attach(&mut engine.store, engine.settings.ui.icons);

        apply_command(Command::Press("book".into()), &mut engine, &render_loop);

        assert_eq!(engine.state().screen, Screen::PatientWizard);
        assert_eq!(engine.state().wizard_step, 1);
    }

    #[tokio::test]
    async fn test_typing_fills_the_focused_input() {
        let mut engine = engine();
        let render_loop = medqueue_tui::attach(&mut engine.store, engine.settings.ui.icons);

        apply_command(Command::Press("book".into()), &mut engine, &render_loop);
        apply_command(Command::Type("Asha".into()), &mut engine, &render_loop);

        assert_eq!(engine.state().draft.name, "Asha");
        assert_eq!(
            render_loop.borrow().document().focused_key(),
            Some("name")
        );
    }

    #[tokio::test]
    async fn test_quit_command() {
        let mut engine = engine();
        let render_loop = medqueue_tui::attach(&mut engine.store, engine.settings.ui.icons);

        apply_command(Command::Quit, &mut engine, &render_loop);
        assert!(engine.should_quit());
    }
}
