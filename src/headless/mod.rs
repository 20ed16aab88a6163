//! Headless mode - JSON event output for scripted runs
//!
//! Runs the engine without a terminal and writes structured events to stdout
//! so test scripts never have to scrape ANSI output.
//!
//! # Event Format
//!
//! Events are NDJSON (newline-delimited JSON), one per line. Each event has
//! an "event" field naming its type, plus event-specific data.
//!
//! # Example Output
//!
//! ```json
//! {"event":"ready","backend":"memory","timestamp":1772366400000}
//! {"event":"queue_replaced","count":3,"ids":[1,2,3],"timestamp":1772366400050}
//! {"event":"screen_changed","screen":"patient","step":1,"timestamp":1772366401000}
//! {"event":"notice","level":"warning","message":"Please fill in all details.","blocking":false,"timestamp":1772366402000}
//! ```

pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use medqueue_app::{AppState, NoticeLevel};
use medqueue_core::{QueueEntry, Screen};

/// Events emitted in headless mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Engine is up and the queue sync has been released
    Ready { backend: String, timestamp: i64 },

    /// Screen or wizard step changed
    ScreenChanged {
        screen: String,
        /// Wizard step, only on the patient screen
        #[serde(skip_serializing_if = "Option::is_none")]
        step: Option<u8>,
        timestamp: i64,
    },

    /// Queue contents changed
    QueueReplaced {
        count: usize,
        ids: Vec<i64>,
        timestamp: i64,
    },

    /// A notice was shown
    Notice {
        level: String,
        message: String,
        blocking: bool,
        timestamp: i64,
    },

    /// Booking confirmed with a token
    BookingConfirmed {
        entry_id: i64,
        token: String,
        wait_minutes: u32,
        timestamp: i64,
    },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn ready(backend: &str) -> Self {
        Self::Ready {
            backend: backend.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn screen_changed(screen: Screen, step: Option<u8>) -> Self {
        Self::ScreenChanged {
            screen: screen.label().to_string(),
            step,
            timestamp: Self::now(),
        }
    }

    pub fn queue_replaced(ids: Vec<i64>) -> Self {
        Self::QueueReplaced {
            count: ids.len(),
            ids,
            timestamp: Self::now(),
        }
    }

    pub fn notice(level: NoticeLevel, message: &str, blocking: bool) -> Self {
        let level = match level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        Self::Notice {
            level: level.to_string(),
            message: message.to_string(),
            blocking,
            timestamp: Self::now(),
        }
    }

    pub fn booking_confirmed(entry_id: i64, token: &str, wait_minutes: u32) -> Self {
        Self::BookingConfirmed {
            entry_id,
            token: token.to_string(),
            wait_minutes,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }
}

/// Turns store notifications into events by diffing against the last state
/// it saw. Only changes produce events, so a notification that touched
/// nothing interesting emits nothing.
#[derive(Debug, Default)]
pub struct EventTracker {
    screen: Option<(Screen, Option<u8>)>,
    queue: Option<Vec<QueueEntry>>,
    notice: Option<(String, bool)>,
    confirmed: Option<i64>,
}

impl EventTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, state: &AppState) -> Vec<HeadlessEvent> {
        let mut events = Vec::new();

        let step = (state.screen == Screen::PatientWizard).then_some(state.wizard_step);
        if self.screen != Some((state.screen, step)) {
            self.screen = Some((state.screen, step));
            events.push(HeadlessEvent::screen_changed(state.screen, step));
        }

        if self.queue.as_ref() != Some(&state.queue) {
            // Store starts empty; the first real snapshot is the interesting one
            let initial_empty = self.queue.is_none() && state.queue.is_empty();
            self.queue = Some(state.queue.clone());
            if !initial_empty {
                let ids = state.queue.iter().map(|e| e.id.0).collect();
                events.push(HeadlessEvent::queue_replaced(ids));
            }
        }

        let notice = state
            .notice
            .as_ref()
            .map(|n| (n.message.clone(), n.blocking));
        if notice != self.notice {
            if let Some(n) = &state.notice {
                events.push(HeadlessEvent::notice(n.level, &n.message, n.blocking));
            }
            self.notice = notice;
        }

        let confirmed = state.confirmation.as_ref().map(|c| c.entry_id.0);
        if confirmed != self.confirmed {
            if let Some(c) = &state.confirmation {
                events.push(HeadlessEvent::booking_confirmed(
                    c.entry_id.0,
                    &c.token,
                    c.wait_minutes,
                ));
            }
            self.confirmed = confirmed;
        }

        events
    }
}
