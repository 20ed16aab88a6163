//! View Resolver: one builder per screen
//!
//! Every builder is a pure function of [`AppState`] (and the clock, for the
//! screens that show waiting times). The notice, when there is one, is added
//! as the last child of the root so every screen shows it the same way.

mod doctor;
mod landing;
mod login;
mod staff;
mod wizard;

use chrono::{DateTime, Local};
use medqueue_app::AppState;
use medqueue_core::Screen;

use crate::view::Node;

/// Build the tree for the current screen
pub fn resolve(state: &AppState) -> Node {
    resolve_at(state, Local::now())
}

/// Build the tree as of `now`
pub fn resolve_at(state: &AppState, now: DateTime<Local>) -> Node {
    let mut root = match state.screen {
        Screen::Landing => landing::build(state),
        Screen::PatientWizard => wizard::build(state),
        Screen::DoctorView => doctor::build(state, now),
        Screen::StaffView => staff::build(state, now),
        Screen::LoginView => login::build(state),
    };

    if let Some(notice) = &state.notice {
        root.children
            .push(Node::notice(notice.level, &notice.message, notice.blocking));
    }
    root
}

/// Title shown in the header bar
pub fn title(state: &AppState) -> String {
    match state.screen {
        Screen::Landing => "MedQueue".to_string(),
        Screen::PatientWizard => format!(
            "Book a Visit · Step {} of {}",
            state.wizard_step,
            medqueue_app::step::COUNT
        ),
        Screen::DoctorView => "Doctor Dashboard".to_string(),
        Screen::StaffView => "Staff Analytics".to_string(),
        Screen::LoginView => match state.auth_target {
            Some(role) => format!("{} Login", role.title()),
            None => "Login".to_string(),
        },
    }
}
