use medqueue_app::{AppState, Message};
use medqueue_core::{AuthRole, Screen};

use crate::view::{ButtonVariant, IconName, Node, TextStyle};

pub(super) fn build(state: &AppState) -> Node {
    let waiting = match state.queue.len() {
        0 => "No one is waiting right now".to_string(),
        1 => "1 patient waiting".to_string(),
        n => format!("{n} patients waiting"),
    };

    Node::column(vec![
        Node::styled("Skip the waiting room", TextStyle::Title).with_icon(IconName::Hospital),
        Node::styled(
            "Find a hospital nearby, describe your symptoms and get a queue token.",
            TextStyle::Muted,
        ),
        Node::spacer(),
        Node::card(
            "Patients",
            vec![
                Node::text(waiting).with_icon(IconName::Users),
                Node::button("book", "Book a Visit", Message::Navigate(Screen::PatientWizard))
                    .with_icon(IconName::User)
                    .autofocus(),
            ],
        ),
        Node::card(
            "Hospital team",
            vec![Node::row(vec![
                Node::button("doctor", "Doctor", Message::ChooseRole(AuthRole::Doctor))
                    .variant(ButtonVariant::Secondary)
                    .with_icon(IconName::Doctor),
                Node::button("staff", "Staff", Message::ChooseRole(AuthRole::Staff))
                    .variant(ButtonVariant::Secondary)
                    .with_icon(IconName::Staff),
            ])],
        ),
    ])
}
