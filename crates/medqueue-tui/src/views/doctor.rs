use chrono::{DateTime, Local, Utc};
use medqueue_app::{AppState, Message};
use medqueue_core::{QueueEntry, Screen, Triage};

use crate::view::{ButtonVariant, IconName, Node, TextStyle};

pub(super) fn build(state: &AppState, now: DateTime<Local>) -> Node {
    let now = now.with_timezone(&Utc);

    let mut children = vec![
        Node::styled(
            format!("{} in queue", state.queue.len()),
            TextStyle::Heading,
        )
        .with_icon(IconName::Users),
    ];

    if state.queue.is_empty() {
        children.push(Node::styled("No patients waiting.", TextStyle::Muted));
    }
    children.extend(state.queue.iter().map(|entry| patient_card(entry, now)));

    children.push(Node::spacer());
    children.push(
        Node::button("home", "Log out", Message::Navigate(Screen::Landing))
            .variant(ButtonVariant::Secondary)
            .with_icon(IconName::ArrowLeft),
    );
    Node::column(children)
}

fn patient_card(entry: &QueueEntry, now: DateTime<Utc>) -> Node {
    let id = entry.id.0;

    let mut facts = Vec::new();
    if let Some(age) = entry.age {
        facts.push(format!("{age} yrs"));
    }
    facts.extend(entry.gender.clone());
    facts.extend(entry.hospital.clone());

    Node::card(
        &entry.name,
        vec![
            Node::styled(facts.join("  ·  "), TextStyle::Muted),
            Node::text(entry.complaint()).with_icon(IconName::Activity),
            Node::row(vec![
                Node::styled(
                    format!("Triage: {}", entry.triage.as_str().to_uppercase()),
                    triage_text(entry.triage),
                ),
                Node::styled(
                    format!("Waiting {} min", entry.waiting_minutes(now)),
                    TextStyle::Muted,
                )
                .with_icon(IconName::Clock),
            ]),
            Node::row(vec![
                Node::button(
                    format!("escalate-{id}"),
                    "Escalate",
                    Message::EscalateTriage(entry.id),
                )
                .variant(ButtonVariant::Secondary)
                .with_icon(IconName::Alert),
                Node::button(format!("discharge-{id}"), "Discharge", Message::Discharge(entry.id))
                    .variant(ButtonVariant::Danger)
                    .with_icon(IconName::Check),
            ]),
        ],
    )
}

pub(super) fn triage_text(triage: Triage) -> TextStyle {
    match triage {
        Triage::Green => TextStyle::Success,
        Triage::Yellow => TextStyle::Warning,
        Triage::Red => TextStyle::Danger,
    }
}
