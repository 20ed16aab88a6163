use chrono::{DateTime, Local};
use medqueue_app::stats::{RoomStatus, ROOMS};
use medqueue_app::{AppState, Message, QueueStats};
use medqueue_core::{Screen, Triage};

use super::doctor::triage_text;
use crate::view::{BarItem, ButtonVariant, IconName, Node, TextStyle};

pub(super) fn build(state: &AppState, now: DateTime<Local>) -> Node {
    let stats = QueueStats::compute_at(&state.queue, now);
    let booking = &state.settings.booking;

    let average_wait = stats
        .average_wait_minutes
        .map_or("-".to_string(), |m| format!("{m} min"));

    let mut children = vec![Node::row(vec![
        figure("Revenue", booking.format_amount(stats.revenue), IconName::Wallet),
        figure("Pending", stats.pending.to_string(), IconName::Users),
        figure("Today", stats.registered_today.to_string(), IconName::Activity),
        figure("Avg wait", average_wait, IconName::Clock),
    ])];

    if stats.high_load() {
        children.push(
            Node::styled(
                format!("High load: {} patients pending", stats.pending),
                TextStyle::Warning,
            )
            .with_icon(IconName::Alert),
        );
    }

    children.push(Node::card(
        "Hourly traffic",
        vec![Node::bars(
            stats
                .traffic
                .iter()
                .map(|bucket| BarItem {
                    label: bucket.label.to_string(),
                    value: bucket.count as u64,
                })
                .collect(),
        )],
    ));

    let triage = [
        (Triage::Red, stats.triage.red),
        (Triage::Yellow, stats.triage.yellow),
        (Triage::Green, stats.triage.green),
    ]
    .into_iter()
    .map(|(level, count)| Node::styled(format!("{:<8}{count}", level.as_str()), triage_text(level)))
    .collect();

    let rooms = ROOMS
        .iter()
        .map(|room| {
            let style = match room.status {
                RoomStatus::Occupied => TextStyle::Danger,
                RoomStatus::Available => TextStyle::Success,
                RoomStatus::Cleaning => TextStyle::Warning,
            };
            Node::styled(format!("{:<8}{}", room.name, room.status.label()), style)
        })
        .collect();

    children.push(Node::row(vec![
        Node::card("Triage", triage),
        Node::card("Rooms", rooms),
    ]));
    children.push(Node::spacer());
    children.push(
        Node::button("home", "Log out", Message::Navigate(Screen::Landing))
            .variant(ButtonVariant::Secondary)
            .with_icon(IconName::ArrowLeft)
            .autofocus(),
    );

    Node::column(children)
}

fn figure(label: &str, value: String, icon: IconName) -> Node {
    Node::card(
        label,
        vec![Node::styled(value, TextStyle::Title).with_icon(icon)],
    )
}
