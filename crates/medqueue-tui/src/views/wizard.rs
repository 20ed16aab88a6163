//! Booking wizard, one builder per step

use medqueue_app::handler::SYMPTOM_CHIPS;
use medqueue_app::{step, AppState, Binding, LookupStage, Message};
use medqueue_core::{DoctorPref, DraftField, Gender, Screen};

use crate::view::{ButtonVariant, IconName, MapMarker, Node, TextStyle};

pub(super) fn build(state: &AppState) -> Node {
    let body = match state.wizard_step {
        step::DETAILS => details(state),
        step::LOCATION => location(state),
        step::HOSPITALS => hospitals(state),
        step::SYMPTOMS => symptoms(state),
        step::QUOTE => quote(state),
        _ => confirmation(state),
    };

    let mut children = vec![progress(state.wizard_step)];
    children.extend(body);
    Node::column(children)
}

/// `●●●○○○`
fn progress(current: u8) -> Node {
    let dots: String = (1..=step::COUNT)
        .map(|n| if n <= current { '●' } else { '○' })
        .collect();
    Node::styled(dots, TextStyle::Accent)
}

fn back_button() -> Node {
    Node::button("back", "Back", Message::Back)
        .variant(ButtonVariant::Secondary)
        .with_icon(IconName::ArrowLeft)
}

fn details(state: &AppState) -> Vec<Node> {
    let draft = &state.draft;

    let genders = Gender::ALL
        .into_iter()
        .map(|g| {
            Node::button(
                format!("gender-{}", g.as_str().to_ascii_lowercase()),
                g.as_str(),
                Message::SelectGender(g),
            )
            .variant(ButtonVariant::Choice {
                selected: draft.gender == Some(g),
            })
        })
        .collect();

    let prefs = DoctorPref::ALL
        .into_iter()
        .map(|p| {
            Node::button(
                format!("pref-{}", p.as_str().to_ascii_lowercase()),
                p.as_str(),
                Message::SelectDoctorPref(p),
            )
            .variant(ButtonVariant::Choice {
                selected: draft.doctor_pref == Some(p),
            })
        })
        .collect();

    vec![
        Node::styled("Patient details", TextStyle::Heading).with_icon(IconName::User),
        Node::input("name", "Full name", Binding::Draft(DraftField::Name), &draft.name)
            .placeholder("e.g. Asha Kumar")
            .autofocus(),
        Node::input("age", "Age", Binding::Draft(DraftField::Age), &draft.age)
            .placeholder("Years")
            .numeric(),
        Node::styled("Gender", TextStyle::Muted),
        Node::row(genders),
        Node::styled("Doctor preference", TextStyle::Muted),
        Node::row(prefs),
        Node::spacer(),
        Node::row(vec![
            back_button(),
            Node::button("next", "Next", Message::SubmitDetails).with_icon(IconName::ArrowRight),
        ]),
    ]
}

fn location(state: &AppState) -> Vec<Node> {
    let pending = state.pending_lookup;
    // A typed address may take over from live tracking that has no fix yet
    let can_search = matches!(pending, None | Some(LookupStage::AwaitingFix));

    let mut nodes = vec![
        Node::styled("Where are you?", TextStyle::Heading).with_icon(IconName::MapPin),
        Node::button("live", "Use Live Location", Message::StartLiveLocation)
            .enabled(pending.is_none() && state.watch_id.is_none())
            .with_icon(IconName::Crosshair),
        Node::styled("or", TextStyle::Muted),
        Node::input("address", "Enter your area", Binding::Address, &state.forms.address)
            .placeholder("e.g. Indiranagar")
            .on_submit(Message::SubmitAddress),
        Node::button("search", "Search", Message::SubmitAddress)
            .variant(ButtonVariant::Secondary)
            .enabled(can_search)
            .with_icon(IconName::Search),
    ];

    if let Some(stage) = pending {
        nodes.push(Node::styled(stage.label(), TextStyle::Muted).with_icon(IconName::Clock));
    }

    nodes.push(Node::spacer());
    nodes.push(Node::row(vec![back_button()]));
    nodes
}

fn hospitals(state: &AppState) -> Vec<Node> {
    let Some(search) = &state.location_search else {
        return vec![
            Node::styled("No search results.", TextStyle::Muted),
            Node::row(vec![back_button(), change_location()]),
        ];
    };

    let mut nodes = vec![
        Node::styled("Nearby hospitals", TextStyle::Heading).with_icon(IconName::Hospital),
        Node::styled(search.radius_notice(), TextStyle::Muted),
        Node::map(
            search.center,
            search.user,
            search
                .results
                .iter()
                .map(|h| MapMarker {
                    label: h.name.clone(),
                    coords: h.coords,
                })
                .collect(),
        ),
    ];

    if search.results.is_empty() {
        nodes.push(Node::styled("No hospitals found nearby.", TextStyle::Warning));
    }
    for (index, hospital) in search.results.iter().enumerate() {
        let label = format!(
            "{}  ·  {}  ·  {:.1} km",
            hospital.name,
            hospital.kind,
            search.distance_km(hospital)
        );
        nodes.push(
            Node::button(format!("hospital-{index}"), label, Message::SelectHospital(index))
                .variant(ButtonVariant::Secondary)
                .with_icon(IconName::Hospital),
        );
    }

    nodes.push(Node::spacer());
    nodes.push(Node::row(vec![back_button(), change_location()]));
    nodes
}

fn change_location() -> Node {
    Node::button("change", "Change Location", Message::ChangeLocation)
        .variant(ButtonVariant::Secondary)
        .with_icon(IconName::MapPin)
}

fn symptoms(state: &AppState) -> Vec<Node> {
    let chip = |(i, name): (usize, &&'static str)| {
        Node::button(format!("chip-{i}"), *name, Message::AddSymptom(name.to_string()))
            .variant(ButtonVariant::Secondary)
    };
    let (first, second) = SYMPTOM_CHIPS.split_at(4);

    vec![
        Node::styled("What brings you in?", TextStyle::Heading).with_icon(IconName::Activity),
        Node::input(
            "symptoms",
            "Describe your symptoms",
            Binding::Draft(DraftField::Symptoms),
            &state.draft.symptoms,
        )
        .placeholder("e.g. Fever since yesterday")
        .autofocus(),
        Node::styled("Quick add", TextStyle::Muted),
        Node::row(first.iter().enumerate().map(chip).collect()),
        Node::row(
            second
                .iter()
                .enumerate()
                .map(|(i, name)| chip((i + first.len(), name)))
                .collect(),
        ),
        Node::spacer(),
        Node::row(vec![
            back_button(),
            Node::button("next", "Next", Message::SubmitSymptoms).with_icon(IconName::ArrowRight),
        ]),
    ]
}

fn quote(state: &AppState) -> Vec<Node> {
    let draft = &state.draft;
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    let line = |label: &str, value: String| Node::text(format!("{label:<12}{value}"));
    let booking = &state.settings.booking;

    let confirm_label = if state.submitting {
        "Confirming..."
    } else {
        "Confirm & Get Token"
    };

    vec![
        Node::styled("Review & pay", TextStyle::Heading).with_icon(IconName::Wallet),
        Node::card(
            "Summary",
            vec![
                line("Name", or_dash(&draft.name)),
                line("Age", or_dash(&draft.age)),
                line(
                    "Gender",
                    draft.gender.map_or("-".to_string(), |g| g.to_string()),
                ),
                line(
                    "Doctor",
                    draft
                        .doctor_pref
                        .map_or("-".to_string(), |p| p.describe().to_string()),
                ),
                line("Area", or_dash(&draft.area)),
                line("Hospital", or_dash(&draft.hospital)),
                line("Symptoms", or_dash(&draft.symptoms)),
            ],
        ),
        Node::styled(
            format!("Consultation fee  {}", booking.format_amount(booking.fee)),
            TextStyle::Strong,
        )
        .with_icon(IconName::Wallet),
        Node::spacer(),
        Node::row(vec![
            back_button().enabled(!state.submitting),
            Node::button("confirm", confirm_label, Message::ConfirmBooking)
                .enabled(!state.submitting)
                .with_icon(IconName::Check),
        ]),
    ]
}

fn confirmation(state: &AppState) -> Vec<Node> {
    let mut nodes = vec![
        Node::styled("Booking confirmed", TextStyle::Success).with_icon(IconName::Check),
    ];

    match &state.confirmation {
        Some(confirmation) => {
            nodes.push(Node::styled("Your queue token", TextStyle::Muted));
            nodes.push(
                Node::styled(&confirmation.token, TextStyle::Title).with_icon(IconName::Ticket),
            );
            nodes.push(
                Node::text(format!(
                    "Estimated wait: ~{} min",
                    confirmation.wait_minutes
                ))
                .with_icon(IconName::Clock),
            );
        }
        None => nodes.push(Node::styled("Token unavailable", TextStyle::Warning)),
    }

    if !state.draft.hospital.is_empty() {
        nodes.push(Node::text(&state.draft.hospital).with_icon(IconName::Hospital));
    }

    nodes.push(Node::spacer());
    nodes.push(
        Node::button("home", "Back to Home", Message::Navigate(Screen::Landing))
            .with_icon(IconName::ArrowLeft)
            .autofocus(),
    );
    nodes
}
