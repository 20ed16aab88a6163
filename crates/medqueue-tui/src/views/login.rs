use medqueue_app::{AppState, Binding, Message};

use crate::view::{ButtonVariant, IconName, Node, TextStyle};

pub(super) fn build(state: &AppState) -> Node {
    let who = state
        .auth_target
        .map_or("team", |role| role.title());

    Node::column(vec![
        Node::styled(format!("Sign in as {who}"), TextStyle::Heading).with_icon(IconName::Lock),
        Node::styled("Enter the access code for the hospital team.", TextStyle::Muted),
        Node::input("passcode", "Access code", Binding::Passcode, &state.forms.passcode)
            .masked()
            .autofocus()
            .on_submit(Message::SubmitPasscode),
        Node::spacer(),
        Node::row(vec![
            Node::button("back", "Back", Message::Back)
                .variant(ButtonVariant::Secondary)
                .with_icon(IconName::ArrowLeft),
            Node::button("login", "Unlock", Message::SubmitPasscode).with_icon(IconName::Lock),
        ]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::NodeKind;
    use medqueue_core::{AuthRole, Screen};

    #[test]
    fn test_passcode_is_masked_and_submits() {
        let mut state = AppState::new();
        state.screen = Screen::LoginView;
        state.auth_target = Some(AuthRole::Staff);

        let root = build(&state);
        let NodeKind::Input { masked, submit, .. } = &root.find("passcode").unwrap().kind else {
            unreachable!();
        };
        assert!(*masked);
        assert_eq!(submit, &Some(Message::SubmitPasscode));
        assert!(root.plain_text().contains("Sign in as Staff"));
    }
}
