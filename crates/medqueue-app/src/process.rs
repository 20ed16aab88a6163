//! Message processing: the update loop plus action dispatch

use tokio::sync::mpsc;

use crate::actions::{handle_action, WatchMap};
use crate::handler;
use crate::message::Message;
use crate::services::Services;
use crate::store::Store;

/// Run `message` and any follow-up messages through [`handler::update`],
/// dispatching actions in the order each handler returned them.
pub fn process_message(
    store: &mut Store,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    services: &Services,
    watches: &mut WatchMap,
) {
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(store, m);
        for action in result.actions {
            handle_action(action, msg_tx, services, watches);
        }
        msg = result.message;
    }
}
