//! Wizard steps 2 and 3: live tracking, manual address search, hospital pick
//!
//! Position updates are tagged with the watch id that produced them. Anything
//! from a watch other than the active one is stale and dropped.

use medqueue_core::{Coordinates, DraftEdit, Hospital, LocationSearch, NearbyResults};
use tracing::{debug, info};

use crate::state::{step, LookupStage, Notice};
use crate::store::Store;

use super::wizard::go_to_step;
use super::{UpdateAction, UpdateResult};

/// Area recorded for bookings located by live tracking
pub const LIVE_LOCATION_AREA: &str = "Live Location";

pub fn handle_start_live(store: &mut Store) -> UpdateResult {
    let state = store.state();
    if !state.on_wizard_step(step::LOCATION)
        || state.watch_id.is_some()
        || state.pending_lookup.is_some()
    {
        return UpdateResult::none();
    }

    let watch_id = store.batch(|s| {
        s.clear_notice();
        s.set_pending_lookup(Some(LookupStage::AwaitingFix));
        s.begin_watch()
    });
    UpdateResult::action(UpdateAction::StartWatch { watch_id })
}

pub fn handle_submit_address(store: &mut Store) -> UpdateResult {
    let state = store.state();
    if !state.on_wizard_step(step::LOCATION) {
        return UpdateResult::none();
    }
    if !matches!(state.pending_lookup, None | Some(LookupStage::AwaitingFix)) {
        return UpdateResult::none();
    }

    let query = state.forms.address.trim().to_string();
    if query.is_empty() {
        return UpdateResult::none();
    }

    store.batch(|s| {
        s.clear_notice();
        s.set_pending_lookup(Some(LookupStage::ResolvingAddress));
    });
    UpdateResult::action(UpdateAction::ResolveAddress { query })
}

/// First fix on step 2 runs the nearby search once; later fixes on step 3
/// only move the user marker.
pub fn handle_position_update(
    store: &mut Store,
    watch_id: u64,
    coords: Coordinates,
) -> UpdateResult {
    if store.state().watch_id != Some(watch_id) {
        debug!("dropped fix from stale watch {}", watch_id);
        return UpdateResult::none();
    }

    let state = store.state();
    if state.on_wizard_step(step::LOCATION) {
        if !matches!(state.pending_lookup, None | Some(LookupStage::AwaitingFix)) {
            return UpdateResult::none();
        }
        store.set_pending_lookup(Some(LookupStage::FindingNearby));
        UpdateResult::action(UpdateAction::FindNearby {
            origin: coords,
            area: LIVE_LOCATION_AREA.to_string(),
        })
    } else if state.on_wizard_step(step::HOSPITALS) {
        store.move_user_marker(coords);
        UpdateResult::none()
    } else {
        UpdateResult::none()
    }
}

pub fn handle_position_failed(
    store: &mut Store,
    watch_id: u64,
    message: String,
    ended: bool,
) -> UpdateResult {
    if store.state().watch_id != Some(watch_id) {
        return UpdateResult::none();
    }

    let awaiting_fix = store.state().pending_lookup == Some(LookupStage::AwaitingFix);
    if ended {
        info!("position watch {} ended: {}", watch_id, message);
        let watch = store.batch(|s| {
            if awaiting_fix {
                s.set_pending_lookup(None);
            }
            s.set_notice(Notice::error(message).blocking());
            s.end_watch()
        });
        UpdateResult::none().stopping(watch)
    } else {
        if awaiting_fix {
            store.set_notice(Notice::warning(message));
        }
        UpdateResult::none()
    }
}

pub fn handle_address_not_found(store: &mut Store, query: String) -> UpdateResult {
    if store.state().pending_lookup != Some(LookupStage::ResolvingAddress) {
        return UpdateResult::none();
    }

    debug!("no coordinates for {:?}", query);
    store.batch(|s| {
        s.set_pending_lookup(None);
        s.set_notice(Notice::warning("Location not found"));
    });
    UpdateResult::none()
}

/// Store the candidates and move to the map step
pub fn handle_nearby_found(
    store: &mut Store,
    origin: Coordinates,
    area: String,
    results: Vec<Hospital>,
    radius_meters: u32,
) -> UpdateResult {
    let state = store.state();
    if !state.on_wizard_step(step::LOCATION) || state.pending_lookup.is_none() {
        debug!("dropped nearby results for {:?}", area);
        return UpdateResult::none();
    }

    info!(
        "{} hospitals within {}m of {:?}",
        results.len(),
        radius_meters,
        area
    );
    let search = LocationSearch::new(
        origin,
        NearbyResults {
            results,
            radius_meters,
        },
    );
    store.batch(|s| {
        s.set_location_search(Some(search));
        s.stage_draft(DraftEdit::Area(area));
        s.set_pending_lookup(None);
        go_to_step(s, step::HOSPITALS);
    });
    UpdateResult::none()
}

pub fn handle_lookup_failed(store: &mut Store, message: String) -> UpdateResult {
    if store.state().pending_lookup.is_none() {
        return UpdateResult::none();
    }

    store.batch(|s| {
        s.set_pending_lookup(None);
        s.set_notice(Notice::error(message));
    });
    UpdateResult::none()
}

/// Record the hospital and move on to symptoms. Tracking has served its
/// purpose once a hospital is chosen.
pub fn handle_select_hospital(store: &mut Store, index: usize) -> UpdateResult {
    let state = store.state();
    if !state.on_wizard_step(step::HOSPITALS) {
        return UpdateResult::none();
    }
    let Some(hospital) = state
        .location_search
        .as_ref()
        .and_then(|search| search.results.get(index))
    else {
        return UpdateResult::none();
    };

    let name = hospital.name.clone();
    let watch = store.batch(|s| {
        let watch = s.end_watch();
        s.stage_draft(DraftEdit::Hospital(name));
        go_to_step(s, step::SYMPTOMS);
        watch
    });
    UpdateResult::none().stopping(watch)
}

pub fn handle_change_location(store: &mut Store) -> UpdateResult {
    if !store.state().on_wizard_step(step::HOSPITALS) {
        return UpdateResult::none();
    }

    let watch = store.batch(|s| {
        let watch = s.end_watch();
        go_to_step(s, step::LOCATION);
        watch
    });
    UpdateResult::none().stopping(watch)
}
