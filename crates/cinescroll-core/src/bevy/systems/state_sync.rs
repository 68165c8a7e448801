//! State synchronization systems.
//!
//! Syncs engine state to the shared stores for host UI access.

use bevy::prelude::*;

use crate::bevy::CameraEngineRes;
use crate::store::StateStores;

/// System to sync playback progress to the state stores.
///
/// Runs every frame; the store only bumps its version on change.
pub fn sync_playback_state(engine: Res<CameraEngineRes>, state_stores: Res<StateStores>) {
    state_stores.playback.update(engine.summary());
}
