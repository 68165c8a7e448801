//! Engine tick systems.

use bevy::prelude::*;

use crate::bevy::{CameraEngineRes, CameraEventWriters, LatestCameraFrame};

/// System to advance the engine by the frame delta.
pub fn tick_camera_engine(
    time: Res<Time>,
    mut engine: ResMut<CameraEngineRes>,
    mut latest: ResMut<LatestCameraFrame>,
) {
    let frame = engine.tick(time.delta_secs_f64() * 1000.0);
    latest.0 = Some(frame);
}

/// System to forward the events of the latest tick as Bevy messages.
pub fn forward_camera_events(latest: Res<LatestCameraFrame>, mut writers: CameraEventWriters) {
    let Some(frame) = latest.0.as_ref() else {
        return;
    };
    for event in &frame.events {
        writers.write(event);
    }
}
