//! Camera entity systems.

use bevy::prelude::*;

use crate::bevy::{CinematicCamera, LatestCameraFrame, MainCamera};

/// Makes sure a `MainCamera` entity exists once the rig is ready.
///
/// Reuses an existing camera entity; spawns a bare camera node otherwise.
pub fn setup_camera_node(
    mut commands: Commands,
    existing: Query<Entity, With<MainCamera>>,
    missing_state: Query<Entity, (With<MainCamera>, Without<CinematicCamera>)>,
) {
    if existing.is_empty() {
        commands.spawn((MainCamera, CinematicCamera::default(), Transform::default()));
        tracing::info!("[camera] no camera found, default camera spawned");
        return;
    }
    for entity in &missing_state {
        commands.entity(entity).insert(CinematicCamera::default());
    }
}

/// System to write the latest engine pose onto the camera.
pub fn apply_camera_pose(
    latest: Res<LatestCameraFrame>,
    mut cameras: Query<(&mut Transform, &mut CinematicCamera), With<MainCamera>>,
) {
    let Some(frame) = latest.0.as_ref() else {
        return;
    };
    for (mut transform, mut camera) in &mut cameras {
        transform.translation = frame.position;
        transform.rotation = frame.orientation;
        camera.base = frame.base;
        camera.look = frame.look;
    }
}
