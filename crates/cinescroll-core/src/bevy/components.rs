//! ECS Components for the camera engine.

use bevy::prelude::*;

use crate::mouse_look::LookOffset;
use crate::pose::Pose;

/// Marker for the camera the engine drives.
#[derive(Component, Debug, Clone, Default)]
pub struct MainCamera;

/// Pose components last applied to the camera.
#[derive(Component, Debug, Clone, Default)]
pub struct CinematicCamera {
    /// Authored pose before the look offset.
    pub base: Pose,
    pub look: LookOffset,
}
