//! Bevy integration for the camera engine.
//!
//! This module drives `CameraEngine` from the Bevy schedule: host commands
//! and mouse/touch input go in, the sampled pose is written to the main
//! camera's `Transform`, and bus topics are mirrored as ECS messages.

pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_utils;

pub use components::*;
pub use events::*;
pub use plugin::{CinescrollHeadlessPlugin, CinescrollPlugin, RigState};
pub use resources::*;
pub use systems::{apply_camera_pose, setup_camera_node};
