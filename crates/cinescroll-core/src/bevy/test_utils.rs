//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` + `CinescrollHeadlessPlugin` for testing camera logic
//! without a rendering or windowing backend.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::bevy::plugin::CinescrollHeadlessPlugin;
use crate::bevy::resources::{CameraCommand, CameraEngineRes, CommandQueue};
use crate::catalog::Catalog;
use crate::clip::{AnimationClip, CameraRig, KeyframeTrack};
use crate::engine::CameraEngine;
use crate::store::StateStores;

/// Fixed frame step fed to `Time` on every update.
pub const FRAME: Duration = Duration::from_millis(16);

/// A headless Bevy app wrapper for testing.
pub(crate) struct TestApp {
    pub app: App,
}

impl TestApp {
    pub fn new(catalog: Catalog) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::state::app::StatesPlugin);
        app.add_plugins(bevy::input::InputPlugin);
        app.add_plugins(CinescrollHeadlessPlugin {
            catalog,
            command_queue: None,
            state_stores: None,
        });
        // Every update advances time by exactly one frame.
        app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
        // Run one update to initialize all resources and state
        app.update();
        Self { app }
    }

    /// Run a single frame update.
    pub fn update(&mut self) {
        self.app.update();
    }

    /// Run updates covering at least `ms` of engine time.
    pub fn run_for(&mut self, ms: f64) {
        let frames = (ms / FRAME.as_secs_f64() / 1000.0).ceil() as usize;
        for _ in 0..frames {
            self.app.update();
        }
    }

    /// Push a command to the command queue.
    pub fn push_command(&mut self, cmd: CameraCommand) {
        self.app.world().resource::<CommandQueue>().push(cmd);
    }

    /// Load a rig and run updates until the camera node exists.
    pub fn load_rig(&mut self, rig: CameraRig) {
        self.push_command(CameraCommand::LoadRig { rig });
        self.update();
        // Extra update to process OnEnter systems
        self.update();
    }

    pub fn engine(&self) -> &CameraEngine {
        self.app.world().resource::<CameraEngineRes>()
    }

    pub fn stores(&self) -> &StateStores {
        self.app.world().resource::<StateStores>()
    }

    /// Get a reference to the World.
    pub fn world(&self) -> &World {
        self.app.world()
    }

    /// Get a mutable reference to the World.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}

/// Rig with a single 30-unit dolly along -Z: position p puts the camera at z = -p.
pub(crate) fn dolly_rig() -> CameraRig {
    CameraRig {
        clips: vec![AnimationClip {
            name: "Action.003".to_string(),
            duration: 30.0,
            tracks: vec![
                KeyframeTrack::new(
                    "Camera.position",
                    vec![0.0, 30.0],
                    vec![0.0, 0.0, 0.0, 0.0, 0.0, -30.0],
                ),
                KeyframeTrack::new("Camera.rotation", vec![0.0, 30.0], vec![0.0; 6]),
            ],
        }],
        has_camera: true,
    }
}
