//! Bevy plugins for the camera engine.
//!
//! Provides:
//! - `CinescrollHeadlessPlugin`: Logic-only plugin (no rendering/window dependencies) for headless testing
//! - `CinescrollPlugin`: Full plugin including `CinescrollHeadlessPlugin` + window and camera systems

use std::sync::Arc;

use bevy::prelude::*;

use crate::bevy::events::*;
use crate::bevy::resources::*;
use crate::bevy::systems;
use crate::bevy::MainCamera;
use crate::catalog::Catalog;
use crate::engine::CameraEngine;
use crate::store::StateStores;

/// Camera rig lifecycle.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RigState {
    /// Waiting for a `LoadRig`/`LoadClip` command.
    #[default]
    Loading,
    /// A path is loaded and the engine ticks every frame.
    Ready,
}

// ============================================================================
// Headless Plugin (logic only, no rendering/window dependencies)
// ============================================================================

/// Headless plugin containing the camera engine without rendering or window
/// dependencies.
///
/// Use this plugin in tests with `MinimalPlugins`, `StatesPlugin` and
/// `InputPlugin` to run the engine without a windowing or rendering backend.
///
/// Excluded systems (window/rendering-dependent):
/// - Pointer tracking (collect_pointer_input)
/// - Camera3d attachment (attach_camera3d)
#[derive(Default)]
pub struct CinescrollHeadlessPlugin {
    pub catalog: Catalog,
    pub command_queue: Option<CommandQueue>,
    pub state_stores: Option<StateStores>,
}

impl Plugin for CinescrollHeadlessPlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // States
        // ====================================================================
        app.init_state::<RigState>();

        // ====================================================================
        // Resources
        // ====================================================================
        let state_stores = self.state_stores.clone().unwrap_or_default();
        let engine = CameraEngine::new(
            self.catalog.clone(),
            Arc::clone(&state_stores.interaction),
        );

        app.insert_resource(CameraEngineRes(engine))
            .insert_resource(LatestCameraFrame::default())
            .insert_resource(self.command_queue.clone().unwrap_or_default())
            .insert_resource(state_stores);

        // ====================================================================
        // Messages
        // ====================================================================
        app.add_message::<RigLoadedEvent>()
            .add_message::<ChapterJumpRequestedEvent>()
            .add_message::<TransitionStartedEvent>()
            .add_message::<TransitionCompleteEvent>()
            .add_message::<InteractionTriggeredEvent>()
            .add_message::<InteractionCompleteEvent>()
            .add_message::<TimelineEndReachedEvent>();

        // ====================================================================
        // Commands (always active) and input (Ready only)
        // ====================================================================
        app.add_systems(
            Update,
            (
                systems::process_commands,
                systems::collect_scroll_input.run_if(in_state(RigState::Ready)),
            )
                .chain(),
        );

        // ====================================================================
        // Engine tick (Ready only)
        // ====================================================================
        app.add_systems(
            Update,
            (
                systems::tick_camera_engine,
                systems::forward_camera_events,
                systems::apply_camera_pose,
            )
                .chain()
                .after(systems::collect_scroll_input)
                .run_if(in_state(RigState::Ready)),
        );

        app.add_systems(OnEnter(RigState::Ready), systems::setup_camera_node);

        // ====================================================================
        // State sync (PostUpdate)
        // ====================================================================
        app.add_systems(PostUpdate, systems::sync_playback_state);
    }
}

// ============================================================================
// Windowed Plugin (headless + window/camera)
// ============================================================================

/// Full plugin: `CinescrollHeadlessPlugin` plus systems that need a
/// `Window` and a rendering camera.
#[derive(Default)]
pub struct CinescrollPlugin {
    pub catalog: Catalog,
    pub command_queue: Option<CommandQueue>,
    pub state_stores: Option<StateStores>,
}

impl CinescrollPlugin {
    pub fn new(catalog: Catalog, command_queue: CommandQueue, state_stores: StateStores) -> Self {
        Self {
            catalog,
            command_queue: Some(command_queue),
            state_stores: Some(state_stores),
        }
    }
}

impl Plugin for CinescrollPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(CinescrollHeadlessPlugin {
            catalog: self.catalog.clone(),
            command_queue: self.command_queue.clone(),
            state_stores: self.state_stores.clone(),
        });

        app.add_systems(
            Update,
            systems::collect_pointer_input
                .after(systems::collect_scroll_input)
                .before(systems::tick_camera_engine),
        );

        app.add_systems(
            OnEnter(RigState::Ready),
            attach_camera3d.after(systems::setup_camera_node),
        );
    }
}

/// Turns the camera node into a rendering camera.
///
/// Reuses the existing entity rather than spawning a second camera.
fn attach_camera3d(
    mut commands: Commands,
    cameras: Query<Entity, (With<MainCamera>, Without<Camera3d>)>,
) {
    for entity in &cameras {
        commands.entity(entity).insert(Camera3d::default());
        tracing::info!("[camera] Camera3d attached to {:?}", entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bevy::test_utils::{TestApp, dolly_rig};
    use crate::bevy::{CameraCommand, CinematicCamera};
    use crate::chapter::Chapter;
    use crate::clip::CameraRig;
    use crate::gate::{GestureKind, InteractionPoint, InterfaceKind};
    use crate::timeline::{DeltaMode, ScrollInput};

    #[derive(Resource, Default)]
    struct Recorded {
        loaded: Vec<(bool, f32)>,
        completes: Vec<f32>,
        triggers: Vec<String>,
    }

    fn record(
        mut recorded: ResMut<Recorded>,
        mut loaded: MessageReader<RigLoadedEvent>,
        mut completes: MessageReader<TransitionCompleteEvent>,
        mut triggers: MessageReader<InteractionTriggeredEvent>,
    ) {
        recorded
            .loaded
            .extend(loaded.read().map(|e| (e.fallback, e.length)));
        recorded
            .completes
            .extend(completes.read().map(|e| e.position));
        recorded
            .triggers
            .extend(triggers.read().map(|e| e.trigger.point_id.clone()));
    }

    fn recording(app: &mut TestApp) {
        app.world_mut().init_resource::<Recorded>();
        app.app.add_systems(
            Update,
            record
                .after(systems::process_commands)
                .after(systems::forward_camera_events),
        );
    }

    fn camera_z(app: &mut TestApp) -> f32 {
        let mut query = app
            .world_mut()
            .query_filtered::<&Transform, With<MainCamera>>();
        query.single(app.world()).unwrap().translation.z
    }

    #[test]
    fn test_load_rig_spawns_camera() {
        let mut app = TestApp::new(Catalog::default());
        assert_eq!(*app.world().resource::<State<RigState>>().get(), RigState::Loading);

        app.load_rig(dolly_rig());
        assert_eq!(*app.world().resource::<State<RigState>>().get(), RigState::Ready);

        let mut query = app
            .world_mut()
            .query_filtered::<&CinematicCamera, With<MainCamera>>();
        assert_eq!(query.iter(app.world()).count(), 1);
        assert!(camera_z(&mut app).abs() < 1e-5);
    }

    #[test]
    fn test_rig_loaded_message() {
        let mut app = TestApp::new(Catalog::default());
        recording(&mut app);
        app.load_rig(dolly_rig());
        assert_eq!(app.world().resource::<Recorded>().loaded, vec![(false, 30.0)]);

        // A rig without clips switches to the synthetic path.
        app.load_rig(CameraRig {
            clips: Vec::new(),
            has_camera: true,
        });
        let loaded = &app.world().resource::<Recorded>().loaded;
        assert_eq!(loaded.len(), 2);
        assert!(loaded[1].0);
    }

    #[test]
    fn test_existing_camera_reused() {
        let mut app = TestApp::new(Catalog::default());
        app.world_mut()
            .spawn((MainCamera, Transform::from_xyz(9.0, 9.0, 9.0)));
        app.load_rig(dolly_rig());

        let mut query = app
            .world_mut()
            .query_filtered::<(&Transform, &CinematicCamera), With<MainCamera>>();
        let cameras: Vec<_> = query.iter(app.world()).collect();
        assert_eq!(cameras.len(), 1);
        assert!(cameras[0].0.translation.x.abs() < 1e-5);
    }

    #[test]
    fn test_scroll_moves_camera_forward() {
        let mut app = TestApp::new(Catalog::default());
        app.load_rig(dolly_rig());

        app.push_command(CameraCommand::Scroll {
            input: ScrollInput::Wheel {
                delta_y: 3.0,
                mode: DeltaMode::Line,
                timestamp_ms: 0.0,
            },
        });
        app.run_for(200.0);

        assert!(camera_z(&mut app) < -0.1);
        let summary = app.stores().playback.get_summary();
        assert!(summary.position > 0.1);
        assert!(app.stores().playback.get_version() > 0);
    }

    #[test]
    fn test_chapter_jump_emits_messages() {
        let catalog = Catalog {
            chapters: vec![Chapter::new("A", "Forest", 5.0), Chapter::new("B", "River", 3.0)],
            ..Default::default()
        };
        let mut app = TestApp::new(catalog);
        recording(&mut app);
        app.load_rig(dolly_rig());

        app.push_command(CameraCommand::JumpToChapterNamed {
            name: "River".to_string(),
        });
        app.run_for(2300.0);

        assert_eq!(app.world().resource::<Recorded>().completes, vec![8.0]);
        assert!((camera_z(&mut app) + 8.0).abs() < 1e-4);
        let summary = app.stores().playback.get_summary();
        assert_eq!(summary.chapter_index, Some(1));
        assert!(!summary.transitioning);
    }

    #[test]
    fn test_interaction_round_trip() {
        let catalog = Catalog {
            chapters: vec![Chapter::new("scan", "Scan", 5.0)],
            points: vec![InteractionPoint {
                id: "scan".to_string(),
                trigger_x: 0.0,
                trigger_z: -10.0,
                object_key: None,
                prerequisite_id: None,
                interface: InterfaceKind::Scanner,
                gesture: GestureKind::LongPress,
            }],
            ..Default::default()
        };
        let mut app = TestApp::new(catalog);
        recording(&mut app);
        app.load_rig(dolly_rig());

        for i in 0..60 {
            if !app.world().resource::<Recorded>().triggers.is_empty() {
                break;
            }
            app.push_command(CameraCommand::Scroll {
                input: ScrollInput::Wheel {
                    delta_y: 1.0,
                    mode: DeltaMode::Page,
                    timestamp_ms: f64::from(i) * 1000.0,
                },
            });
            app.update();
        }
        assert_eq!(app.world().resource::<Recorded>().triggers, vec!["scan"]);
        assert!(!app.stores().interaction.allow_scroll());
        let saved = app.engine().timeline().position();

        app.push_command(CameraCommand::CompleteInteraction {
            id: "scan".to_string(),
        });
        app.run_for(3500.0);

        assert!(app.stores().interaction.allow_scroll());
        assert!(app.stores().interaction.is_completed("scan"));
        let completes = &app.world().resource::<Recorded>().completes;
        assert_eq!(completes.len(), 1);
        assert!((completes[0] - (saved + 5.0)).abs() < 1e-4);
    }
}
