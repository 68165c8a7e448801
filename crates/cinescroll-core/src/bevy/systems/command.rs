//! Command processing system.
//!
//! Processes commands pushed by the host through the `CommandQueue`.

use bevy::prelude::*;

use crate::bevy::plugin::RigState;
use crate::bevy::{CameraCommand, CameraEngineRes, CommandQueue, RigLoadedEvent};

/// System to process commands from the external command queue.
///
/// Handles commands until a Yield is encountered.
/// Commands after Yield are processed in the next frame.
pub fn process_commands(
    command_queue: Res<CommandQueue>,
    mut engine: ResMut<CameraEngineRes>,
    mut next_state: ResMut<NextState<RigState>>,
    mut rig_loaded: MessageWriter<RigLoadedEvent>,
) {
    for command in command_queue.drain_until_yield() {
        match command {
            CameraCommand::LoadRig { rig } => {
                tracing::info!("[command] LoadRig with {} clips", rig.clips.len());
                if !rig.has_camera {
                    tracing::warn!("[command] rig has no camera node, using default camera");
                }
                engine.load_rig(&rig);
                rig_loaded.write(RigLoadedEvent {
                    fallback: engine.is_using_fallback(),
                    length: engine.timeline().length(),
                });
                next_state.set(RigState::Ready);
            }
            CameraCommand::LoadClip { clip } => {
                tracing::info!("[command] LoadClip: {}", clip.name);
                engine.load_clip(&clip);
                rig_loaded.write(RigLoadedEvent {
                    fallback: engine.is_using_fallback(),
                    length: engine.timeline().length(),
                });
                next_state.set(RigState::Ready);
            }
            CameraCommand::Scroll { input } => {
                engine.on_raw_input(input);
            }
            CameraCommand::Pointer { x, y } => {
                engine.set_pointer(x, y);
            }
            CameraCommand::JumpToChapter { index } => {
                tracing::info!("[command] JumpToChapter: {}", index);
                if let Err(err) = engine.jump_to_chapter(index) {
                    tracing::warn!("[command] JumpToChapter ignored: {}", err);
                }
            }
            CameraCommand::JumpToChapterNamed { name } => {
                tracing::info!("[command] JumpToChapterNamed: {}", name);
                if let Err(err) = engine.jump_to_chapter_named(&name) {
                    tracing::warn!("[command] JumpToChapterNamed ignored: {}", err);
                }
            }
            CameraCommand::JumpTo { position } => {
                tracing::info!("[command] JumpTo: {}", position);
                engine.jump_to(position);
            }
            CameraCommand::StartAtChapter { id } => {
                tracing::info!("[command] StartAtChapter: {}", id);
                if let Err(err) = engine.start_at_chapter(&id) {
                    tracing::warn!("[command] StartAtChapter ignored: {}", err);
                }
            }
            CameraCommand::CompleteInteraction { id } => {
                tracing::info!("[command] CompleteInteraction: {}", id);
                engine.complete_interaction(&id);
            }
            CameraCommand::SetInterfaceActive { interface } => {
                tracing::info!("[command] SetInterfaceActive: {:?}", interface);
                engine.set_interface_active(interface);
            }
            CameraCommand::SetMouseLookEnabled { enabled } => {
                tracing::info!("[command] SetMouseLookEnabled: {}", enabled);
                engine.set_mouse_look_enabled(enabled);
            }
            // Yield is consumed by drain_until_yield(), should not reach here
            CameraCommand::Yield => {}
        }
    }
}
