//! ECS Resources for the camera engine.

use std::collections::VecDeque;
use std::sync::Arc;

use bevy::prelude::*;
use parking_lot::Mutex;

use crate::clip::{AnimationClip, CameraRig};
use crate::engine::{CameraEngine, CameraFrame};
use crate::gate::InterfaceKind;
use crate::timeline::ScrollInput;

/// The engine driven by the Bevy schedule.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct CameraEngineRes(pub CameraEngine);

/// Output of the most recent engine tick.
#[derive(Resource, Debug, Default)]
pub struct LatestCameraFrame(pub Option<CameraFrame>);

/// Commands that outside collaborators send to the camera engine.
#[derive(Debug, Clone)]
pub enum CameraCommand {
    /// Load a camera rig; its target clip drives the timeline.
    LoadRig { rig: CameraRig },
    /// Load a single clip directly.
    LoadClip { clip: AnimationClip },
    /// Raw scroll input from a host that does not go through Bevy input.
    Scroll { input: ScrollInput },
    /// Normalized pointer position.
    Pointer { x: f32, y: f32 },
    JumpToChapter { index: usize },
    JumpToChapterNamed { name: String },
    JumpTo { position: f32 },
    StartAtChapter { id: String },
    /// The interaction interface finished with a point.
    CompleteInteraction { id: String },
    SetInterfaceActive { interface: Option<InterfaceKind> },
    SetMouseLookEnabled { enabled: bool },
    /// Frame boundary marker - commands after this are processed in the next frame.
    Yield,
}

/// Thread-safe command queue shared with the host.
///
/// Commands pushed here are processed by Bevy systems on the next frame.
#[derive(Resource, Clone)]
pub struct CommandQueue {
    inner: Arc<Mutex<VecDeque<CameraCommand>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Push a command to be processed.
    pub fn push(&self, command: CameraCommand) {
        self.inner.lock().push_back(command);
    }

    /// Drain all pending commands, `Yield` markers included.
    pub fn drain(&self) -> Vec<CameraCommand> {
        self.inner.lock().drain(..).collect()
    }

    /// Drain commands until `Yield` or empty.
    ///
    /// `Yield` itself is consumed but not returned; everything after it
    /// stays queued for the next frame.
    pub fn drain_until_yield(&self) -> Vec<CameraCommand> {
        let mut guard = self.inner.lock();
        let mut commands = Vec::new();

        while let Some(cmd) = guard.pop_front() {
            if matches!(cmd, CameraCommand::Yield) {
                tracing::debug!("[command] Yield - deferring remaining commands to next frame");
                break;
            }
            commands.push(cmd);
        }
        commands
    }

    /// Check if there are pending commands.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_until_yield() {
        let queue = CommandQueue::new();
        queue.push(CameraCommand::JumpTo { position: 1.0 });
        queue.push(CameraCommand::Yield);
        queue.push(CameraCommand::JumpTo { position: 2.0 });

        let first = queue.drain_until_yield();
        assert_eq!(first.len(), 1);
        assert!(matches!(first[0], CameraCommand::JumpTo { position } if (position - 1.0).abs() < f32::EPSILON));

        let second = queue.drain_until_yield();
        assert_eq!(second.len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clones_share_queue() {
        let queue = CommandQueue::new();
        let host = queue.clone();
        host.push(CameraCommand::SetMouseLookEnabled { enabled: false });
        assert_eq!(queue.drain().len(), 1);
        assert!(host.is_empty());
    }
}
