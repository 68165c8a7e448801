//! ECS Messages mirroring the engine's bus topics.
//!
//! Note: In Bevy 0.18+, buffered events use the Message trait instead of Event.

use bevy::prelude::*;

use crate::bus::CameraEvent;
use crate::gate::TriggerFired;

/// Message fired when a camera rig has been loaded.
#[derive(Message, Debug, Clone)]
pub struct RigLoadedEvent {
    /// Whether the synthetic fallback path is in use.
    pub fallback: bool,
    /// Timeline length of the loaded path.
    pub length: f32,
}

/// `chapter-jump-requested`
#[derive(Message, Debug, Clone, PartialEq)]
pub struct ChapterJumpRequestedEvent {
    /// Active chapter index, `None` for a direct position jump.
    pub chapter: Option<usize>,
    pub target: f32,
}

/// `transition-started`
#[derive(Message, Debug, Clone, PartialEq)]
pub struct TransitionStartedEvent {
    pub start: f32,
    pub target: f32,
}

/// `transition-complete`
#[derive(Message, Debug, Clone, PartialEq)]
pub struct TransitionCompleteEvent {
    pub position: f32,
}

/// `interaction-triggered`
#[derive(Message, Debug, Clone, PartialEq)]
pub struct InteractionTriggeredEvent {
    pub trigger: TriggerFired,
}

/// `interaction-complete`
#[derive(Message, Debug, Clone, PartialEq)]
pub struct InteractionCompleteEvent {
    pub id: String,
}

/// `timeline-end-reached`
#[derive(Message, Debug, Clone, PartialEq)]
pub struct TimelineEndReachedEvent {
    pub position: f32,
}

/// Writers for every outbound message, grouped so systems stay small.
#[derive(bevy::ecs::system::SystemParam)]
pub struct CameraEventWriters<'w> {
    pub chapter_jump: MessageWriter<'w, ChapterJumpRequestedEvent>,
    pub transition_started: MessageWriter<'w, TransitionStartedEvent>,
    pub transition_complete: MessageWriter<'w, TransitionCompleteEvent>,
    pub interaction_triggered: MessageWriter<'w, InteractionTriggeredEvent>,
    pub interaction_complete: MessageWriter<'w, InteractionCompleteEvent>,
    pub end_reached: MessageWriter<'w, TimelineEndReachedEvent>,
}

impl CameraEventWriters<'_> {
    pub fn write(&mut self, event: &CameraEvent) {
        match event.clone() {
            CameraEvent::ChapterJumpRequested { chapter, target } => {
                self.chapter_jump
                    .write(ChapterJumpRequestedEvent { chapter, target });
            }
            CameraEvent::TransitionStarted { start, target } => {
                self.transition_started
                    .write(TransitionStartedEvent { start, target });
            }
            CameraEvent::TransitionComplete { position } => {
                self.transition_complete
                    .write(TransitionCompleteEvent { position });
            }
            CameraEvent::InteractionTriggered(trigger) => {
                self.interaction_triggered
                    .write(InteractionTriggeredEvent { trigger });
            }
            CameraEvent::InteractionComplete { id } => {
                self.interaction_complete
                    .write(InteractionCompleteEvent { id });
            }
            CameraEvent::TimelineEndReached { position } => {
                self.end_reached.write(TimelineEndReachedEvent { position });
            }
        }
    }
}
