//! Per-tick scheduler owning one instance of each camera component.
//!
//! Tick order: due deferred actions, interaction gate (against last tick's
//! camera position), timeline or transition queue, chapter bookkeeping,
//! mouse-look composition, event publication.

use std::sync::Arc;

use bevy::math::{Quat, Vec3};

use crate::bus::{CameraEvent, MessageBus};
use crate::catalog::Catalog;
use crate::chapter::ChapterTable;
use crate::clip::{AnimationClip, CameraRig};
use crate::config::EngineConfig;
use crate::error::CameraError;
use crate::gate::{InteractionGate, InterfaceKind, TriggerFired};
use crate::mouse_look::{LookOffset, MouseLookOverlay};
use crate::pose::Pose;
use crate::sampler::FrameSampler;
use crate::store::{InteractionStore, PlaybackSummary};
use crate::timeline::{ScrollInput, TimelineController, TimelineState};
use crate::transition::{TransitionEvent, TransitionQueue};

/// Output of one engine tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame {
    /// Authored (or transition) pose before mouse-look.
    pub base: Pose,
    pub position: Vec3,
    /// Base orientation composed with the look offset.
    pub orientation: Quat,
    pub look: LookOffset,
    pub timeline: TimelineState,
    pub events: Vec<CameraEvent>,
}

#[derive(Debug, Clone, PartialEq)]
enum DeferredAction {
    /// Decide whether a completed interaction advances the camera.
    Settle { id: String },
    /// Hand scroll control back to the user.
    Ungate,
}

#[derive(Debug, Clone)]
struct Deferred {
    due_ms: f64,
    action: DeferredAction,
}

#[derive(Debug)]
pub struct CameraEngine {
    config: EngineConfig,
    sampler: FrameSampler,
    timeline: TimelineController,
    transitions: TransitionQueue,
    gate: InteractionGate,
    mouse_look: MouseLookOverlay,
    chapters: ChapterTable,
    bus: MessageBus,
    interaction: Arc<InteractionStore>,
    now_ms: f64,
    base_pose: Pose,
    deferred: Vec<Deferred>,
    /// Events raised outside `tick`, published on the next one.
    pending_events: Vec<CameraEvent>,
    pending_start: Option<String>,
    at_end: bool,
    using_fallback: bool,
}

impl CameraEngine {
    pub fn new(catalog: Catalog, interaction: Arc<InteractionStore>) -> Self {
        let Catalog {
            chapters,
            points,
            config,
            start_chapter,
        } = catalog;

        Self {
            sampler: FrameSampler::new(),
            timeline: TimelineController::new(config.scroll.clone(), 0.0),
            transitions: TransitionQueue::new(&config.transition),
            gate: InteractionGate::new(points, &config.gate),
            mouse_look: MouseLookOverlay::new(config.mouse_look.clone()),
            chapters: ChapterTable::new(chapters),
            bus: MessageBus::new(),
            interaction,
            now_ms: 0.0,
            base_pose: Pose::default(),
            deferred: Vec::new(),
            pending_events: Vec::new(),
            pending_start: start_chapter,
            at_end: false,
            using_fallback: false,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sampler(&self) -> &FrameSampler {
        &self.sampler
    }

    pub fn timeline(&self) -> &TimelineController {
        &self.timeline
    }

    pub fn transitions(&self) -> &TransitionQueue {
        &self.transitions
    }

    pub fn gate(&self) -> &InteractionGate {
        &self.gate
    }

    pub fn chapters(&self) -> &ChapterTable {
        &self.chapters
    }

    pub fn mouse_look(&self) -> &MouseLookOverlay {
        &self.mouse_look
    }

    pub fn bus_mut(&mut self) -> &mut MessageBus {
        &mut self.bus
    }

    pub fn interaction_store(&self) -> &Arc<InteractionStore> {
        &self.interaction
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn base_pose(&self) -> Pose {
        self.base_pose
    }

    pub fn is_using_fallback(&self) -> bool {
        self.using_fallback
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Loads the target clip of `rig`, falling back to the synthetic path.
    pub fn load_rig(&mut self, rig: &CameraRig) {
        match rig.select_clip(&self.config.target_clip) {
            Ok(clip) => self.load_clip(clip),
            Err(err) => {
                tracing::warn!("[engine] {}, using fallback path", err);
                self.load_fallback();
            }
        }
    }

    pub fn load_clip(&mut self, clip: &AnimationClip) {
        match self.sampler.load(clip) {
            Ok(()) => {
                self.using_fallback = false;
                self.on_loaded();
            }
            Err(err) => {
                tracing::warn!(
                    "[engine] clip '{}' unusable ({}), using fallback path",
                    clip.name,
                    err
                );
                self.load_fallback();
            }
        }
    }

    fn load_fallback(&mut self) {
        let clip = AnimationClip::fallback(self.config.fallback_length);
        if let Err(err) = self.sampler.load(&clip) {
            tracing::warn!("[engine] fallback path failed to load: {}", err);
            return;
        }
        self.using_fallback = true;
        self.on_loaded();
    }

    fn on_loaded(&mut self) {
        self.timeline.set_length(self.sampler.length());
        if let Some(id) = self.pending_start.take() {
            if let Err(err) = self.start_at_chapter(&id) {
                tracing::warn!("[engine] start chapter ignored: {}", err);
            }
        }
        self.base_pose = self.sampler.sample_at(self.timeline.position());
        tracing::info!(
            "[engine] rig ready, timeline length {:.3}",
            self.timeline.length()
        );
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Scroll input; ignored until a path is loaded or while scrolling is
    /// disallowed.
    pub fn on_raw_input(&mut self, input: ScrollInput) {
        if !self.sampler.is_loaded() || !self.interaction.allow_scroll() {
            return;
        }
        self.timeline.on_raw_input(input);
    }

    /// Pointer position normalized to `[0, 1]` on both axes.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.mouse_look.set_pointer(x, y);
    }

    pub fn set_mouse_look_enabled(&mut self, enabled: bool) {
        self.mouse_look.set_enabled(enabled);
    }

    pub fn set_interface_active(&mut self, interface: Option<InterfaceKind>) {
        self.interaction.set_active_interface(interface);
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Queues a transition to the cumulative position of active chapter
    /// `index`.
    pub fn jump_to_chapter(&mut self, index: usize) -> Result<f32, CameraError> {
        let target = self.chapters.cumulative_target(index)?;
        tracing::info!("[engine] jump to chapter {} at {}", index, target);
        self.pending_events.push(CameraEvent::ChapterJumpRequested {
            chapter: Some(index),
            target,
        });
        self.transitions.enqueue(target);
        Ok(target)
    }

    pub fn jump_to_chapter_named(&mut self, name: &str) -> Result<f32, CameraError> {
        let index = self.chapters.index_of(name)?;
        self.jump_to_chapter(index)
    }

    /// Transitions directly to `position`, finishing any running transition
    /// at its target first.
    pub fn jump_to(&mut self, position: f32) {
        if let Some(event) = self.transitions.force_complete(&mut self.timeline) {
            self.base_pose = self.sampler.sample_at(self.timeline.position());
            self.pending_events.push(transition_event(event));
        }
        self.pending_events.push(CameraEvent::ChapterJumpRequested {
            chapter: None,
            target: position,
        });
        self.transitions.enqueue(position);
    }

    /// Places the timeline at the start of chapter `id` without animating.
    ///
    /// Applied on load when called before the rig is ready.
    pub fn start_at_chapter(&mut self, id: &str) -> Result<f32, CameraError> {
        let position = self.chapters.start_position(id)?;
        if !self.sampler.is_loaded() {
            self.pending_start = Some(id.to_string());
            return Ok(position);
        }
        self.timeline.set_position(position);
        self.chapters.mark_completed_through(self.timeline.position());
        self.base_pose = self.sampler.sample_at(self.timeline.position());
        tracing::info!("[engine] starting at chapter '{}' ({})", id, position);
        Ok(position)
    }

    // ========================================================================
    // Interactions
    // ========================================================================

    /// Completion signal from the interaction interface.
    pub fn complete_interaction(&mut self, id: &str) {
        if !self.gate.complete(id, self.now_ms) {
            return;
        }
        self.interaction.mark_completed(id);
        self.interaction.set_active_interface(None);
        self.pending_events.push(CameraEvent::InteractionComplete { id: id.to_string() });
        self.schedule(
            self.config.gate.settle_delay_ms,
            DeferredAction::Settle { id: id.to_string() },
        );
    }

    fn schedule(&mut self, delay_ms: f64, action: DeferredAction) {
        self.deferred.push(Deferred {
            due_ms: self.now_ms + delay_ms,
            action,
        });
    }

    fn run_due_actions(&mut self) {
        let now = self.now_ms;
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.deferred)
            .into_iter()
            .partition(|d| d.due_ms <= now);
        self.deferred = waiting;

        for deferred in due {
            match deferred.action {
                DeferredAction::Settle { id } => self.settle(&id),
                DeferredAction::Ungate => self.ungate(),
            }
        }
    }

    fn settle(&mut self, id: &str) {
        match self.chapters.distance_for(id) {
            Some(distance) => {
                let target = self.timeline.position() + distance;
                tracing::info!("[gate] '{}' advances by {} to {}", id, distance, target);
                self.ungate();
                self.transitions.enqueue(target);
            }
            None => self.schedule(self.config.gate.ungate_delay_ms, DeferredAction::Ungate),
        }
    }

    fn ungate(&mut self) {
        self.interaction.set_allow_scroll(true);
        self.interaction.set_current_step(None);
        self.timeline.release_interaction();
    }

    fn fire(&mut self, fired: &TriggerFired) {
        self.timeline.gate_for_interaction();
        self.interaction.set_allow_scroll(false);
        self.interaction.set_current_step(Some(fired.point_id.clone()));
        self.interaction.set_active_interface(Some(fired.interface));
    }

    /// Mirrors the shared scroll permission onto the timeline gate.
    fn sync_scroll_permission(&mut self) {
        let allow = self.interaction.allow_scroll();
        match (allow, self.timeline.saved_position()) {
            (false, None) => self.timeline.gate_for_interaction(),
            (true, Some(_)) if self.gate.waiting().is_none() => {
                self.timeline.release_interaction();
            }
            _ => {}
        }
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advances the engine by `delta_ms` and returns the camera pose to show.
    pub fn tick(&mut self, delta_ms: f64) -> CameraFrame {
        self.now_ms += delta_ms.max(0.0);
        let mut events = std::mem::take(&mut self.pending_events);

        self.run_due_actions();
        self.sync_scroll_permission();

        let blocked = self.timeline.is_gated() || !self.transitions.is_idle();
        let completed = self.interaction.get_completed();
        if let Some(fired) = self.gate.tick(self.base_pose.position, &completed, blocked) {
            self.fire(&fired);
            events.push(CameraEvent::InteractionTriggered(fired));
        }

        let base = if self.transitions.is_idle() {
            let position = self.timeline.tick();
            self.sampler.sample_at(position)
        } else {
            let step = self.transitions.tick(
                self.now_ms,
                self.base_pose,
                &mut self.sampler,
                &mut self.timeline,
            );
            events.extend(step.events.into_iter().map(transition_event));
            match step.pose {
                Some(pose) => pose,
                None => self.sampler.sample_at(self.timeline.position()),
            }
        };
        self.base_pose = base;

        let position = self.timeline.position();
        for id in self.chapters.mark_completed_through(position) {
            tracing::info!("[engine] chapter '{}' completed", id);
        }

        let at_end = self.timeline.length() > 0.0
            && self.timeline.progress() >= self.config.end_threshold;
        if at_end && !self.at_end {
            tracing::info!("[engine] end of timeline reached at {}", position);
            events.push(CameraEvent::TimelineEndReached { position });
        }
        self.at_end = at_end;

        let look = self.mouse_look.tick(self.interaction.is_interface_active());
        let orientation = look.compose(base.orientation());

        for event in &events {
            self.bus.publish(event);
        }

        CameraFrame {
            base,
            position: base.position,
            orientation,
            look,
            timeline: self.timeline.state(),
            events,
        }
    }

    pub fn summary(&self) -> PlaybackSummary {
        let position = self.timeline.position();
        PlaybackSummary {
            position,
            length: self.timeline.length(),
            progress: self.timeline.progress(),
            chapter_index: self.chapters.current_index(position),
            mode: self.timeline.mode(),
            transitioning: !self.transitions.is_idle(),
            at_end: self.at_end,
        }
    }
}

fn transition_event(event: TransitionEvent) -> CameraEvent {
    match event {
        TransitionEvent::Started { start, target } => {
            CameraEvent::TransitionStarted { start, target }
        }
        TransitionEvent::Completed { position } => CameraEvent::TransitionComplete { position },
    }
}
