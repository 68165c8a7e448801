//! Serialized programmatic jumps along the timeline.
//!
//! Requests run strictly one at a time, in submission order. Each one
//! interpolates the pose from where the camera was to the pose sampled at the
//! target, over a fixed duration, and drives the timeline position alongside
//! so scrolling resumes from the right place.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::TransitionConfig;
use crate::pose::Pose;
use crate::sampler::FrameSampler;
use crate::timeline::TimelineController;

/// The transition currently being animated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRequest {
    pub target_position: f32,
    pub start_position: f32,
    pub start_pose: Pose,
    pub end_pose: Pose,
    pub start_time_ms: f64,
}

impl TransitionRequest {
    /// Elapsed fraction in `[0, 1]`.
    pub fn progress(&self, now_ms: f64, duration_ms: f64) -> f32 {
        if duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_time_ms) / duration_ms).clamp(0.0, 1.0) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionEvent {
    Started { start: f32, target: f32 },
    Completed { position: f32 },
}

/// Result of one queue tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTick {
    /// Pose to show this tick, `None` while idle or deferred.
    pub pose: Option<Pose>,
    pub events: Vec<TransitionEvent>,
}

#[derive(Debug, Clone)]
pub struct TransitionQueue {
    pending: VecDeque<f32>,
    in_flight: Option<TransitionRequest>,
    duration_ms: f64,
    deferred: bool,
}

impl TransitionQueue {
    pub fn new(config: &TransitionConfig) -> Self {
        Self {
            pending: VecDeque::new(),
            in_flight: None,
            duration_ms: config.duration_ms,
            deferred: false,
        }
    }

    pub fn enqueue(&mut self, target_position: f32) {
        tracing::debug!(
            "[transition] enqueued target {} ({} pending)",
            target_position,
            self.pending.len() + 1
        );
        self.pending.push_back(target_position);
    }

    pub fn in_flight(&self) -> Option<&TransitionRequest> {
        self.in_flight.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.in_flight.is_some()
    }

    /// No transition running and none waiting.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none() && self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Advances the queue to `now_ms`.
    ///
    /// `current_pose` is the pose last shown, used as the start of a newly
    /// dequeued request.
    pub fn tick(
        &mut self,
        now_ms: f64,
        current_pose: Pose,
        sampler: &mut FrameSampler,
        timeline: &mut TimelineController,
    ) -> TransitionTick {
        let mut events = Vec::new();

        if self.in_flight.is_none() {
            self.start_next(now_ms, current_pose, sampler, timeline, &mut events);
        }

        let Some(request) = self.in_flight else {
            return TransitionTick { pose: None, events };
        };

        let progress = request.progress(now_ms, self.duration_ms);
        if progress >= 1.0 {
            self.in_flight = None;
            timeline.set_position(request.target_position);
            tracing::info!(
                "[transition] complete at {}",
                request.target_position
            );
            events.push(TransitionEvent::Completed {
                position: request.target_position,
            });

            self.start_next(now_ms, request.end_pose, sampler, timeline, &mut events);
            if self.in_flight.is_none() {
                timeline.set_transition_active(false);
            }
            return TransitionTick {
                pose: Some(request.end_pose),
                events,
            };
        }

        let span = request.target_position - request.start_position;
        timeline.set_position(request.start_position + span * progress);
        TransitionTick {
            pose: Some(request.start_pose.lerp(&request.end_pose, progress)),
            events,
        }
    }

    /// Finishes the in-flight request at its target without interpolating.
    ///
    /// Pending requests are kept and start on the next tick.
    pub fn force_complete(&mut self, timeline: &mut TimelineController) -> Option<TransitionEvent> {
        let request = self.in_flight.take()?;
        timeline.set_position(request.target_position);
        if self.pending.is_empty() {
            timeline.set_transition_active(false);
        }
        tracing::info!(
            "[transition] force-completed at {}",
            request.target_position
        );
        Some(TransitionEvent::Completed {
            position: request.target_position,
        })
    }

    fn start_next(
        &mut self,
        now_ms: f64,
        current_pose: Pose,
        sampler: &mut FrameSampler,
        timeline: &mut TimelineController,
        events: &mut Vec<TransitionEvent>,
    ) {
        if self.pending.is_empty() {
            return;
        }
        if !sampler.is_loaded() {
            if !self.deferred {
                tracing::warn!(
                    "[transition] sampler not loaded, deferring {} request(s)",
                    self.pending.len()
                );
                self.deferred = true;
            }
            return;
        }
        self.deferred = false;

        let Some(target) = self.pending.pop_front() else {
            return;
        };
        let target_position = timeline.clamp(target);
        let end_pose = timeline.probe(target_position, |t| sampler.sample_at(t.position()));
        let start_position = timeline.position();

        timeline.set_transition_active(true);
        self.in_flight = Some(TransitionRequest {
            target_position,
            start_position,
            start_pose: current_pose,
            end_pose,
            start_time_ms: now_ms,
        });
        tracing::info!(
            "[transition] start {} -> {}",
            start_position,
            target_position
        );
        events.push(TransitionEvent::Started {
            start: start_position,
            target: target_position,
        });
    }
}
