//! Scroll-driven timeline position.
//!
//! Raw wheel and touch deltas become a forward velocity that decays every
//! tick. The controller can be gated by an interaction wait (position pinned
//! to a saved value) or by an in-flight transition (position written by the
//! transition queue).

use serde::{Deserialize, Serialize};

use crate::config::ScrollConfig;

/// Unit of a wheel delta, as reported by the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    /// Maps the numeric DOM `deltaMode` (0, 1, 2). Unknown values are pixels.
    pub fn from_dom(mode: u32) -> Self {
        match mode {
            1 => DeltaMode::Line,
            2 => DeltaMode::Page,
            _ => DeltaMode::Pixel,
        }
    }
}

/// Inbound user scroll signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScrollInput {
    /// Positive `delta_y` scrolls forward.
    Wheel {
        delta_y: f32,
        mode: DeltaMode,
        timestamp_ms: f64,
    },
    TouchStart {
        y: f32,
    },
    TouchMove {
        y: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    Scrolling,
    Gated,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimelineState {
    pub position: f32,
    pub length: f32,
    pub velocity: f32,
}

/// Scales a wheel delta by its unit, boosts small pixel deltas, and applies
/// the fixed wheel sensitivity. Does not include timing compensation.
pub fn normalize_wheel_delta(config: &ScrollConfig, delta_y: f32, mode: DeltaMode) -> f32 {
    let mut delta = match mode {
        DeltaMode::Pixel => delta_y,
        DeltaMode::Line => delta_y * config.line_factor,
        DeltaMode::Page => delta_y * config.page_factor,
    };
    if mode == DeltaMode::Pixel && delta.abs() < config.high_precision_threshold {
        delta *= config.high_precision_boost;
    }
    delta * config.normalization_factor
}

/// Compensation for irregular event timing: events closer than 100 ms apart
/// are amplified, up to `max_time_coefficient`.
pub fn time_coefficient(config: &ScrollConfig, elapsed_ms: Option<f64>) -> f32 {
    match elapsed_ms {
        Some(elapsed) if elapsed > 0.0 && elapsed < 100.0 => {
            ((100.0 / elapsed) as f32).min(config.max_time_coefficient)
        }
        _ => 1.0,
    }
}

#[derive(Debug, Clone)]
pub struct TimelineController {
    state: TimelineState,
    config: ScrollConfig,
    /// Position pinned while an interaction waits for completion.
    saved_position: Option<f32>,
    transition_active: bool,
    last_wheel_ms: Option<f64>,
    last_touch_y: f32,
}

impl TimelineController {
    pub fn new(config: ScrollConfig, length: f32) -> Self {
        Self {
            state: TimelineState {
                position: 0.0,
                length: length.max(0.0),
                velocity: 0.0,
            },
            config,
            saved_position: None,
            transition_active: false,
            last_wheel_ms: None,
            last_touch_y: 0.0,
        }
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    pub fn position(&self) -> f32 {
        self.state.position
    }

    pub fn length(&self) -> f32 {
        self.state.length
    }

    pub fn velocity(&self) -> f32 {
        self.state.velocity
    }

    /// Fraction of the timeline covered, `0.0` for an empty timeline.
    pub fn progress(&self) -> f32 {
        if self.state.length > 0.0 {
            self.state.position / self.state.length
        } else {
            0.0
        }
    }

    pub fn mode(&self) -> ControlMode {
        if self.is_gated() {
            ControlMode::Gated
        } else {
            ControlMode::Scrolling
        }
    }

    pub fn is_gated(&self) -> bool {
        self.saved_position.is_some() || self.transition_active
    }

    pub fn saved_position(&self) -> Option<f32> {
        self.saved_position
    }

    pub fn clamp(&self, position: f32) -> f32 {
        if position.is_nan() {
            return 0.0;
        }
        position.clamp(0.0, self.state.length)
    }

    pub fn set_length(&mut self, length: f32) {
        self.state.length = length.max(0.0);
        self.state.position = self.clamp(self.state.position);
    }

    /// Writes the position directly, clamped. Velocity is left untouched.
    pub fn set_position(&mut self, position: f32) {
        self.state.position = self.clamp(position);
    }

    /// Pins the current position until [`Self::release_interaction`].
    pub fn gate_for_interaction(&mut self) {
        self.saved_position = Some(self.state.position);
        self.state.velocity = 0.0;
    }

    pub fn release_interaction(&mut self) {
        self.saved_position = None;
    }

    pub fn set_transition_active(&mut self, active: bool) {
        if active {
            self.state.velocity = 0.0;
        }
        self.transition_active = active;
    }

    /// Consumes a raw scroll signal. Ignored while gated; backward input
    /// never changes velocity.
    pub fn on_raw_input(&mut self, input: ScrollInput) {
        if self.is_gated() {
            return;
        }

        let delta = match input {
            ScrollInput::Wheel {
                delta_y,
                mode,
                timestamp_ms,
            } => {
                let elapsed = self.last_wheel_ms.map(|last| timestamp_ms - last);
                self.last_wheel_ms = Some(timestamp_ms);
                normalize_wheel_delta(&self.config, delta_y, mode)
                    * time_coefficient(&self.config, elapsed)
            }
            ScrollInput::TouchStart { y } => {
                self.last_touch_y = y;
                return;
            }
            ScrollInput::TouchMove { y } => {
                let delta = self.last_touch_y - y;
                self.last_touch_y = y;
                delta * self.config.touch_multiplier
            }
        };

        if delta <= 0.0 || !delta.is_finite() {
            return;
        }

        let magnitude = delta * self.config.base_sensitivity;
        self.state.velocity = magnitude.min(self.config.max_scroll_speed);
        tracing::debug!(
            "[timeline] input delta {:.3} -> velocity {:.4}",
            delta,
            self.state.velocity
        );
    }

    /// Advances one scheduler tick and returns the position.
    pub fn tick(&mut self) -> f32 {
        if let Some(saved) = self.saved_position {
            self.state.position = saved;
            self.state.velocity = 0.0;
            return saved;
        }
        if self.transition_active {
            return self.state.position;
        }

        if self.state.velocity.abs() > self.config.min_velocity {
            self.state.position += self.state.velocity;
            self.state.velocity *= self.config.deceleration;
        } else {
            self.state.velocity = 0.0;
        }
        self.state.position = self.clamp(self.state.position);
        self.state.position
    }

    /// Runs `f` with the position temporarily set to `target` (clamped),
    /// then restores the real position.
    pub fn probe<R>(&mut self, target: f32, f: impl FnOnce(&Self) -> R) -> R {
        let real = self.state.position;
        self.state.position = self.clamp(target);
        let result = f(self);
        self.state.position = real;
        result
    }
}
