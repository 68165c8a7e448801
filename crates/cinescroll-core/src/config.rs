//! Engine tunables.
//!
//! Every field has a default, so a catalog may override only the values it
//! cares about.

use serde::{Deserialize, Serialize};

/// Upper bound on scroll velocity (timeline units per tick).
pub const MAX_SCROLL_SPEED: f32 = 1.0;
/// Per-tick velocity multiplier.
pub const DECELERATION: f32 = 0.95;
/// Velocities at or below this magnitude count as stopped.
pub const MIN_VELOCITY: f32 = 0.01;
/// Normalized delta to velocity factor.
pub const BASE_SENSITIVITY: f32 = 0.01;
/// Fixed wheel sensitivity applied after delta-mode scaling.
pub const SCROLL_NORMALIZATION_FACTOR: f32 = 0.2;
/// Duration of a programmatic transition, in milliseconds.
pub const TRANSITION_DURATION_MS: f64 = 2000.0;
/// Planar distance under which an interaction point fires.
pub const TRIGGER_PROXIMITY: f32 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub max_scroll_speed: f32,
    pub deceleration: f32,
    pub min_velocity: f32,
    pub base_sensitivity: f32,
    pub normalization_factor: f32,
    /// Multiplier for `deltaMode = 1` wheel events.
    pub line_factor: f32,
    /// Multiplier for `deltaMode = 2` wheel events.
    pub page_factor: f32,
    /// Pixel deltas below this magnitude are treated as high precision.
    pub high_precision_threshold: f32,
    pub high_precision_boost: f32,
    pub touch_multiplier: f32,
    /// Upper bound of the irregular-timing compensation.
    pub max_time_coefficient: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            max_scroll_speed: MAX_SCROLL_SPEED,
            deceleration: DECELERATION,
            min_velocity: MIN_VELOCITY,
            base_sensitivity: BASE_SENSITIVITY,
            normalization_factor: SCROLL_NORMALIZATION_FACTOR,
            line_factor: 20.0,
            page_factor: 500.0,
            high_precision_threshold: 10.0,
            high_precision_boost: 2.0,
            touch_multiplier: 1.5,
            max_time_coefficient: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub duration_ms: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: TRANSITION_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub proximity: f32,
    /// Wait between a completion signal and the advance decision.
    pub settle_delay_ms: f64,
    /// Wait before releasing the controller when no advance is configured.
    pub ungate_delay_ms: f64,
    /// Window in which repeated completion signals for one id are dropped.
    pub dedupe_window_ms: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            proximity: TRIGGER_PROXIMITY,
            settle_delay_ms: 1000.0,
            ungate_delay_ms: 500.0,
            dedupe_window_ms: 2000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseLookConfig {
    pub enabled: bool,
    /// Radians.
    pub max_yaw: f32,
    /// Radians.
    pub max_pitch: f32,
    pub smoothing: f32,
    /// Fraction of the offset removed per tick while an interface is open.
    pub decay_rate: f32,
}

impl Default for MouseLookConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_yaw: 0.2,
            max_pitch: 0.1,
            smoothing: 0.05,
            decay_rate: 0.1,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scroll: ScrollConfig,
    pub transition: TransitionConfig,
    pub gate: GateConfig,
    pub mouse_look: MouseLookConfig,
    /// Progress fraction at which the end of the timeline is reported.
    pub end_threshold: f32,
    /// Timeline length used by the synthetic fallback path.
    pub fallback_length: f32,
    /// Clip looked up first in a camera rig.
    pub target_clip: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scroll: ScrollConfig::default(),
            transition: TransitionConfig::default(),
            gate: GateConfig::default(),
            mouse_look: MouseLookConfig::default(),
            end_threshold: 0.98,
            fallback_length: 30.0,
            target_clip: "Action.003".to_string(),
        }
    }
}
