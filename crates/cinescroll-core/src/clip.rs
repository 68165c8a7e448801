//! Camera-rig asset model.
//!
//! Mirrors the shape of an exported animation clip: named tracks holding
//! keyframe times and flat value arrays. A track is either per-axis
//! (`Camera.position.x`, one value per time) or packed
//! (`Camera.position`, three values per time; `Camera.quaternion`, four).

use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// Number of samples in the synthetic fallback path.
const FALLBACK_SAMPLES: usize = 31;
/// Forward travel of the fallback path per timeline unit.
const FALLBACK_SPEED: f32 = 5.0;
/// Eye height of the fallback path.
const FALLBACK_HEIGHT: f32 = 1.6;

/// A single animated property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTrack {
    pub name: String,
    pub times: Vec<f32>,
    pub values: Vec<f32>,
}

impl KeyframeTrack {
    pub fn new(name: impl Into<String>, times: Vec<f32>, values: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            times,
            values,
        }
    }

    /// Number of keyframes.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Values stored per keyframe.
    pub fn stride(&self) -> usize {
        if self.times.is_empty() {
            1
        } else {
            (self.values.len() / self.times.len()).max(1)
        }
    }

    /// Reads `component` of keyframe `index`. Out-of-range reads yield `0.0`.
    pub fn value(&self, index: usize, component: usize) -> f32 {
        if index >= self.times.len() {
            return 0.0;
        }
        let stride = self.stride();
        let component = component.min(stride - 1);
        self.values
            .get(index * stride + component)
            .copied()
            .unwrap_or(0.0)
    }
}

/// A named keyframe clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Clip duration; zero means "derive from the last keyframe".
    #[serde(default)]
    pub duration: f32,
    pub tracks: Vec<KeyframeTrack>,
}

impl AnimationClip {
    pub fn from_json(json: &str) -> Result<Self, CameraError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the synthetic path used when no usable clip is available:
    /// a dolly along -Z at eye height with a slight lateral sway.
    pub fn fallback(length: f32) -> Self {
        let length = if length > 0.0 { length } else { 30.0 };
        let times: Vec<f32> = (0..FALLBACK_SAMPLES)
            .map(|i| length * i as f32 / (FALLBACK_SAMPLES - 1) as f32)
            .collect();

        let pos_x = times.iter().map(|t| (t * 0.2).sin() * 2.0).collect();
        let pos_y = times.iter().map(|_| FALLBACK_HEIGHT).collect();
        let pos_z = times.iter().map(|t| -t * FALLBACK_SPEED).collect();
        let rot_x = times.iter().map(|_| 0.0).collect();
        let rot_y = times.iter().map(|t| (t * 0.2).cos() * 0.05).collect();
        let rot_z = times.iter().map(|_| 0.0).collect();

        Self {
            name: "fallback".to_string(),
            duration: length,
            tracks: vec![
                KeyframeTrack::new("Camera.position.x", times.clone(), pos_x),
                KeyframeTrack::new("Camera.position.y", times.clone(), pos_y),
                KeyframeTrack::new("Camera.position.z", times.clone(), pos_z),
                KeyframeTrack::new("Camera.rotation.x", times.clone(), rot_x),
                KeyframeTrack::new("Camera.rotation.y", times.clone(), rot_y),
                KeyframeTrack::new("Camera.rotation.z", times, rot_z),
            ],
        }
    }
}

/// Camera rig as delivered by the asset loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    #[serde(default)]
    pub clips: Vec<AnimationClip>,
    /// Whether the rig scene contains a camera node.
    #[serde(default = "default_true")]
    pub has_camera: bool,
}

fn default_true() -> bool {
    true
}

impl CameraRig {
    pub fn from_json(json: &str) -> Result<Self, CameraError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Picks the clip to drive the camera.
    ///
    /// Exact name match wins, then a case-insensitive substring match, then
    /// the first clip.
    pub fn select_clip(&self, target: &str) -> Result<&AnimationClip, CameraError> {
        if let Some(clip) = self.clips.iter().find(|c| c.name == target) {
            return Ok(clip);
        }

        let lowered = target.to_lowercase();
        if let Some(clip) = self
            .clips
            .iter()
            .find(|c| c.name.to_lowercase().contains(&lowered))
        {
            return Ok(clip);
        }

        let first = self.clips.first().ok_or(CameraError::NoClips)?;
        tracing::warn!(
            "[sampler] clip '{}' not found, using first clip '{}'",
            target,
            first.name
        );
        Ok(first)
    }
}
