//! Keyframe sampling for the camera path.
//!
//! The clip is flattened once into an ordered list of [`AnimationFrame`]s.
//! Poses are then reconstructed by bracketing the queried timeline position
//! and interpolating linearly, independent of any animation player.

use bevy::math::{Quat, Vec3};

use crate::clip::{AnimationClip, KeyframeTrack};
use crate::error::CameraError;
use crate::pose::{Pose, quat_to_euler};

/// A sampled pose at a timeline time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub time: f32,
    pub position: Vec3,
    /// Euler XYZ, radians. Orientation tracks are converted at extraction.
    pub rotation: Vec3,
}

impl AnimationFrame {
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }
}

/// Per-axis value source: a track and the component to read from it.
#[derive(Clone, Copy)]
struct AxisSource<'a> {
    track: &'a KeyframeTrack,
    component: usize,
}

impl AxisSource<'_> {
    fn value(&self, index: usize) -> f32 {
        self.track.value(index, self.component)
    }
}

/// Reads keyframe `index` from `source`, `0.0` when the axis is not animated.
fn axis_value(source: Option<AxisSource<'_>>, index: usize) -> f32 {
    source.map_or(0.0, |source| source.value(index))
}

fn is_axis_track(name: &str) -> bool {
    [".x", ".y", ".z", ".w"]
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// Finds the track dedicated to one axis, or falls back to reading
/// `component` out of a packed vector track wide enough to hold it.
fn axis_source<'a>(
    tracks: &[&'a KeyframeTrack],
    suffixes: &[&str],
    component: usize,
) -> Option<AxisSource<'a>> {
    if let Some(track) = tracks
        .iter()
        .find(|t| suffixes.iter().any(|s| t.name.ends_with(s)))
    {
        return Some(AxisSource {
            track,
            component: 0,
        });
    }
    tracks
        .iter()
        .find(|t| !is_axis_track(&t.name) && t.stride() > component)
        .map(|track| AxisSource {
            track,
            component,
        })
}

/// Extracts the ordered frame list from a clip.
pub fn extract_frames(clip: &AnimationClip) -> Result<Vec<AnimationFrame>, CameraError> {
    let position_tracks: Vec<&KeyframeTrack> = clip
        .tracks
        .iter()
        .filter(|t| t.name.contains("position"))
        .collect();
    let rotation_tracks: Vec<&KeyframeTrack> = clip
        .tracks
        .iter()
        .filter(|t| t.name.contains("rotation") || t.name.contains("quaternion"))
        .collect();

    if position_tracks.is_empty() || rotation_tracks.is_empty() {
        return Err(CameraError::NoTracks);
    }

    let sample_count = position_tracks
        .iter()
        .chain(rotation_tracks.iter())
        .map(|t| t.len())
        .max()
        .unwrap_or(0);

    // The X position track defines which samples exist and their times.
    let Some(pos_x) = axis_source(&position_tracks, &["position.x"], 0) else {
        return Err(CameraError::NoTracks);
    };
    let pos_y = axis_source(&position_tracks, &["position.y"], 1);
    let pos_z = axis_source(&position_tracks, &["position.z"], 2);

    let rot_x = axis_source(&rotation_tracks, &["rotation.x", "quaternion.x"], 0);
    let rot_y = axis_source(&rotation_tracks, &["rotation.y", "quaternion.y"], 1);
    let rot_z = axis_source(&rotation_tracks, &["rotation.z", "quaternion.z"], 2);

    let is_quaternion = rotation_tracks
        .iter()
        .any(|t| t.name.contains("quaternion"));
    let rot_w = axis_source(&rotation_tracks, &["quaternion.w"], 3);

    let mut frames = Vec::with_capacity(sample_count);
    for i in 0..sample_count {
        if i >= pos_x.track.len() {
            break;
        }

        let position = Vec3::new(pos_x.value(i), axis_value(pos_y, i), axis_value(pos_z, i));
        let (x, y, z) = (axis_value(rot_x, i), axis_value(rot_y, i), axis_value(rot_z, i));
        let rotation = match (is_quaternion, rot_w) {
            (true, Some(w)) => quat_to_euler(Quat::from_xyzw(x, y, z, w.value(i))),
            _ => Vec3::new(x, y, z),
        };

        frames.push(AnimationFrame {
            time: pos_x.track.times[i],
            position,
            rotation,
        });
    }

    Ok(frames)
}

/// Answers "where is the camera at timeline position T?".
#[derive(Debug, Clone, Default)]
pub struct FrameSampler {
    frames: Vec<AnimationFrame>,
    length: f32,
    loaded: bool,
    /// Last queried position (as bits) and its result.
    cache: Option<(u32, Pose)>,
}

impl FrameSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a clip, replacing any previous frame list.
    ///
    /// On failure the sampler is left unloaded and empty.
    pub fn load(&mut self, clip: &AnimationClip) -> Result<(), CameraError> {
        self.frames.clear();
        self.cache = None;
        self.loaded = false;
        self.length = 0.0;

        let frames = extract_frames(clip)?;
        if frames.is_empty() {
            return Err(CameraError::NoTracks);
        }

        let last_time = frames.last().map_or(0.0, |f| f.time);
        self.length = if clip.duration > 0.0 {
            clip.duration
        } else {
            last_time
        };
        tracing::info!(
            "[sampler] loaded clip '{}': {} frames, length {:.3}",
            clip.name,
            frames.len(),
            self.length
        );
        self.frames = frames;
        self.loaded = true;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    /// Timeline length of the loaded clip.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Returns the interpolated pose at `position`.
    ///
    /// Positions outside the frame range clamp to the boundary frame.
    pub fn sample_at(&mut self, position: f32) -> Pose {
        let key = position.to_bits();
        if let Some((cached, pose)) = self.cache {
            if cached == key {
                return pose;
            }
        }

        let pose = self.interpolate(position);
        self.cache = Some((key, pose));
        pose
    }

    fn interpolate(&self, position: f32) -> Pose {
        let Some((start, end)) = self.find_bracket(position) else {
            return Pose::default();
        };

        let start = &self.frames[start];
        let end = &self.frames[end];
        let span = end.time - start.time;
        if span <= 0.0 || !span.is_finite() {
            return start.pose();
        }

        let t = (position - start.time) / span;
        start.pose().lerp(&end.pose(), t)
    }

    /// Indices of the frames immediately before and after `position`.
    fn find_bracket(&self, position: f32) -> Option<(usize, usize)> {
        let frames = &self.frames;
        let n = frames.len();
        if n == 0 {
            return None;
        }
        let last = n - 1;
        if n == 1 || position <= frames[0].time {
            return Some((0, 0));
        }
        if position >= frames[last].time {
            return Some((last, last));
        }

        // Binary search assumes ascending times.
        let (mut lo, mut hi) = (0usize, n);
        while lo < hi {
            let mid = (lo + hi) / 2;
            let here = frames[mid].time;
            if here <= position && (mid == last || frames[mid + 1].time >= position) {
                return Some((mid, (mid + 1).min(last)));
            }
            if here > position {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }

        tracing::debug!("[sampler] binary search failed at {}, scanning", position);
        for i in 0..last {
            if position >= frames[i].time && position <= frames[i + 1].time {
                return Some((i, i + 1));
            }
        }

        let to_first = (position - frames[0].time).abs();
        let to_last = (position - frames[last].time).abs();
        if to_last < to_first {
            Some((last, last))
        } else {
            Some((0, 0))
        }
    }
}
