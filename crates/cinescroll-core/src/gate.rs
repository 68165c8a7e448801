//! Proximity-triggered interaction points.

use std::collections::{HashMap, HashSet};

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::GateConfig;

/// Interface the collaborator should open when a point fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceKind {
    #[default]
    None,
    Capture,
    Scanner,
    Image,
    Video,
    Blackscreen,
}

/// User gesture the interface expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    #[default]
    Click,
    LongPress,
    DragLeft,
    DragRight,
    DragUp,
    DragDown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionPoint {
    pub id: String,
    pub trigger_x: f32,
    pub trigger_z: f32,
    /// Scene object the interaction targets.
    #[serde(default)]
    pub object_key: Option<String>,
    /// Point that must be completed before this one can fire.
    #[serde(default)]
    pub prerequisite_id: Option<String>,
    #[serde(default)]
    pub interface: InterfaceKind,
    #[serde(default)]
    pub gesture: GestureKind,
}

impl InteractionPoint {
    /// Distance on the ground plane (X/Z) from `position` to the trigger.
    pub fn planar_distance(&self, position: Vec3) -> f32 {
        let dx = position.x - self.trigger_x;
        let dz = position.z - self.trigger_z;
        (dx * dx + dz * dz).sqrt()
    }

    fn prerequisite_met(&self, completed: &HashSet<String>) -> bool {
        self.prerequisite_id
            .as_ref()
            .is_none_or(|prerequisite| completed.contains(prerequisite))
    }
}

/// Payload handed to the interaction-interface collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerFired {
    pub point_id: String,
    pub interface: InterfaceKind,
    pub gesture: GestureKind,
    pub object_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InteractionGate {
    points: Vec<InteractionPoint>,
    proximity: f32,
    dedupe_window_ms: f64,
    /// Point whose interface is open, awaiting completion.
    waiting: Option<String>,
    /// Last accepted completion time per id.
    recent_completions: HashMap<String, f64>,
}

impl InteractionGate {
    pub fn new(points: Vec<InteractionPoint>, config: &GateConfig) -> Self {
        Self {
            points,
            proximity: config.proximity,
            dedupe_window_ms: config.dedupe_window_ms,
            waiting: None,
            recent_completions: HashMap::new(),
        }
    }

    pub fn points(&self) -> &[InteractionPoint] {
        &self.points
    }

    pub fn point(&self, id: &str) -> Option<&InteractionPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn waiting(&self) -> Option<&str> {
        self.waiting.as_deref()
    }

    /// Checks the camera position against every eligible point.
    ///
    /// `blocked` is true while the timeline is gated or a transition is
    /// running; nothing fires then.
    pub fn tick(
        &mut self,
        camera_position: Vec3,
        completed: &HashSet<String>,
        blocked: bool,
    ) -> Option<TriggerFired> {
        if blocked || self.waiting.is_some() {
            return None;
        }

        let point = self.points.iter().find(|point| {
            !completed.contains(&point.id)
                && point.prerequisite_met(completed)
                && point.planar_distance(camera_position) < self.proximity
        })?;

        tracing::info!(
            "[gate] trigger '{}' fired (interface {:?}, distance {:.2})",
            point.id,
            point.interface,
            point.planar_distance(camera_position)
        );
        let fired = TriggerFired {
            point_id: point.id.clone(),
            interface: point.interface,
            gesture: point.gesture,
            object_key: point.object_key.clone(),
        };
        self.waiting = Some(fired.point_id.clone());
        Some(fired)
    }

    /// Accepts a completion signal for `id`.
    ///
    /// Only the point the gate is waiting on can complete. Returns `false`
    /// for repeats within the dedupe window and for ids nothing waits on.
    pub fn complete(&mut self, id: &str, now_ms: f64) -> bool {
        let window = self.dedupe_window_ms;
        self.recent_completions
            .retain(|_, accepted| now_ms - *accepted < window);

        if self.recent_completions.contains_key(id) {
            tracing::warn!("[gate] duplicate completion for '{}' ignored", id);
            return false;
        }
        if self.waiting.as_deref() != Some(id) {
            tracing::warn!(
                "[gate] completion for '{}' ignored, waiting on {:?}",
                id,
                self.waiting
            );
            return false;
        }
        self.recent_completions.insert(id.to_string(), now_ms);
        self.waiting = None;
        tracing::info!("[gate] interaction '{}' complete", id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, x: f32, z: f32, prerequisite: Option<&str>) -> InteractionPoint {
        InteractionPoint {
            id: id.to_string(),
            trigger_x: x,
            trigger_z: z,
            object_key: None,
            prerequisite_id: prerequisite.map(str::to_string),
            interface: InterfaceKind::Scanner,
            gesture: GestureKind::Click,
        }
    }

    fn gate(points: Vec<InteractionPoint>) -> InteractionGate {
        InteractionGate::new(points, &GateConfig::default())
    }

    #[test]
    fn test_fires_inside_proximity_only() {
        let mut gate = gate(vec![point("first", 0.0, -20.0, None)]);
        let done = HashSet::new();

        assert!(gate.tick(Vec3::new(0.0, 0.0, -15.0), &done, false).is_none());
        // Height is ignored.
        let fired = gate
            .tick(Vec3::new(3.0, 50.0, -17.0), &done, false)
            .unwrap();
        assert_eq!(fired.point_id, "first");
        assert_eq!(fired.interface, InterfaceKind::Scanner);
        assert_eq!(gate.waiting(), Some("first"));
    }

    #[test]
    fn test_prerequisite_blocks_until_completed() {
        let mut gate = gate(vec![
            point("first", 100.0, 100.0, None),
            point("second", 0.0, 0.0, Some("first")),
        ]);
        let mut done = HashSet::new();

        for _ in 0..10 {
            assert!(gate.tick(Vec3::ZERO, &done, false).is_none());
        }

        done.insert("first".to_string());
        let fired = gate.tick(Vec3::ZERO, &done, false).unwrap();
        assert_eq!(fired.point_id, "second");
    }

    #[test]
    fn test_blocked_and_waiting_suppress_firing() {
        let mut gate = gate(vec![point("a", 0.0, 0.0, None), point("b", 1.0, 0.0, None)]);
        let done = HashSet::new();

        assert!(gate.tick(Vec3::ZERO, &done, true).is_none());
        assert!(gate.tick(Vec3::ZERO, &done, false).is_some());
        // "b" is also in range, but the gate waits on "a".
        assert!(gate.tick(Vec3::ZERO, &done, false).is_none());
    }

    #[test]
    fn test_completed_points_never_refire() {
        let mut gate = gate(vec![point("a", 0.0, 0.0, None)]);
        let mut done = HashSet::new();
        gate.tick(Vec3::ZERO, &done, false).unwrap();
        assert!(gate.complete("a", 0.0));
        done.insert("a".to_string());
        assert!(gate.waiting().is_none());
        assert!(gate.tick(Vec3::ZERO, &done, false).is_none());
    }

    #[test]
    fn test_duplicate_completion_rejected() {
        let mut gate = gate(vec![point("a", 0.0, 0.0, None)]);
        gate.tick(Vec3::ZERO, &HashSet::new(), false).unwrap();
        assert!(gate.complete("a", 1000.0));
        assert!(!gate.complete("a", 1500.0));
        // Outside the window the point is no longer waited on either.
        assert!(!gate.complete("a", 3000.0));
    }

    #[test]
    fn test_completion_requires_waiting_point() {
        let mut gate = gate(vec![point("a", 0.0, 0.0, None), point("b", 50.0, 0.0, None)]);
        assert!(!gate.complete("a", 0.0));

        gate.tick(Vec3::ZERO, &HashSet::new(), false).unwrap();
        assert!(!gate.complete("b", 10.0));
        assert_eq!(gate.waiting(), Some("a"));
        assert!(gate.complete("a", 20.0));
    }

    #[test]
    fn test_point_from_json_defaults() {
        let point: InteractionPoint = serde_json::from_str(
            r#"{ "id": "firstStop", "trigger_x": 0.5, "trigger_z": -3.0, "interface": "capture", "gesture": "drag_up" }"#,
        )
        .unwrap();
        assert_eq!(point.interface, InterfaceKind::Capture);
        assert_eq!(point.gesture, GestureKind::DragUp);
        assert!(point.prerequisite_id.is_none());
    }
}
