//! Pointer-driven look offset layered on the authored orientation.

use bevy::math::{Quat, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::MouseLookConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LookOffset {
    /// Radians about the up axis.
    pub yaw: f32,
    /// Radians about the right axis.
    pub pitch: f32,
}

impl LookOffset {
    /// Applies the offset on top of `base`: yaw first, then pitch.
    pub fn compose(&self, base: Quat) -> Quat {
        base * Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }
}

#[derive(Debug, Clone)]
pub struct MouseLookOverlay {
    config: MouseLookConfig,
    /// Normalized pointer position, `[0, 1]` on both axes.
    pointer: Vec2,
    offset: LookOffset,
}

impl MouseLookOverlay {
    pub fn new(config: MouseLookConfig) -> Self {
        Self {
            config,
            pointer: Vec2::splat(0.5),
            offset: LookOffset::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.pointer = Vec2::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
        }
    }

    pub fn offset(&self) -> LookOffset {
        self.offset
    }

    /// Offset the pointer is asking for, before smoothing.
    pub fn target(&self) -> LookOffset {
        LookOffset {
            yaw: -(self.pointer.x - 0.5) * 2.0 * self.config.max_yaw,
            pitch: -(self.pointer.y - 0.5) * 2.0 * self.config.max_pitch,
        }
    }

    /// Smooths toward the pointer target, or decays toward zero while an
    /// interface is open or the overlay is disabled.
    pub fn tick(&mut self, interface_active: bool) -> LookOffset {
        if interface_active || !self.config.enabled {
            let keep = 1.0 - self.config.decay_rate;
            self.offset.yaw *= keep;
            self.offset.pitch *= keep;
        } else {
            let target = self.target();
            let s = self.config.smoothing;
            self.offset.yaw += (target.yaw - self.offset.yaw) * s;
            self.offset.pitch += (target.pitch - self.offset.pitch) * s;
        }
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::{EulerRot, Vec3};

    fn overlay() -> MouseLookOverlay {
        MouseLookOverlay::new(MouseLookConfig::default())
    }

    #[test]
    fn test_target_mapping() {
        let mut look = overlay();
        look.set_pointer(1.0, 0.0);
        let target = look.target();
        assert!((target.yaw + 0.2).abs() < 1e-6);
        assert!((target.pitch - 0.1).abs() < 1e-6);

        look.set_pointer(0.5, 0.5);
        assert_eq!(look.target(), LookOffset::default());
    }

    #[test]
    fn test_smoothing_converges() {
        let mut look = overlay();
        look.set_pointer(0.0, 1.0);
        let first = look.tick(false);
        assert!((first.yaw - 0.2 * 0.05).abs() < 1e-6);
        for _ in 0..500 {
            look.tick(false);
        }
        let settled = look.offset();
        assert!((settled.yaw - 0.2).abs() < 1e-4);
        assert!((settled.pitch + 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_decays_while_interface_active() {
        let mut look = overlay();
        look.set_pointer(0.0, 0.0);
        for _ in 0..200 {
            look.tick(false);
        }
        let before = look.offset().yaw;
        let after = look.tick(true).yaw;
        assert!(after.abs() < before.abs());
        assert!((after - before * 0.9).abs() < 1e-6);
        for _ in 0..200 {
            look.tick(true);
        }
        assert!(look.offset().yaw.abs() < 1e-6);
    }

    #[test]
    fn test_compose_matches_quaternion_product() {
        let base = Quat::from_euler(EulerRot::XYZ, 0.0, 1.2, 0.0);
        let offset = LookOffset {
            yaw: 0.1,
            pitch: -0.05,
        };
        let composed = offset.compose(base);
        let expected = base * Quat::from_rotation_y(0.1) * Quat::from_rotation_x(-0.05);
        assert!((composed * Vec3::NEG_Z - expected * Vec3::NEG_Z).length() < 1e-6);
        assert!((composed * Vec3::X - expected * Vec3::X).length() < 1e-6);

        // Zero offset leaves the base untouched.
        let forward = LookOffset::default().compose(base) * Vec3::NEG_Z;
        assert!((forward - base * Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_pointer_clamped() {
        let mut look = overlay();
        look.set_pointer(3.0, -1.0);
        assert_eq!(look.pointer(), Vec2::new(1.0, 0.0));
        look.set_pointer(f32::NAN, 0.2);
        assert_eq!(look.pointer(), Vec2::new(1.0, 0.0));
    }
}
