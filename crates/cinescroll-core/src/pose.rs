//! Camera pose representation.

use bevy::math::{EulerRot, Quat, Vec3};

/// Euler order used for every rotation triple in the engine.
pub const EULER_ORDER: EulerRot = EulerRot::XYZ;

/// Camera position plus Euler rotation (radians, XYZ order).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    /// Component-wise linear interpolation of position and rotation.
    ///
    /// Rotation components are interpolated independently, not along the
    /// shortest arc.
    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            position: self.position + (other.position - self.position) * t,
            rotation: self.rotation + (other.rotation - self.rotation) * t,
        }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EULER_ORDER, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

/// Converts a unit quaternion to an Euler triple in [`EULER_ORDER`].
pub fn quat_to_euler(rotation: Quat) -> Vec3 {
    let (x, y, z) = rotation.normalize().to_euler(EULER_ORDER);
    Vec3::new(x, y, z)
}
