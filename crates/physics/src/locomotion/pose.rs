//! Dolly pose.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and body orientation of the dolly.
///
/// The head (camera) rides on the dolly and looks around independently;
/// its orientation is not stored here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position in world space (floor level under the viewer).
    pub position: Vec3,

    /// Body orientation. Locomotion never changes it.
    pub body_orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            body_orientation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    /// Create a pose at the given position with identity orientation.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// World orientation of a head mounted on this dolly.
    #[inline]
    pub fn look_orientation(&self, head_local: Quat) -> Quat {
        self.body_orientation * head_local
    }

    /// World position of a point given in the dolly's local frame.
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.body_orientation * local
    }
}

/// Forward axis of an orientation (-Z in local space).
#[inline]
pub(crate) fn forward(orientation: Quat) -> Vec3 {
    orientation * Vec3::NEG_Z
}

/// Left axis of an orientation (-X in local space).
#[inline]
pub(crate) fn left(orientation: Quat) -> Vec3 {
    orientation * Vec3::NEG_X
}

/// Right axis of an orientation (+X in local space).
#[inline]
pub(crate) fn right(orientation: Quat) -> Vec3 {
    orientation * Vec3::X
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_axes_identity() {
        assert_eq!(forward(Quat::IDENTITY), Vec3::NEG_Z);
        assert_eq!(left(Quat::IDENTITY), Vec3::NEG_X);
        assert_eq!(right(Quat::IDENTITY), Vec3::X);
    }

    #[test]
    fn test_axes_after_yaw() {
        // Turning left by 90 degrees faces -X
        let yaw = Quat::from_rotation_y(FRAC_PI_2);
        assert!(forward(yaw).abs_diff_eq(Vec3::NEG_X, 1e-5));
        assert!(right(yaw).abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn test_head_on_turned_body() {
        let mut pose = Pose::new(Vec3::new(1.0, 0.0, 2.0));
        pose.body_orientation = Quat::from_rotation_y(FRAC_PI_2);

        let eye = pose.to_world(Vec3::new(0.0, 1.6, 0.0));
        assert!(eye.abs_diff_eq(Vec3::new(1.0, 1.6, 2.0), 1e-5));

        let look = pose.look_orientation(Quat::from_rotation_y(FRAC_PI_2));
        assert!(forward(look).abs_diff_eq(Vec3::Z, 1e-5));
    }
}
