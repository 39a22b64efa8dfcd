//! Pose types for placing nodes and the player anchor.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World-space position
    pub position: Vec3,
    /// World-space orientation
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// Pose at the origin with no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    /// Creates a new pose.
    #[must_use]
    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Creates a pose at a position with no rotation.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Creates a pose from a position and yaw/pitch/roll angles in degrees.
    #[must_use]
    pub fn from_euler_degrees(position: Vec3, yaw: f32, pitch: f32, roll: f32) -> Self {
        let orientation = Quat::from_euler(
            EulerRot::YXZ,
            yaw.to_radians(),
            pitch.to_radians(),
            roll.to_radians(),
        );
        Self::new(position, orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_default_is_identity() {
        assert_eq!(Pose::default(), Pose::IDENTITY);
    }

    #[test]
    fn test_pose_at() {
        let pose = Pose::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_pose_yaw_turns_forward() {
        let pose = Pose::from_euler_degrees(Vec3::ZERO, 90.0, 0.0, 0.0);
        let fwd = pose.orientation * Vec3::NEG_Z;
        // Yaw of +90 degrees turns -Z toward -X
        assert!((fwd.x + 1.0).abs() < 1e-5);
        assert!(fwd.z.abs() < 1e-5);
    }
}
