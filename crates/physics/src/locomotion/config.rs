//! Locomotion tuning constants.

use serde::{Deserialize, Serialize};

/// Configuration for dolly locomotion.
///
/// All values use world units (meters, seconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Forward speed while movement is requested (units/second).
    pub speed: f32,

    /// Minimum distance kept between the dolly and any wall.
    pub wall_clearance: f32,

    /// Height above the dolly origin that wall rays start from.
    pub torso_height: f32,

    /// Height above the dolly origin that the ground probe starts from.
    pub ground_probe_height: f32,

    /// Largest frame delta fed to the controller (seconds).
    pub max_delta_time: f32,

    /// Whether keyboard movement in a windowed session collides with walls.
    pub windowed_collision: bool,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            wall_clearance: 1.3,
            torso_height: 1.0,
            ground_probe_height: 1.5,
            max_delta_time: 0.1,
            windowed_collision: true,
        }
    }
}

impl LocomotionConfig {
    /// A brisker preset for large outdoor spaces.
    pub fn brisk() -> Self {
        Self {
            speed: 4.0,
            wall_clearance: 1.0,
            ..Default::default()
        }
    }

    /// Forward distance covered in `delta_time` seconds.
    #[inline]
    pub fn stride(&self, delta_time: f32) -> f32 {
        self.speed * delta_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LocomotionConfig::default();
        assert_eq!(config.speed, 2.0);
        assert_eq!(config.wall_clearance, 1.3);
        assert!(config.ground_probe_height > config.torso_height);
    }

    #[test]
    fn test_stride() {
        let config = LocomotionConfig::default();
        assert!((config.stride(0.5) - 1.0).abs() < 1e-6);
        assert_eq!(config.stride(0.0), 0.0);
    }
}
