//! Ray query results.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Nearest intersection of a ray with the collision proxy.
///
/// A missing hit is expressed as `None` by the query, never as a sentinel
/// distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Ray parameter of the hit. Directions are unit length, so this is
    /// also the world-space distance from the origin.
    pub distance: f32,

    /// World-space intersection point.
    pub point: Vec3,
}

impl RayHit {
    /// Build a hit from a ray and its time of impact.
    pub fn along(origin: Vec3, direction: Vec3, distance: f32) -> Self {
        Self {
            distance,
            point: origin + direction * distance,
        }
    }

    /// Whether the hit is strictly closer than `limit`.
    #[inline]
    pub fn closer_than(&self, limit: f32) -> bool {
        self.distance < limit
    }
}
