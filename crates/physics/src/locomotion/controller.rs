//! Dolly locomotion controller.
//!
//! This is the main entry point for dolly movement. Each frame it takes the
//! head heading and the elapsed time and updates the pose through the
//! collision proxy.

use glam::{Quat, Vec3};

use crate::collision::CollisionProxy;

use super::config::LocomotionConfig;
use super::pose::{self, Pose};

/// What a single locomotion step did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionReport {
    /// Forward movement was blocked by a wall closer than the clearance.
    pub blocked: bool,

    /// Forward translation applied this frame.
    pub advance: Vec3,

    /// Sideways correction applied by the wall clamps.
    pub lateral_correction: Vec3,

    /// The ground probe found a floor and the dolly was snapped onto it.
    pub grounded: bool,
}

/// Dolly locomotion controller.
///
/// Runs four ray queries per step, in a fixed order:
///
/// 1. Forward sweep along the heading; blocks the move if a wall is close
/// 2. Left clamp; pushes right to the clearance boundary
/// 3. Right clamp; pushes left to the clearance boundary
/// 4. Ground probe; places the dolly exactly on the floor below
///
/// # Example
///
/// ```ignore
/// let controller = LocomotionController::new(LocomotionConfig::default());
/// let mut pose = Pose::new(spawn);
///
/// // Each frame:
/// controller.step(&mut pose, look, Some(&proxy), delta_time);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocomotionController {
    /// Locomotion configuration.
    pub config: LocomotionConfig,
}

impl LocomotionController {
    /// Create a new controller with the given configuration.
    pub fn new(config: LocomotionConfig) -> Self {
        Self { config }
    }

    /// Advance the dolly for one frame.
    ///
    /// Without a collision proxy the world is still loading and the step is
    /// a no-op.
    ///
    /// # Arguments
    ///
    /// * `pose` - The dolly pose (position is modified, orientation is not)
    /// * `heading` - World orientation of the head, used for steering
    /// * `proxy` - The collision proxy, if loaded
    /// * `delta_time` - Time step in seconds
    pub fn step(
        &self,
        pose: &mut Pose,
        heading: Quat,
        proxy: Option<&CollisionProxy>,
        delta_time: f32,
    ) -> LocomotionReport {
        let Some(proxy) = proxy else {
            return LocomotionReport::default();
        };

        let mut report = LocomotionReport::default();

        self.forward_sweep(pose, heading, proxy, delta_time, &mut report);

        // Lateral rays start from where the forward move left us
        let origin = pose.position + Vec3::Y * self.config.torso_height;
        report.lateral_correction = self.lateral_clamp(origin, heading, proxy);
        pose.position += report.lateral_correction;

        report.grounded = self.ground_snap(pose, proxy);

        report
    }

    /// Advance the dolly without any collision checks.
    ///
    /// Used for keyboard movement in windowed sessions when
    /// `windowed_collision` is off.
    pub fn step_free(&self, pose: &mut Pose, heading: Quat, delta_time: f32) -> LocomotionReport {
        let advance = pose::forward(heading) * self.config.stride(delta_time);
        pose.position += advance;

        LocomotionReport {
            advance,
            ..Default::default()
        }
    }

    /// Snap the dolly onto the floor below it.
    ///
    /// Also used once to place the dolly when the proxy first arrives.
    /// Probes straight down from `ground_probe_height` above the current
    /// position. Returns `false` and leaves the pose untouched if nothing is
    /// below.
    pub fn ground_snap(&self, pose: &mut Pose, proxy: &CollisionProxy) -> bool {
        let origin = pose.position + Vec3::Y * self.config.ground_probe_height;

        match proxy.raycast(origin, Vec3::NEG_Y) {
            Some(hit) => {
                pose.position = hit.point;
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn forward_sweep(
        &self,
        pose: &mut Pose,
        heading: Quat,
        proxy: &CollisionProxy,
        delta_time: f32,
        report: &mut LocomotionReport,
    ) {
        let origin = pose.position + Vec3::Y * self.config.torso_height;
        let direction = pose::forward(heading);

        if let Some(hit) = proxy.raycast(origin, direction) {
            if hit.closer_than(self.config.wall_clearance) {
                log::trace!("forward blocked: wall at {:.3}", hit.distance);
                report.blocked = true;
                return;
            }
        }

        report.advance = direction * self.config.stride(delta_time);
        pose.position += report.advance;
    }

    /// Both rays share `origin`; the right clamp does not see the left push.
    fn lateral_clamp(&self, origin: Vec3, heading: Quat, proxy: &CollisionProxy) -> Vec3 {
        let clearance = self.config.wall_clearance;
        let right = pose::right(heading);
        let mut correction = Vec3::ZERO;

        if let Some(hit) = proxy.raycast(origin, pose::left(heading)) {
            if hit.closer_than(clearance) {
                log::trace!("left wall at {:.3}, pushing right", hit.distance);
                correction += right * (clearance - hit.distance);
            }
        }

        if let Some(hit) = proxy.raycast(origin, right) {
            if hit.closer_than(clearance) {
                log::trace!("right wall at {:.3}, pushing left", hit.distance);
                correction += right * (hit.distance - clearance);
            }
        }

        correction
    }
}

// ============================================================================
// Tests
// ============================================================================
