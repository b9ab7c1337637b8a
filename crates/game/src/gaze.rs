//! Gaze dwell.
//!
//! With no hand controller, the viewer moves by holding their gaze. The
//! evaluator is consulted once per immersive frame and classifies the head
//! as idle or moving.

use glam::Quat;

/// Gaze classification for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GazeMode {
    #[default]
    Idle,
    Move,
}

/// Classifies head orientation into a gaze mode, once per frame.
pub trait GazeEvaluator: std::fmt::Debug {
    fn evaluate(&mut self, look: Quat, delta_time: f32) -> GazeMode;
}

/// Moves after the head has held still for a dwell time.
///
/// Any rotation beyond the tolerance resets the dwell.
#[derive(Debug, Clone)]
pub struct DwellGaze {
    dwell_time: f32,
    tolerance: f32,
    anchor: Option<Quat>,
    held: f32,
}

impl DwellGaze {
    pub fn new(dwell_time: f32, tolerance: f32) -> Self {
        Self {
            dwell_time,
            tolerance,
            anchor: None,
            held: 0.0,
        }
    }
}

impl GazeEvaluator for DwellGaze {
    fn evaluate(&mut self, look: Quat, delta_time: f32) -> GazeMode {
        match self.anchor {
            Some(anchor) if anchor.angle_between(look) <= self.tolerance => {
                self.held += delta_time;
            }
            _ => {
                self.anchor = Some(look);
                self.held = 0.0;
            }
        }

        if self.held >= self.dwell_time {
            GazeMode::Move
        } else {
            GazeMode::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dwell_then_move() {
        let mut gaze = DwellGaze::new(1.0, 0.1);
        let look = Quat::from_rotation_y(0.3);

        assert_eq!(gaze.evaluate(look, 0.0), GazeMode::Idle);
        assert_eq!(gaze.evaluate(look, 0.5), GazeMode::Idle);
        assert_eq!(gaze.evaluate(look, 0.5), GazeMode::Move);
        assert_eq!(gaze.evaluate(look, 0.5), GazeMode::Move);
    }

    #[test]
    fn test_small_drift_keeps_dwell() {
        let mut gaze = DwellGaze::new(1.0, 0.1);

        gaze.evaluate(Quat::from_rotation_y(0.30), 0.0);
        gaze.evaluate(Quat::from_rotation_y(0.33), 0.6);
        assert_eq!(gaze.evaluate(Quat::from_rotation_y(0.36), 0.6), GazeMode::Move);
    }

    #[test]
    fn test_turning_head_resets_dwell() {
        let mut gaze = DwellGaze::new(1.0, 0.1);
        let look = Quat::from_rotation_y(0.3);

        gaze.evaluate(look, 0.0);
        assert_eq!(gaze.evaluate(look, 1.5), GazeMode::Move);

        let turned = Quat::from_rotation_y(1.0);
        assert_eq!(gaze.evaluate(turned, 0.1), GazeMode::Idle);
        assert_eq!(gaze.evaluate(turned, 0.5), GazeMode::Idle);
        assert_eq!(gaze.evaluate(turned, 0.5), GazeMode::Move);
    }
}
