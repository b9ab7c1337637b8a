//! Proximity-triggered info board.
//!
//! At most one point of interest is shown at a time. The board's content
//! always matches the shown point of interest, and the board is visible
//! exactly when one is shown.

use glam::{Mat3, Quat, Vec3};

use crate::config::ProximityConfig;
use crate::poi::{PoiContent, PoiRegistry, PointOfInterest};
use crate::scene::SceneIndex;

/// The floating info board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoBoard {
    pub title: String,
    pub body: String,

    /// World position of the board.
    pub position: Vec3,

    /// World orientation; the board's +Z face points at the viewer.
    pub orientation: Quat,

    pub visible: bool,
}

/// What the proximity check did to the board this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardChange {
    Unchanged,
    Shown(String),
    Hidden,
}

/// Which point of interest is shown, and the board showing it.
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    shown: Option<String>,
    board: Option<InfoBoard>,
}

impl OverlayState {
    /// Overlay state before the board exists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the (hidden) board. Until this runs, proximity checks do nothing.
    pub fn construct_board(&mut self) {
        if self.board.is_none() {
            self.board = Some(InfoBoard::default());
        }
    }

    pub fn is_constructed(&self) -> bool {
        self.board.is_some()
    }

    /// Key of the shown point of interest.
    pub fn shown(&self) -> Option<&str> {
        self.shown.as_deref()
    }

    pub fn board(&self) -> Option<&InfoBoard> {
        self.board.as_ref()
    }

    /// The board, if it exists and is visible.
    pub fn visible_board(&self) -> Option<&InfoBoard> {
        self.board.as_ref().filter(|b| b.visible)
    }

    fn show(&mut self, key: &str, content: &PoiContent, position: Vec3, viewer: Vec3) {
        let Some(board) = self.board.as_mut() else {
            return;
        };

        board.title.clone_from(&content.name);
        board.body.clone_from(&content.info);
        board.position = position;
        board.orientation = face_towards(position, viewer);
        board.visible = true;
        self.shown = Some(key.to_string());
    }

    fn hide(&mut self) {
        if let Some(board) = self.board.as_mut() {
            board.visible = false;
        }
        self.shown = None;
    }
}

/// Picks the point of interest to show and drives the board.
#[derive(Debug, Clone, Default)]
pub struct ProximityTriggerManager {
    pub config: ProximityConfig,
}

impl ProximityTriggerManager {
    pub fn new(config: ProximityConfig) -> Self {
        Self { config }
    }

    /// Nearest point of interest within the trigger radius.
    ///
    /// Exact distance ties go to the earlier registry entry. Points of
    /// interest with no scene node are never found.
    pub fn find<'a>(
        &self,
        registry: &'a PoiRegistry,
        scene: &SceneIndex,
        dolly: Vec3,
    ) -> Option<(&'a PointOfInterest, Vec3)> {
        let mut nearest: Option<(&PointOfInterest, Vec3, f32)> = None;

        for poi in registry.iter() {
            let Some(position) = scene.position(&poi.key) else {
                continue;
            };

            let distance = dolly.distance(position);
            if distance >= self.config.radius {
                continue;
            }

            let is_closer = nearest.map_or(true, |(_, _, best)| distance < best);
            if is_closer {
                nearest = Some((poi, position, distance));
            }
        }

        nearest.map(|(poi, position, _)| (poi, position))
    }

    /// Run the proximity check for one frame.
    ///
    /// # Arguments
    ///
    /// * `state` - Overlay state (board and shown key)
    /// * `registry` - Points of interest
    /// * `scene` - Scene index resolving their positions
    /// * `dolly` - Dolly world position
    /// * `viewer` - Head world position, for facing the board
    pub fn update(
        &self,
        state: &mut OverlayState,
        registry: &PoiRegistry,
        scene: &SceneIndex,
        dolly: Vec3,
        viewer: Vec3,
    ) -> BoardChange {
        if !state.is_constructed() {
            return BoardChange::Unchanged;
        }

        match self.find(registry, scene, dolly) {
            Some((poi, position)) => {
                if state.shown() == Some(poi.key.as_str()) {
                    return BoardChange::Unchanged;
                }
                let board_position = position + Vec3::Y * self.config.board_height;
                state.show(&poi.key, &poi.content, board_position, viewer);
                log::info!("Showing board for {}", poi.key);
                BoardChange::Shown(poi.key.clone())
            }
            None => {
                if state.shown().is_none() {
                    return BoardChange::Unchanged;
                }
                state.hide();
                log::info!("Hiding board");
                BoardChange::Hidden
            }
        }
    }
}

/// Orientation whose +Z axis points from `from` toward `target`, keeping
/// world up.
fn face_towards(from: Vec3, target: Vec3) -> Quat {
    let Some(z) = (target - from).try_normalize() else {
        return Quat::IDENTITY;
    };

    match Vec3::Y.cross(z).try_normalize() {
        Some(x) => {
            let y = z.cross(x);
            Quat::from_mat3(&Mat3::from_cols(x, y, z))
        }
        // Straight above or below
        None => Quat::from_rotation_arc(Vec3::Z, z),
    }
}
