//! Walkthrough configuration.
//!
//! Every tunable lives here, grouped by the part of the frame it affects.
//! The whole tree is serde-friendly so it can be loaded from a JSON file;
//! missing fields fall back to their defaults.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use walkthrough_physics::LocomotionConfig;

use crate::error::LoadError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkthroughConfig {
    /// Dolly movement.
    pub locomotion: LocomotionConfig,

    /// Info board triggering.
    pub proximity: ProximityConfig,

    /// Input sources.
    pub input: InputConfig,

    /// Scene conventions.
    pub scene: SceneConfig,

    /// Environment model (.glb/.gltf). `None` means the host supplies the
    /// world itself.
    pub model_path: Option<PathBuf>,

    /// Point-of-interest data (JSON).
    pub poi_path: Option<PathBuf>,
}

impl WalkthroughConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Configuration for the proximity-triggered info board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// A point of interest closer than this triggers its board.
    pub radius: f32,

    /// The board floats this far above the point of interest.
    pub board_height: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            radius: 3.0,
            board_height: 1.3,
        }
    }
}

/// Configuration for input intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Key codes that request forward movement in a windowed session.
    pub forward_keys: Vec<String>,

    /// Seconds of immersive session without any controller connecting
    /// before gaze dwell takes over.
    pub controller_timeout: f32,

    /// Seconds the head must hold still before gaze dwell moves.
    pub dwell_time: f32,

    /// Largest head rotation (radians) that still counts as holding still.
    pub dwell_tolerance: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            forward_keys: vec!["KeyW".to_string(), "ArrowUp".to_string()],
            controller_timeout: 2.0,
            dwell_time: 1.0,
            dwell_tolerance: 0.1,
        }
    }
}

/// Scene naming conventions and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Mesh nodes whose name contains this token are collision geometry.
    pub proxy_marker: String,

    /// Where the dolly starts.
    pub spawn_position: Vec3,

    /// Default head position on the dolly, used until tracking reports one.
    pub head_offset: Vec3,

    /// Named anchors created halfway between two existing nodes.
    pub anchors: Vec<AnchorRule>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            proxy_marker: "PROXY".to_string(),
            spawn_position: Vec3::new(0.0, 0.0, 10.0),
            head_offset: Vec3::new(0.0, 1.6, 0.0),
            anchors: vec![AnchorRule::new(
                "LobbyShop",
                "LobbyShop_Door__1_",
                "LobbyShop_Door__2_",
            )],
        }
    }
}

/// A named anchor placed at the midpoint of two scene nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRule {
    /// Name of the new anchor.
    pub name: String,

    /// The two nodes it sits between.
    pub between: [String; 2],
}

impl AnchorRule {
    pub fn new(name: &str, a: &str, b: &str) -> Self {
        Self {
            name: name.to_string(),
            between: [a.to_string(), b.to_string()],
        }
    }
}
