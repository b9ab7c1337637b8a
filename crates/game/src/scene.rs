//! Scene index: where named nodes of the loaded environment are.
//!
//! Points of interest and anchors are resolved by name against this index.
//! A name that is not present is not an error; whatever depends on it is
//! skipped.

use std::collections::HashMap;

use glam::Vec3;

use crate::config::AnchorRule;

/// World positions of named scene nodes.
#[derive(Debug, Clone, Default)]
pub struct SceneIndex {
    nodes: HashMap<String, Vec3>,
}

impl SceneIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node's world position.
    ///
    /// The first node registered under a name wins; returns `false` for
    /// later duplicates.
    pub fn insert(&mut self, name: &str, position: Vec3) -> bool {
        if self.nodes.contains_key(name) {
            return false;
        }
        self.nodes.insert(name.to_string(), position);
        true
    }

    /// World position of a named node.
    pub fn position(&self, name: &str) -> Option<Vec3> {
        self.nodes.get(name).copied()
    }

    /// Create an anchor halfway between two existing nodes.
    ///
    /// Returns `false` (and creates nothing) if either node is missing.
    pub fn add_midpoint_anchor(&mut self, name: &str, a: &str, b: &str) -> bool {
        match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => self.insert(name, pa.lerp(pb, 0.5)),
            _ => false,
        }
    }

    /// Apply every anchor rule, logging the ones that cannot be placed.
    pub fn apply_anchors(&mut self, rules: &[AnchorRule]) -> usize {
        let mut placed = 0;
        for rule in rules {
            let [a, b] = &rule.between;
            if self.add_midpoint_anchor(&rule.name, a, b) {
                placed += 1;
            } else {
                log::warn!("Skipping anchor {}: needs nodes {} and {}", rule.name, a, b);
            }
        }
        placed
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_insert_wins() {
        let mut scene = SceneIndex::new();
        assert!(scene.insert("Lobby", Vec3::new(1.0, 0.0, 0.0)));
        assert!(!scene.insert("Lobby", Vec3::new(9.0, 0.0, 0.0)));
        assert_eq!(scene.position("Lobby"), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(scene.position("Library"), None);
    }

    #[test]
    fn test_midpoint_anchor() {
        let mut scene = SceneIndex::new();
        scene.insert("LobbyShop_Door__1_", Vec3::new(4.0, 0.0, -6.0));
        scene.insert("LobbyShop_Door__2_", Vec3::new(8.0, 1.0, -6.0));

        let placed = scene.apply_anchors(&[AnchorRule::new(
            "LobbyShop",
            "LobbyShop_Door__1_",
            "LobbyShop_Door__2_",
        )]);

        assert_eq!(placed, 1);
        assert_eq!(scene.position("LobbyShop"), Some(Vec3::new(6.0, 0.5, -6.0)));
    }

    #[test]
    fn test_anchor_with_missing_node_is_skipped() {
        let mut scene = SceneIndex::new();
        scene.insert("LobbyShop_Door__1_", Vec3::ZERO);

        assert!(!scene.add_midpoint_anchor("LobbyShop", "LobbyShop_Door__1_", "LobbyShop_Door__2_"));
        assert_eq!(scene.position("LobbyShop"), None);
        assert_eq!(scene.len(), 1);
    }
}
