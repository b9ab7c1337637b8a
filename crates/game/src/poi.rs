//! Points of interest.
//!
//! The data file is a keyed mapping from scene node name to board content:
//!
//! ```json
//! {
//!     "Lobby": { "name": "Lobby", "info": "Welcome to the college." },
//!     "LobbyShop": { "name": "Shop", "info": "Open 9 till 5." }
//! }
//! ```
//!
//! Entries keep the order of the file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Text shown on the info board for one point of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiContent {
    /// Board title.
    pub name: String,

    /// Board body text.
    pub info: String,
}

/// A named point of interest.
///
/// The key doubles as the scene node name that gives its world position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointOfInterest {
    pub key: String,
    pub content: PoiContent,
}

/// All points of interest for the session, in file order.
#[derive(Debug, Clone, Default)]
pub struct PoiRegistry {
    entries: Vec<PointOfInterest>,
}

impl PoiRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a registry from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut registry = Self::new();
        for (key, value) in map {
            let content: PoiContent = serde_json::from_value(value)?;
            registry.insert(&key, content);
        }

        Ok(registry)
    }

    /// Add a point of interest. A repeated key replaces the earlier content
    /// but keeps its position in the order.
    pub fn insert(&mut self, key: &str, content: PoiContent) {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.content = content,
            None => self.entries.push(PointOfInterest {
                key: key.to_string(),
                content,
            }),
        }
    }

    /// Look up a point of interest by key.
    pub fn get(&self, key: &str) -> Option<&PointOfInterest> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Iterate in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &PointOfInterest> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLEGE: &str = r#"{
        "Zebra_Room": { "name": "Zebra Room", "info": "Listed first in the file." },
        "Lobby": { "name": "Lobby", "info": "Welcome." },
        "LobbyShop": { "name": "Shop", "info": "Snacks and stationery." }
    }"#;

    #[test]
    fn test_parse_keeps_file_order() {
        let registry = PoiRegistry::from_json_str(COLLEGE).unwrap();

        let keys: Vec<&str> = registry.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, ["Zebra_Room", "Lobby", "LobbyShop"]);
        assert_eq!(registry.get("LobbyShop").unwrap().content.name, "Shop");
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let result = PoiRegistry::from_json_str(r#"{ "Lobby": { "name": "Lobby" } }"#);
        assert!(matches!(result, Err(LoadError::Json(_))));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut registry = PoiRegistry::from_json_str(COLLEGE).unwrap();
        registry.insert(
            "Zebra_Room",
            PoiContent {
                name: "Renamed".to_string(),
                info: String::new(),
            },
        );

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.iter().next().unwrap().content.name, "Renamed");
    }

    #[test]
    fn test_missing_file() {
        let result = PoiRegistry::load("/nonexistent/college.json");
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
