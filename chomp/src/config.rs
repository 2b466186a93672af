use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use scene2d::LocationTable;
use serde::{Deserialize, Serialize};

use crate::level::{self, WallSpec};

/// An asset the preloader should fetch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub key: String,
    pub path: String,
}

impl AssetEntry {
    pub fn new(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }
}

/// Tunable game settings. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Player speed in pixels per second.
    pub player_speed: f32,
    /// Enemy speed in pixels per second.
    pub enemy_speed: f32,
    /// Side of the square player and enemy bodies.
    pub entity_size: f32,
    /// Points awarded per dot.
    pub dot_points: u32,
    pub dot_radius: f32,
    /// Distance between neighbouring dot grid cells.
    pub dot_spacing: f32,
    /// Thickness of the invisible walls around the viewport.
    pub boundary_thickness: f32,
    pub walls: Vec<WallSpec>,
    pub assets: Vec<AssetEntry>,
    /// Per-scene placement overrides, merged over the built-in tables.
    pub locations: HashMap<String, LocationTable>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_speed: 200.0,
            enemy_speed: 100.0,
            entity_size: 32.0,
            dot_points: 10,
            dot_radius: 4.0,
            dot_spacing: 64.0,
            boundary_thickness: 32.0,
            walls: level::default_walls(),
            assets: vec![
                AssetEntry::new("background", "assets/bg.png"),
                AssetEntry::new("pacman-frame1", "assets/sprites/player/frame1.png"),
                AssetEntry::new("pacman-frame2", "assets/sprites/player/frame2.png"),
                AssetEntry::new("ghost", "assets/sprites/enemies/ghost.png"),
            ],
            locations: HashMap::new(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing game config")
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = GameConfig::from_json_str("{}").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.dot_points, 10);
        assert_eq!(config.player_speed, 200.0);
        assert_eq!(config.enemy_speed, 100.0);
    }

    #[test]
    fn partial_files_override_fields() {
        let config = GameConfig::from_json_str(
            r#"{
                "enemySpeed": 150,
                "walls": [],
                "locations": {
                    "Game": { "player": { "x": 100, "y": 120 } }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.enemy_speed, 150.0);
        assert!(config.walls.is_empty());
        let player = &config.locations["Game"]["player"];
        assert_eq!((player.x, player.y), (100.0, 120.0));
        assert!(!player.is_from_center());
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(GameConfig::from_json_str("{ \"dotPoints\": \"ten\" }").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = GameConfig::load("no/such/chomp.json").unwrap_err();
        assert!(format!("{err:#}").contains("no/such/chomp.json"));
    }
}
