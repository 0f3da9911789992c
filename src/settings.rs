//! Session tunables
//!
//! Loaded from a JSON file when one is given; anything missing falls back to
//! the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::PersistenceError;

/// Arena, grid and player tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Spatial grid tile size
    pub tile_width: f32,
    pub tile_height: f32,

    // === Player ===
    /// Units per second
    pub player_speed: f32,
    /// Degrees per second
    pub player_turn_rate: f32,
    /// Seconds between shots
    pub player_attack_cooldown: f32,

    /// Seed for shot spread
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: SCREEN_WIDTH,
            arena_height: SCREEN_HEIGHT,
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,

            player_speed: PLAYER_SPEED,
            player_turn_rate: PLAYER_TURN_RATE,
            player_attack_cooldown: PLAYER_ATTACK_COOLDOWN,

            seed: 0x5EED,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from disk, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Using default settings ({}: {})", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
