//! Sunshine - decision-and-motion core of a small real-time arena shooter
//!
//! Core modules:
//! - `sim`: Simulation (geometry, steering, behavior trees, per-tick update)
//! - `audio`: Sound cues emitted by the simulation
//! - `persistence`: Obstacle and waypoint lists on disk
//! - `settings`: Data-driven tunables

pub mod audio;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use audio::SoundEvent;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Runner timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Max catch-up ticks per frame
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default arena dimensions
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Spatial grid tile size
    pub const TILE_WIDTH: f32 = 25.0;
    pub const TILE_HEIGHT: f32 = 25.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 60.0;
    pub const PLAYER_SPEED: f32 = 500.0;
    /// Degrees per second
    pub const PLAYER_TURN_RATE: f32 = 250.0;
    pub const PLAYER_ATTACK_COOLDOWN: f32 = 0.20;

    /// Player projectile defaults
    pub const PLAYER_SHOT_SPREAD_DEG: f32 = 10.0;
    pub const PLAYER_SHOT_RADIUS: f32 = 20.0;
    pub const PLAYER_SHOT_SPEED: f32 = 500.0;
    pub const PLAYER_SHOT_THRUST: f32 = 1000.0;
    pub const PLAYER_SHOT_DAMAGE: f32 = 5.0;

    /// Health every body starts with
    pub const DEFAULT_MAX_HEALTH: f32 = 100.0;

    /// Distance at which a patrol waypoint counts as reached
    pub const WAYPOINT_REACHED_DISTANCE: f32 = 50.0;
    /// Arrival steering starts slowing down inside this distance
    pub const ARRIVE_SLOW_RADIUS: f32 = 200.0;

    /// Avoidance probe offsets in degrees, in priority order
    pub const PROBE_ANGLES_DEG: [f32; 4] = [-15.0, -30.0, 15.0, 30.0];

    /// Length of the player's aim line in the debug overlay
    pub const AIM_LINE_LENGTH: f32 = 500.0;
}

/// Rotate a vector counter-clockwise (in math orientation) by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Unit vector in the direction of `v`, or zero for zero/non-finite input
#[inline]
pub fn safe_normalize(v: Vec2) -> Vec2 {
    if !v.is_finite() {
        return Vec2::ZERO;
    }
    v.normalize_or_zero()
}
