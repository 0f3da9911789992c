//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (enemies in insertion order)
//! - No rendering, audio playback or platform dependencies

pub mod avoidance;
pub mod behavior;
pub mod body;
pub mod collision;
pub mod debug;
pub mod grid;
pub mod scenario;
pub mod state;
pub mod tick;
pub mod timer;

pub use avoidance::avoid;
pub use behavior::{BehaviorContext, BehaviorTree, TreeBuilder, TreeError};
pub use body::{Body, accelerate, integrate, rotate_towards};
pub use collision::{
    Circle, Rect, circle_vs_circle, circles_overlap, line_vs_circle, nearest_intersection,
    point_in_rect,
};
pub use debug::DebugOverlay;
pub use grid::Grid;
pub use state::{
    Enemy, GameEvent, GamePhase, GameState, Player, Projectile, ProjectileOwner, World,
};
pub use tick::{TickInput, evaluate_phase, resolve_collisions, tick};
pub use timer::Timer;
