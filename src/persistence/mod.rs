//! Arena geometry and settings on disk
//!
//! Features:
//! - Obstacle and waypoint lists as plain JSON arrays
//! - Record validation (finite coordinates, non-negative radii)
//! - Order preserved on round trip

pub mod geometry;

pub use geometry::{
    load_obstacles, load_waypoints, obstacles_from_str, obstacles_to_string, save_obstacles,
    save_waypoints, waypoints_from_str, waypoints_to_string,
};

use thiserror::Error;

/// Failure reading or writing persisted data
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: &'static str },
}
