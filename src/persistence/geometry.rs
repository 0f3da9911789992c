//! Obstacle and waypoint lists
//!
//! Obstacles are stored as `[[x, y, radius], ...]`, waypoints as
//! `[[x, y], ...]`.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::PersistenceError;
use crate::sim::collision::Circle;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ObstacleRecord(f32, f32, f32);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct WaypointRecord(f32, f32);

impl ObstacleRecord {
    fn into_circle(self, index: usize) -> Result<Circle, PersistenceError> {
        let ObstacleRecord(x, y, radius) = self;
        if !(x.is_finite() && y.is_finite() && radius.is_finite()) {
            return Err(PersistenceError::InvalidRecord {
                index,
                reason: "non-finite value",
            });
        }
        if radius < 0.0 {
            return Err(PersistenceError::InvalidRecord {
                index,
                reason: "negative radius",
            });
        }
        Ok(Circle::new(Vec2::new(x, y), radius))
    }
}

impl WaypointRecord {
    fn into_point(self, index: usize) -> Result<Vec2, PersistenceError> {
        let point = Vec2::new(self.0, self.1);
        if !point.is_finite() {
            return Err(PersistenceError::InvalidRecord {
                index,
                reason: "non-finite value",
            });
        }
        Ok(point)
    }
}

pub fn obstacles_from_str(json: &str) -> Result<Vec<Circle>, PersistenceError> {
    let records: Vec<ObstacleRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_circle(index))
        .collect()
}

pub fn obstacles_to_string(obstacles: &[Circle]) -> Result<String, PersistenceError> {
    let records: Vec<ObstacleRecord> = obstacles
        .iter()
        .map(|c| ObstacleRecord(c.position.x, c.position.y, c.radius))
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

pub fn waypoints_from_str(json: &str) -> Result<Vec<Vec2>, PersistenceError> {
    let records: Vec<WaypointRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_point(index))
        .collect()
}

pub fn waypoints_to_string(waypoints: &[Vec2]) -> Result<String, PersistenceError> {
    let records: Vec<WaypointRecord> = waypoints
        .iter()
        .map(|p| WaypointRecord(p.x, p.y))
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

pub fn load_obstacles(path: impl AsRef<Path>) -> Result<Vec<Circle>, PersistenceError> {
    let obstacles = obstacles_from_str(&fs::read_to_string(path.as_ref())?)?;
    log::info!(
        "Loaded {} obstacles from {}",
        obstacles.len(),
        path.as_ref().display()
    );
    Ok(obstacles)
}

pub fn save_obstacles(path: impl AsRef<Path>, obstacles: &[Circle]) -> Result<(), PersistenceError> {
    fs::write(path.as_ref(), obstacles_to_string(obstacles)?)?;
    log::info!(
        "Saved {} obstacles to {}",
        obstacles.len(),
        path.as_ref().display()
    );
    Ok(())
}

pub fn load_waypoints(path: impl AsRef<Path>) -> Result<Vec<Vec2>, PersistenceError> {
    let waypoints = waypoints_from_str(&fs::read_to_string(path.as_ref())?)?;
    log::info!(
        "Loaded {} waypoints from {}",
        waypoints.len(),
        path.as_ref().display()
    );
    Ok(waypoints)
}

pub fn save_waypoints(path: impl AsRef<Path>, waypoints: &[Vec2]) -> Result<(), PersistenceError> {
    fs::write(path.as_ref(), waypoints_to_string(waypoints)?)?;
    log::info!(
        "Saved {} waypoints to {}",
        waypoints.len(),
        path.as_ref().display()
    );
    Ok(())
}
