//! Debug overlay snapshot
//!
//! Captures the geometry a debug view would draw (detection squares, vantage
//! tiles, avoidance probes, facing and aim lines) from a `GameState`. Pure
//! reads; nothing here feeds back into the simulation.

use glam::Vec2;

use super::avoidance::probe_segments;
use super::collision::{Circle, Rect, nearest_intersection};
use super::state::{Enemy, GameState, World};
use crate::consts::AIM_LINE_LENGTH;

/// Line segment from `.0` to `.1`
pub type Segment = (Vec2, Vec2);

/// Per-enemy debug geometry
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyOverlay {
    pub name: String,
    /// Bounding square of the detection radius
    pub detection_rect: Rect,
    /// Tiles inside `detection_rect` with a clear view of the player
    pub visible_tiles: Vec<usize>,
    /// Avoidance probes, in priority order
    pub probes: [Segment; 4],
    /// Facing, drawn out to the detection radius
    pub facing: Segment,
    pub health_percent: f32,
    pub colliding: bool,
}

impl EnemyOverlay {
    fn capture(enemy: &Enemy, world: &World, target: Circle) -> Self {
        let pos = enemy.body.pos;
        let reach = enemy.detection_radius;
        Self {
            name: enemy.name.clone(),
            detection_rect: Rect::around(Circle::new(pos, reach)),
            visible_tiles: world.vantage_tiles(pos, reach, target),
            probes: probe_segments(&enemy.body, enemy.probe_length),
            facing: (pos, pos + enemy.body.dir * reach),
            health_percent: enemy.body.health_percent(),
            colliding: enemy.colliding,
        }
    }
}

/// Everything a debug view draws for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct DebugOverlay {
    pub enemies: Vec<EnemyOverlay>,
    pub aim: Segment,
    /// Closest obstacle crossing on the aim line
    pub aim_hit: Option<Vec2>,
    /// Patrol route as closed-loop segments
    pub route: Vec<Segment>,
}

impl DebugOverlay {
    pub fn capture(state: &GameState) -> Self {
        let world = &state.world;
        let player = &state.player.body;
        let target = player.collider();

        let enemies = state
            .enemies
            .iter()
            .filter(|e| e.body.is_alive())
            .map(|e| EnemyOverlay::capture(e, world, target))
            .collect();

        let aim = (player.pos, player.pos + player.dir * AIM_LINE_LENGTH);
        let aim_hit = nearest_intersection(aim.0, aim.1, &world.obstacles);

        let points = &world.waypoints;
        let route = (0..points.len())
            .map(|i| (points[i], points[(i + 1) % points.len()]))
            .collect();

        Self {
            enemies,
            aim,
            aim_hit,
            route,
        }
    }
}
