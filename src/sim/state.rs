//! Game state and core simulation types
//!
//! Everything the per-tick update reads or writes lives here. The frame loop
//! owns a single `GameState` and threads it through `tick`.

use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::behavior::{BehaviorTree, TreeError};
use super::body::Body;
use super::collision::{Circle, Rect};
use super::grid::Grid;
use super::scenario;
use super::timer::Timer;
use crate::audio::SoundEvent;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation advances every tick
    Running,
    /// Every enemy is down
    Won,
    /// Player is down
    Lost,
}

/// Something the excluded collaborators (audio, renderer) should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Play a sound cue
    Sound(SoundEvent),
    /// A projectile entered the world this tick
    ProjectileSpawned { owner: ProjectileOwner },
    /// The session ended
    PhaseChanged(GamePhase),
}

/// Who fired a projectile; decides which bodies it can damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

/// A projectile in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    pub owner: ProjectileOwner,
    pub damage: f32,
    /// Constant acceleration along `body.dir`, re-applied every tick
    pub thrust: f32,
}

impl Projectile {
    pub fn new(
        owner: ProjectileOwner,
        pos: Vec2,
        dir: Vec2,
        speed: f32,
        thrust: f32,
        radius: f32,
        damage: f32,
    ) -> Self {
        let mut body = Body {
            pos,
            radius,
            ..Default::default()
        };
        body.face(dir);
        body.vel = body.dir * speed;
        Self {
            body,
            owner,
            damage,
            thrust,
        }
    }
}

/// The player-controlled body
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub name: String,
    /// Movement speed (units/s)
    pub speed: f32,
    pub attack_timer: Timer,
    /// Touched an obstacle during the last collision pass
    pub colliding: bool,
}

/// A computer-controlled agent driven by a behavior tree
#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    /// Index of the patrol waypoint currently targeted
    pub point: usize,
    /// Top steering speed (units/s)
    pub speed: f32,
    pub detection_radius: f32,
    pub probe_length: f32,
    pub combat_radius: f32,
    pub name: String,
    pub attack_timer: Timer,
    /// Decision tree evaluated every tick; shared, never mutated
    pub brain: Rc<BehaviorTree>,
    /// Touched an obstacle during the last collision pass
    pub colliding: bool,
}

impl Enemy {
    pub fn distance_to(&self, player: &Player) -> f32 {
        self.body.pos.distance(player.body.pos)
    }
}

/// Static geometry plus the live projectile set
#[derive(Debug, Clone)]
pub struct World {
    pub obstacles: Vec<Circle>,
    /// Patrol route, visited cyclically
    pub waypoints: Vec<Vec2>,
    pub projectiles: Vec<Projectile>,
    /// Arena rectangle, origin at the top-left
    pub bounds: Rect,
    pub grid: Grid,
}

impl World {
    pub fn new(settings: &Settings, obstacles: Vec<Circle>, waypoints: Vec<Vec2>) -> Self {
        Self {
            obstacles,
            waypoints,
            projectiles: Vec::new(),
            bounds: Rect::new(0.0, 0.0, settings.arena_width, settings.arena_height),
            grid: Grid::new(
                settings.arena_width,
                settings.arena_height,
                settings.tile_width,
                settings.tile_height,
            ),
        }
    }

    /// Tiles near `seeker` (within `reach`) from which `target` is visible
    ///
    /// Candidates are the tiles overlapping the seeker's reach square; the
    /// visibility test is run from the target, limited to the same reach.
    pub fn vantage_tiles(&self, seeker: Vec2, reach: f32, target: Circle) -> Vec<usize> {
        let candidates = self.grid.overlap_tiles(&Rect::around(Circle::new(seeker, reach)));
        self.grid
            .visible_tiles(target, reach, &self.obstacles, &candidates)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub world: World,
    /// Requests emitted by the most recent tick
    pub events: Vec<GameEvent>,
    /// Seeded RNG (player shot spread)
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Set up the stock scenario: one player, a close-combat and a
    /// ranged-combat enemy
    pub fn new(
        settings: &Settings,
        obstacles: Vec<Circle>,
        waypoints: Vec<Vec2>,
    ) -> Result<Self, TreeError> {
        let world = World::new(settings, obstacles, waypoints);
        let enemies = vec![
            scenario::close_combat_enemy(&world.bounds)?,
            scenario::ranged_combat_enemy(&world.bounds)?,
        ];
        let player = scenario::player(&world.bounds, settings);

        log::info!(
            "Scenario ready: {} enemies, {} obstacles, {} waypoints, seed {}",
            enemies.len(),
            world.obstacles.len(),
            world.waypoints.len(),
            settings.seed
        );

        Ok(Self::with_entities(settings.seed, player, enemies, world))
    }

    /// Assemble a state from pre-built entities
    pub fn with_entities(seed: u64, player: Player, enemies: Vec<Enemy>, world: World) -> Self {
        Self {
            phase: GamePhase::Running,
            player,
            enemies,
            world,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
        }
    }

    /// Take the events emitted by the last tick
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn is_over(&self) -> bool {
        self.phase != GamePhase::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_new_faces_and_moves_along_dir() {
        let projectile = Projectile::new(
            ProjectileOwner::Player,
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 2.0),
            500.0,
            1000.0,
            20.0,
            5.0,
        );
        assert_eq!(projectile.body.dir, Vec2::Y);
        assert_eq!(projectile.body.vel, Vec2::new(0.0, 500.0));
        assert_eq!(projectile.body.radius, 20.0);
    }

    #[test]
    fn test_new_state_uses_stock_scenario() {
        let settings = Settings::default();
        let state = GameState::new(&settings, Vec::new(), Vec::new()).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.world.bounds.width, settings.arena_width);
        assert!(state.world.projectiles.is_empty());
        assert!(!state.is_over());
    }

    #[test]
    fn test_vantage_tiles_blocked_by_wall() {
        let settings = Settings::default();
        // Wall sits between the seeker's area and the target
        let wall = Circle::new(Vec2::new(600.0, 400.0), 150.0);
        let world = World::new(&settings, vec![wall], Vec::new());
        let target = Circle::new(Vec2::new(900.0, 400.0), 60.0);

        let tiles = world.vantage_tiles(Vec2::new(300.0, 400.0), 400.0, target);
        assert!(!tiles.is_empty());
        for index in &tiles {
            let center = world.grid.tile_center(*index);
            assert!(center.distance(target.position) <= 400.0);
            assert!(crate::sim::grid::has_line_of_sight(
                target.position,
                center,
                &world.obstacles
            ));
        }
        // The seeker's own tile is out of the target's reach
        let hidden = world.grid.tile_at(Vec2::new(320.0, 400.0)).unwrap();
        assert!(!tiles.contains(&hidden));
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, Vec::new(), Vec::new()).unwrap();
        state.events.push(GameEvent::Sound(SoundEvent::EnemyHit));
        assert_eq!(state.drain_events().count(), 1);
        assert!(state.events.is_empty());
    }
}
