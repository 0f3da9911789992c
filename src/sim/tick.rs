//! Fixed timestep simulation tick
//!
//! Advances the whole arena by one frame: player, enemy brains, projectiles,
//! collision resolution and the win/loss check, in that order.

use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use glam::Vec2;
use rand::Rng;

use super::avoidance::avoid;
use super::behavior::BehaviorContext;
use super::behavior::action::SPAWN_MARGIN;
use super::body::{Body, integrate};
use super::collision::{Circle, Rect, circle_vs_circle, circles_overlap, point_in_rect};
use super::state::{
    Enemy, GameEvent, GamePhase, GameState, Player, Projectile, ProjectileOwner,
};
use crate::audio::SoundEvent;
use crate::consts::*;
use crate::{rotate, safe_normalize};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_forward: bool,
    pub move_back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    /// Pointer position in arena space; the player turns toward it
    pub aim: Option<Vec2>,
    /// Fire request; a shot leaves whenever this is set and the cooldown
    /// has expired, however the caller derives it (held or edge)
    pub attack: bool,
}

/// What removed a projectile this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectileHit {
    Player,
    Enemy(usize),
    Obstacle,
    OutOfBounds,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    // Nothing moves once the session is decided
    if state.phase != GamePhase::Running {
        return;
    }
    state.time_ticks += 1;

    update_player(state, input, dt);
    update_enemies(state, dt);
    update_projectiles(state, dt);

    // Collision resolution: enemies first, then the player
    let obstacles = &state.world.obstacles;
    let bounds = state.world.bounds;
    for enemy in state.enemies.iter_mut().filter(|e| e.body.is_alive()) {
        enemy.colliding = resolve_collisions(&mut enemy.body, obstacles, &bounds);
    }
    state.player.colliding = resolve_collisions(&mut state.player.body, obstacles, &bounds);

    let phase = evaluate_phase(&state.player, &state.enemies);
    if phase != state.phase {
        log::info!("Phase {:?} -> {:?} at tick {}", state.phase, phase, state.time_ticks);
        state.phase = phase;
        state.events.push(GameEvent::PhaseChanged(phase));
    }
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let player = &mut state.player;

    if let Some(aim) = input.aim {
        player.body.turn_towards(aim - player.body.pos, dt);
    }
    player.attack_timer.tick(dt);

    // Movement is relative to facing
    let forward = player.body.dir;
    let right = rotate(forward, FRAC_PI_2);
    let mut intent = Vec2::ZERO;
    if input.move_forward {
        intent += forward;
    }
    if input.move_back {
        intent -= forward;
    }
    if input.strafe_right {
        intent += right;
    }
    if input.strafe_left {
        intent -= right;
    }
    player.body.vel = safe_normalize(intent) * player.speed;
    integrate(&mut player.body, dt);

    if input.attack && player.attack_timer.is_expired() {
        player.attack_timer.reset();

        let spread = PLAYER_SHOT_SPREAD_DEG.to_radians();
        let dir = rotate(player.body.dir, state.rng.random_range(-spread..=spread));
        let offset = player.body.radius + PLAYER_SHOT_RADIUS + SPAWN_MARGIN;
        state.world.projectiles.push(Projectile::new(
            ProjectileOwner::Player,
            player.body.pos + dir * offset,
            dir,
            PLAYER_SHOT_SPEED,
            PLAYER_SHOT_THRUST,
            PLAYER_SHOT_RADIUS,
            PLAYER_SHOT_DAMAGE,
        ));
        state.events.push(GameEvent::ProjectileSpawned {
            owner: ProjectileOwner::Player,
        });
        state.events.push(GameEvent::Sound(SoundEvent::PlayerAttack));
    }
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let GameState {
        player,
        enemies,
        world,
        events,
        ..
    } = state;

    for enemy in enemies.iter_mut().filter(|e| e.body.is_alive()) {
        enemy.attack_timer.tick(dt);

        let brain = Rc::clone(&enemy.brain);
        let mut ctx = BehaviorContext {
            enemy: &mut *enemy,
            player: &*player,
            world: &mut *world,
            events: &mut *events,
            dt,
        };
        let trace = brain.traverse(&mut ctx);
        log::trace!("{} took {} step(s)", enemy.name, trace.path.len());

        let steering = avoid(&enemy.body, enemy.probe_length, dt, &world.obstacles);
        enemy.body.acc += steering;
        integrate(&mut enemy.body, dt);
    }
}

fn update_projectiles(state: &mut GameState, dt: f32) {
    let GameState {
        player,
        enemies,
        world,
        events,
        ..
    } = state;
    let obstacles = &world.obstacles;
    let bounds = world.bounds;

    world.projectiles.retain_mut(|projectile| {
        projectile.body.acc = projectile.body.dir * projectile.thrust;
        integrate(&mut projectile.body, dt);

        let hit = classify_projectile(projectile, &*player, enemies.as_slice(), obstacles, &bounds);
        let Some(hit) = hit else {
            return true;
        };

        match hit {
            ProjectileHit::Player
                if projectile.owner == ProjectileOwner::Enemy && player.body.is_alive() =>
            {
                let killed = player.body.take_damage(projectile.damage);
                events.push(GameEvent::Sound(SoundEvent::PlayerHit));
                if killed {
                    events.push(GameEvent::Sound(SoundEvent::PlayerDeath));
                }
            }
            ProjectileHit::Enemy(index) if projectile.owner == ProjectileOwner::Player => {
                let enemy = &mut enemies[index];
                if enemy.body.take_damage(projectile.damage) {
                    log::info!("{} destroyed", enemy.name);
                }
                events.push(GameEvent::Sound(SoundEvent::EnemyHit));
            }
            _ => {}
        }
        false
    });
}

/// First reason a projectile should be removed, if any
///
/// Checked in order: player, live enemies, obstacles, arena bounds. Bodies
/// absorb projectiles from either side; damage is the caller's concern.
fn classify_projectile(
    projectile: &Projectile,
    player: &Player,
    enemies: &[Enemy],
    obstacles: &[Circle],
    bounds: &Rect,
) -> Option<ProjectileHit> {
    let collider = projectile.body.collider();

    if circles_overlap(collider, player.body.collider()) {
        return Some(ProjectileHit::Player);
    }

    let struck = enemies
        .iter()
        .position(|e| e.body.is_alive() && circles_overlap(collider, e.body.collider()));
    if let Some(index) = struck {
        return Some(ProjectileHit::Enemy(index));
    }

    if obstacles
        .iter()
        .any(|&obstacle| circles_overlap(collider, obstacle))
    {
        return Some(ProjectileHit::Obstacle);
    }

    if !point_in_rect(projectile.body.pos, bounds) {
        return Some(ProjectileHit::OutOfBounds);
    }

    None
}

/// Push `body` out of the first obstacle it overlaps, then clamp it into
/// `bounds`. Returns true if an obstacle was touched.
pub fn resolve_collisions(body: &mut Body, obstacles: &[Circle], bounds: &Rect) -> bool {
    let collider = body.collider();
    let push = obstacles
        .iter()
        .find_map(|&obstacle| circle_vs_circle(collider, obstacle));
    if let Some(mtv) = push {
        body.pos += mtv;
    }
    body.pos = bounds.clamp(body.pos);
    push.is_some()
}

/// Loss takes precedence: a player dying on the same tick as the last enemy
/// still loses
pub fn evaluate_phase(player: &Player, enemies: &[Enemy]) -> GamePhase {
    if !player.body.is_alive() {
        GamePhase::Lost
    } else if !enemies.is_empty() && enemies.iter().all(|e| !e.body.is_alive()) {
        GamePhase::Won
    } else {
        GamePhase::Running
    }
}
