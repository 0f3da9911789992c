//! Leaf behaviors: steering and attacks.
//!
//! Actions write the agent's acceleration, facing, waypoint index and attack
//! timer, and may push projectiles and events into the world. They never
//! read anything they did not get through the context.

use glam::Vec2;

use crate::audio::SoundEvent;
use crate::consts::{ARRIVE_SLOW_RADIUS, WAYPOINT_REACHED_DISTANCE};
use crate::sim::body::accelerate;
use crate::sim::state::{Enemy, GameEvent, Projectile, ProjectileOwner};
use crate::{rotate, safe_normalize};

use super::BehaviorContext;

/// Gap left between a shooter and a freshly spawned projectile
pub(crate) const SPAWN_MARGIN: f32 = 1.0;

/// Result of performing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action applied; traversal ends
    Done,
    /// The action does not apply right now; try the fallback
    Fallback,
}

/// Melee or ranged attack style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackKind {
    Melee,
    Ranged,
}

impl AttackKind {
    pub fn sound(&self) -> SoundEvent {
        match self {
            AttackKind::Melee => SoundEvent::EnemyAttackMelee,
            AttackKind::Ranged => SoundEvent::EnemyAttackRanged,
        }
    }
}

/// Tuning for an attack action. Cadence comes from the agent's attack timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackProfile {
    pub kind: AttackKind,
    /// Maximum center distance to the player at which the attack applies
    pub range: f32,
    /// Projectiles per volley
    pub pellets: u32,
    /// Total fan angle of a volley (degrees)
    pub spread_deg: f32,
    pub projectile_speed: f32,
    pub projectile_thrust: f32,
    pub projectile_radius: f32,
    /// Damage per projectile
    pub damage: f32,
}

impl AttackProfile {
    /// Unit directions of one volley, fanned evenly around `aim`
    pub fn volley_directions(&self, aim: Vec2) -> Vec<Vec2> {
        let count = self.pellets.max(1);
        if count == 1 {
            return vec![aim];
        }
        let spread = self.spread_deg.to_radians();
        let step = spread / (count - 1) as f32;
        (0..count)
            .map(|i| rotate(aim, -spread * 0.5 + step * i as f32))
            .collect()
    }
}

/// Leaf behaviors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Follow the waypoint loop
    Patrol,
    /// Move to the nearest spot that can see the player
    FindVisibility,
    /// Approach the player and come to rest at contact distance
    Arrive,
    /// Close in and fire short-range volleys
    CloseAttack(AttackProfile),
    /// Hold position and fire long-range shots
    RangedAttack(AttackProfile),
    /// Run directly away from the player
    Flee,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Patrol => "Patrol",
            Action::FindVisibility => "FindVisibility",
            Action::Arrive => "Arrive",
            Action::CloseAttack(_) => "CloseAttack",
            Action::RangedAttack(_) => "RangedAttack",
            Action::Flee => "Flee",
        }
    }

    pub fn perform(&self, ctx: &mut BehaviorContext<'_>) -> ActionOutcome {
        match self {
            Action::Patrol => patrol(ctx),
            Action::FindVisibility => find_visibility(ctx),
            Action::Arrive => {
                let target = ctx.player.body.pos;
                let stop = ctx.enemy.body.radius + ctx.player.body.radius;
                arrive(ctx.enemy, target, stop, ctx.dt);
                ActionOutcome::Done
            }
            Action::CloseAttack(profile) | Action::RangedAttack(profile) => attack(ctx, profile),
            Action::Flee => {
                let away = ctx.enemy.body.pos - ctx.player.body.pos;
                // Standing on the player: back off along the current facing
                let away = if away == Vec2::ZERO { -ctx.enemy.body.dir } else { away };
                let target = ctx.enemy.body.pos + away;
                seek(ctx.enemy, target, ctx.dt);
                ActionOutcome::Done
            }
        }
    }
}

/// Full-speed steering toward `target`
pub fn seek(enemy: &mut Enemy, target: Vec2, dt: f32) {
    let heading = safe_normalize(target - enemy.body.pos);
    let desired = heading * enemy.speed;
    enemy.body.acc = accelerate(enemy.body.vel, desired, dt);
    enemy.body.turn_towards(heading, dt);
}

/// Arrival steering: full speed far away, linear slow-down inside
/// `ARRIVE_SLOW_RADIUS`, rest at `stop_distance` from `target`
pub fn arrive(enemy: &mut Enemy, target: Vec2, stop_distance: f32, dt: f32) {
    let offset = target - enemy.body.pos;
    let remaining = offset.length() - stop_distance;
    let desired = if remaining > 0.0 {
        let speed = enemy.speed * (remaining / ARRIVE_SLOW_RADIUS).min(1.0);
        safe_normalize(offset) * speed
    } else {
        Vec2::ZERO
    };
    enemy.body.acc = accelerate(enemy.body.vel, desired, dt);
    enemy.body.turn_towards(offset, dt);
}

/// Steer to a stop
pub fn brake(enemy: &mut Enemy, dt: f32) {
    enemy.body.acc = accelerate(enemy.body.vel, Vec2::ZERO, dt);
}

fn patrol(ctx: &mut BehaviorContext<'_>) -> ActionOutcome {
    let waypoints = &ctx.world.waypoints;
    if waypoints.is_empty() {
        // No route: nothing to patrol toward
        brake(ctx.enemy, ctx.dt);
        return ActionOutcome::Done;
    }

    let enemy = &mut *ctx.enemy;
    let mut index = enemy.point % waypoints.len();
    if enemy.body.pos.distance(waypoints[index]) <= WAYPOINT_REACHED_DISTANCE {
        index = (index + 1) % waypoints.len();
        log::trace!("{}: heading to waypoint {}", enemy.name, index);
    }
    enemy.point = index;
    seek(enemy, waypoints[index], ctx.dt);
    ActionOutcome::Done
}

fn find_visibility(ctx: &mut BehaviorContext<'_>) -> ActionOutcome {
    let enemy = &*ctx.enemy;
    let tiles = ctx.world.vantage_tiles(
        enemy.body.pos,
        enemy.detection_radius,
        ctx.player.body.collider(),
    );

    let grid = &ctx.world.grid;
    let nearest = tiles
        .iter()
        .map(|&index| grid.tile_center(index))
        .min_by(|a, b| {
            a.distance_squared(enemy.body.pos)
                .partial_cmp(&b.distance_squared(enemy.body.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match nearest {
        Some(target) => {
            arrive(ctx.enemy, target, 0.0, ctx.dt);
            ActionOutcome::Done
        }
        None => ActionOutcome::Fallback,
    }
}

fn attack(ctx: &mut BehaviorContext<'_>, profile: &AttackProfile) -> ActionOutcome {
    let to_player = ctx.player.body.pos - ctx.enemy.body.pos;
    if to_player.length() > profile.range {
        return ActionOutcome::Fallback;
    }

    let enemy = &mut *ctx.enemy;
    match profile.kind {
        AttackKind::Melee => {
            let stop = enemy.body.radius + ctx.player.body.radius;
            arrive(enemy, ctx.player.body.pos, stop, ctx.dt);
        }
        AttackKind::Ranged => {
            brake(enemy, ctx.dt);
            enemy.body.turn_towards(to_player, ctx.dt);
        }
    }

    if !enemy.attack_timer.is_expired() {
        return ActionOutcome::Done;
    }
    enemy.attack_timer.reset();

    let mut aim = safe_normalize(to_player);
    if aim == Vec2::ZERO {
        aim = enemy.body.dir;
    }
    let offset = enemy.body.radius + profile.projectile_radius + SPAWN_MARGIN;
    for dir in profile.volley_directions(aim) {
        ctx.world.projectiles.push(Projectile::new(
            ProjectileOwner::Enemy,
            enemy.body.pos + dir * offset,
            dir,
            profile.projectile_speed,
            profile.projectile_thrust,
            profile.projectile_radius,
            profile.damage,
        ));
        ctx.events.push(GameEvent::ProjectileSpawned {
            owner: ProjectileOwner::Enemy,
        });
    }
    ctx.events.push(GameEvent::Sound(profile.kind.sound()));
    log::debug!("{} fired {} projectile(s)", enemy.name, profile.pellets.max(1));

    ActionOutcome::Done
}
