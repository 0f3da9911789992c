//! Stock scenario: the player, a close-combat enemy and a ranged enemy
//!
//! Enemies start in the top corners, the player near the bottom right. Both
//! enemies share the same tree shape (detect, see, engage) but differ in how
//! they engage.

use std::rc::Rc;

use glam::Vec2;

use super::behavior::{
    Action, AttackKind, AttackProfile, BehaviorTree, Condition, TreeBuilder, TreeError,
};
use super::body::Body;
use super::collision::{Circle, Rect};
use super::state::{Enemy, Player};
use super::timer::Timer;
use crate::consts::*;
use crate::settings::Settings;

/// Shotgun volley fired by the close-combat enemy
pub const CLOSE_ATTACK: AttackProfile = AttackProfile {
    kind: AttackKind::Melee,
    range: 200.0,
    pellets: 5,
    spread_deg: 30.0,
    projectile_speed: 700.0,
    projectile_thrust: 0.0,
    projectile_radius: 10.0,
    damage: 3.0,
};
pub const CLOSE_ATTACK_COOLDOWN: f32 = 1.0;

/// Sniper shot fired by the ranged enemy
///
/// Reach sits between the ranged enemy's combat and detection radii, so a
/// detected player beyond it sends the enemy back to patrolling.
pub const RANGED_ATTACK: AttackProfile = AttackProfile {
    kind: AttackKind::Ranged,
    range: 500.0,
    pellets: 1,
    spread_deg: 0.0,
    projectile_speed: 900.0,
    projectile_thrust: 500.0,
    projectile_radius: 12.0,
    damage: 15.0,
};
pub const RANGED_ATTACK_COOLDOWN: f32 = 2.0;

/// Detected? -> Visible? -> in melee range? -> attack / arrive
///
/// Hidden player: look for a vantage point, else patrol. Attack out of reach
/// falls back to arriving.
pub fn close_combat_tree() -> Result<BehaviorTree, TreeError> {
    let mut b = TreeBuilder::new();
    let detected = b.condition(Condition::Detected);
    let visible = b.condition(Condition::Visible);
    let combat = b.condition(Condition::CloseCombat);

    let patrol = b.action(Action::Patrol);
    let find_visibility = b.action_with_fallback(Action::FindVisibility, patrol);
    let arrive = b.action(Action::Arrive);
    let attack = b.action_with_fallback(Action::CloseAttack(CLOSE_ATTACK), arrive);

    b.branch(detected, visible, patrol)
        .branch(visible, combat, find_visibility)
        .branch(combat, attack, arrive);
    b.build(detected)
}

/// Detected? -> Visible? -> far enough to shoot? -> attack / flee
pub fn ranged_combat_tree() -> Result<BehaviorTree, TreeError> {
    let mut b = TreeBuilder::new();
    let detected = b.condition(Condition::Detected);
    let visible = b.condition(Condition::Visible);
    let combat = b.condition(Condition::RangedCombat);

    let patrol = b.action(Action::Patrol);
    let find_visibility = b.action_with_fallback(Action::FindVisibility, patrol);
    let flee = b.action(Action::Flee);
    let attack = b.action_with_fallback(Action::RangedAttack(RANGED_ATTACK), patrol);

    b.branch(detected, visible, patrol)
        .branch(visible, combat, find_visibility)
        .branch(combat, attack, flee);
    b.build(detected)
}

pub fn close_combat_enemy(bounds: &Rect) -> Result<Enemy, TreeError> {
    Ok(Enemy {
        body: Body {
            pos: Vec2::new(bounds.width * 0.9, bounds.height * 0.1),
            dir: Vec2::NEG_X,
            angular_speed: 200f32.to_radians(),
            radius: 50.0,
            ..Default::default()
        },
        point: 5,
        speed: 500.0,
        detection_radius: 400.0,
        probe_length: 100.0,
        combat_radius: 300.0,
        name: "Close-combat enemy".to_string(),
        attack_timer: Timer::expired(CLOSE_ATTACK_COOLDOWN),
        brain: Rc::new(close_combat_tree()?),
        colliding: false,
    })
}

pub fn ranged_combat_enemy(bounds: &Rect) -> Result<Enemy, TreeError> {
    Ok(Enemy {
        body: Body {
            pos: Vec2::new(bounds.width * 0.1, bounds.height * 0.1),
            dir: Vec2::X,
            angular_speed: 100f32.to_radians(),
            radius: 50.0,
            ..Default::default()
        },
        point: 0,
        speed: 250.0,
        detection_radius: 600.0,
        probe_length: 100.0,
        combat_radius: 400.0,
        name: "Ranged-combat enemy".to_string(),
        attack_timer: Timer::expired(RANGED_ATTACK_COOLDOWN),
        brain: Rc::new(ranged_combat_tree()?),
        colliding: false,
    })
}

pub fn player(bounds: &Rect, settings: &Settings) -> Player {
    Player {
        body: Body {
            pos: Vec2::new(bounds.width * 0.8, bounds.height * 0.8),
            dir: Vec2::X,
            angular_speed: settings.player_turn_rate.to_radians(),
            radius: PLAYER_RADIUS,
            ..Default::default()
        },
        name: "Player".to_string(),
        speed: settings.player_speed,
        attack_timer: Timer::expired(settings.player_attack_cooldown),
        colliding: false,
    }
}

/// Obstacle layout used when no geometry file is supplied
pub fn default_obstacles(bounds: &Rect) -> Vec<Circle> {
    let (w, h) = (bounds.width, bounds.height);
    vec![
        Circle::new(Vec2::new(w * 0.30, h * 0.35), 70.0),
        Circle::new(Vec2::new(w * 0.55, h * 0.25), 50.0),
        Circle::new(Vec2::new(w * 0.70, h * 0.55), 90.0),
        Circle::new(Vec2::new(w * 0.40, h * 0.70), 60.0),
        Circle::new(Vec2::new(w * 0.15, h * 0.60), 40.0),
    ]
}

/// Patrol loop used when no geometry file is supplied
pub fn default_waypoints(bounds: &Rect) -> Vec<Vec2> {
    let (w, h) = (bounds.width, bounds.height);
    vec![
        Vec2::new(w * 0.10, h * 0.10),
        Vec2::new(w * 0.45, h * 0.10),
        Vec2::new(w * 0.90, h * 0.10),
        Vec2::new(w * 0.90, h * 0.45),
        Vec2::new(w * 0.90, h * 0.90),
        Vec2::new(w * 0.50, h * 0.90),
        Vec2::new(w * 0.10, h * 0.90),
        Vec2::new(w * 0.10, h * 0.45),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::behavior::Node;

    fn arena() -> Rect {
        Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    #[test]
    fn test_stock_trees_build() {
        let close = close_combat_tree().unwrap();
        let ranged = ranged_combat_tree().unwrap();
        assert_eq!(close.len(), 7);
        assert_eq!(ranged.len(), 7);
        assert!(matches!(
            close.node(close.root()),
            Some(Node::Condition {
                condition: Condition::Detected,
                ..
            })
        ));
    }

    #[test]
    fn test_enemy_placement() {
        let bounds = arena();
        let close = close_combat_enemy(&bounds).unwrap();
        let ranged = ranged_combat_enemy(&bounds).unwrap();
        assert_eq!(close.body.pos, Vec2::new(1080.0, 80.0));
        assert_eq!(ranged.body.pos, Vec2::new(120.0, 80.0));
        assert!(close.attack_timer.is_expired());
        assert!(ranged.detection_radius > ranged.combat_radius);
        // Shooting band is non-empty and ends short of detection
        assert!(RANGED_ATTACK.range > ranged.combat_radius);
        assert!(RANGED_ATTACK.range < ranged.detection_radius);
    }

    #[test]
    fn test_default_geometry_inside_arena() {
        let bounds = arena();
        for obstacle in default_obstacles(&bounds) {
            assert!(crate::sim::collision::point_in_rect(obstacle.position, &bounds));
        }
        assert_eq!(default_waypoints(&bounds).len(), 8);
    }

    #[test]
    fn test_player_uses_settings() {
        let settings = Settings {
            player_speed: 321.0,
            ..Default::default()
        };
        let player = player(&arena(), &settings);
        assert_eq!(player.speed, 321.0);
        assert_eq!(player.body.radius, PLAYER_RADIUS);
        assert_eq!(player.body.pos, Vec2::new(960.0, 640.0));
    }
}
