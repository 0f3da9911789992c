//! Kinematic body shared by the player, enemies and projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use crate::consts::DEFAULT_MAX_HEALTH;
use crate::safe_normalize;

/// Rigid-body-like kinematic state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Consumed (reset to zero) by every `integrate` call
    pub acc: Vec2,
    /// Facing, always unit length
    pub dir: Vec2,
    /// Radians per second
    pub angular_speed: f32,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            dir: Vec2::X,
            angular_speed: 0.0,
            radius: 0.0,
            health: DEFAULT_MAX_HEALTH,
            max_health: DEFAULT_MAX_HEALTH,
        }
    }
}

impl Body {
    pub fn collider(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    /// Health as a fraction of max health, in [0, 1]
    pub fn health_percent(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Apply damage, returning true if this hit took the body from alive to dead
    pub fn take_damage(&mut self, damage: f32) -> bool {
        let was_alive = self.is_alive();
        self.health -= damage;
        was_alive && !self.is_alive()
    }

    /// Set facing, ignoring zero vectors so `dir` stays unit length
    pub fn face(&mut self, dir: Vec2) {
        let dir = safe_normalize(dir);
        if dir != Vec2::ZERO {
            self.dir = dir;
        }
    }

    /// Turn toward `target` at this body's angular speed
    pub fn turn_towards(&mut self, target: Vec2, dt: f32) {
        self.dir = rotate_towards(self.dir, target, self.angular_speed * dt.max(0.0));
    }
}

/// Acceleration that changes `current` into `target` over `dt`
///
/// Zero when `dt <= 0`.
#[inline]
pub fn accelerate(current: Vec2, target: Vec2, dt: f32) -> Vec2 {
    if dt <= 0.0 {
        return Vec2::ZERO;
    }
    (target - current) / dt
}

/// Semi-implicit Euler step; consumes the body's acceleration
pub fn integrate(body: &mut Body, dt: f32) {
    if dt > 0.0 {
        body.vel += body.acc * dt;
        body.pos += body.vel * dt;
    }
    body.acc = Vec2::ZERO;
}

/// Rotate `current` toward `target` by at most `max_delta` radians
///
/// Takes the shorter way round. A zero `target` leaves `current` unchanged;
/// a zero `current` snaps to `target`. The result is unit length unless both
/// inputs are zero.
pub fn rotate_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let current = safe_normalize(current);
    let target = safe_normalize(target);
    if target == Vec2::ZERO {
        return current;
    }
    if current == Vec2::ZERO {
        return target;
    }

    let angle = current.angle_to(target);
    let step = angle.clamp(-max_delta.max(0.0), max_delta.max(0.0));
    if step == angle {
        target
    } else {
        Vec2::from_angle(step).rotate(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_accelerate_reaches_target_in_one_step() {
        let acc = accelerate(Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0), 0.5);
        assert_eq!(acc, Vec2::new(-20.0, 20.0));
    }

    #[test]
    fn test_accelerate_zero_dt_is_noop() {
        assert_eq!(accelerate(Vec2::ZERO, Vec2::new(5.0, 5.0), 0.0), Vec2::ZERO);
    }

    #[test]
    fn test_integrate_at_rest_is_noop() {
        let mut body = Body {
            pos: Vec2::new(123.0, 456.0),
            ..Default::default()
        };
        integrate(&mut body, 1.0 / 60.0);
        assert_eq!(body.pos, Vec2::new(123.0, 456.0));
        assert_eq!(body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_integrate_semi_implicit_and_consumes_acc() {
        let mut body = Body {
            acc: Vec2::new(10.0, 0.0),
            ..Default::default()
        };
        integrate(&mut body, 0.5);
        assert_eq!(body.vel, Vec2::new(5.0, 0.0));
        assert_eq!(body.pos, Vec2::new(2.5, 0.0));
        assert_eq!(body.acc, Vec2::ZERO);
    }

    #[test]
    fn test_integrate_zero_dt() {
        let mut body = Body {
            vel: Vec2::new(10.0, 0.0),
            acc: Vec2::new(10.0, 0.0),
            ..Default::default()
        };
        integrate(&mut body, 0.0);
        assert_eq!(body.pos, Vec2::ZERO);
        assert_eq!(body.vel, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_rotate_towards_clamps_step() {
        let dir = rotate_towards(Vec2::X, Vec2::Y, FRAC_PI_4);
        assert!((dir.angle_to(Vec2::X).abs() - FRAC_PI_4).abs() < 1e-5);
        assert!(dir.y > 0.0);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_towards_takes_short_way() {
        // Target is 90 degrees clockwise; the step must be negative
        let dir = rotate_towards(Vec2::X, -Vec2::Y, 0.1);
        assert!(dir.y < 0.0);
    }

    #[test]
    fn test_rotate_towards_snaps_when_close() {
        let dir = rotate_towards(Vec2::X, Vec2::Y, PI);
        assert!((dir - Vec2::Y).length() < 1e-6);
        let dir = rotate_towards(Vec2::X, Vec2::Y, FRAC_PI_2 + 0.01);
        assert!((dir - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn test_rotate_towards_zero_target_keeps_dir() {
        assert_eq!(rotate_towards(Vec2::Y, Vec2::ZERO, 1.0), Vec2::Y);
    }

    #[test]
    fn test_take_damage_reports_killing_blow_once() {
        let mut body = Body::default();
        assert!(!body.take_damage(60.0));
        assert!(body.take_damage(60.0));
        assert!(!body.take_damage(5.0));
        assert_eq!(body.health_percent(), 0.0);
    }
}
