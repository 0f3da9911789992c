//! Reactive obstacle avoidance
//!
//! Four short probes fan out from the velocity direction. The first probe
//! (in `PROBE_ANGLES_DEG` order) that touches an obstacle turns the velocity
//! away from that side by one tick's worth of angular speed.

use glam::Vec2;

use super::body::{Body, accelerate};
use super::collision::{Circle, line_vs_circle};
use crate::consts::PROBE_ANGLES_DEG;
use crate::{rotate, safe_normalize};

/// Probe segment end points for a body, in priority order
pub fn probe_segments(body: &Body, probe_length: f32) -> [(Vec2, Vec2); 4] {
    let heading = safe_normalize(body.vel);
    PROBE_ANGLES_DEG.map(|angle| {
        let end = body.pos + rotate(heading, angle.to_radians()) * probe_length;
        (body.pos, end)
    })
}

fn probe_blocked(start: Vec2, end: Vec2, obstacles: &[Circle]) -> bool {
    obstacles
        .iter()
        .any(|&obstacle| line_vs_circle(start, end, obstacle).is_some())
}

/// Acceleration that steers `body` away from the side `angle_deg` probed
pub fn avoidance_for_probe(body: &Body, angle_deg: f32, dt: f32) -> Vec2 {
    let turn = body.angular_speed * dt * -angle_deg.signum();
    let target = rotate(safe_normalize(body.vel), turn) * body.vel.length();
    accelerate(body.vel, target, dt)
}

/// Avoidance acceleration for this tick, or zero if every probe is clear
pub fn avoid(body: &Body, probe_length: f32, dt: f32, obstacles: &[Circle]) -> Vec2 {
    if dt <= 0.0 || body.vel == Vec2::ZERO || !body.vel.is_finite() {
        return Vec2::ZERO;
    }

    probe_segments(body, probe_length)
        .iter()
        .zip(PROBE_ANGLES_DEG)
        .find(|((start, end), _)| probe_blocked(*start, *end, obstacles))
        .map(|(_, angle)| avoidance_for_probe(body, angle, dt))
        .unwrap_or(Vec2::ZERO)
}
