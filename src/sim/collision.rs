//! Collision primitives for circular bodies
//!
//! Everything in the arena is a circle (bodies, projectiles, obstacles), so
//! the kernel only needs circle-circle, segment-circle and point-in-rect
//! tests. All functions are total: degenerate input yields a defined result.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A circle in arena space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    pub position: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius: radius.max(0.0),
        }
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance_squared(self.position) <= self.radius * self.radius
    }
}

/// Axis-aligned rectangle with a top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding square of a circle
    pub fn around(circle: Circle) -> Self {
        Self {
            x: circle.position.x - circle.radius,
            y: circle.position.y - circle.radius,
            width: circle.radius * 2.0,
            height: circle.radius * 2.0,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Overlap test, touching edges count
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }

    /// Clamp a point into the rectangle
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min(), self.max())
    }
}

/// Direction used to separate circles whose centers coincide
pub const CONCENTRIC_SEPARATION_AXIS: Vec2 = Vec2::X;

/// Cheap overlap predicate (strict: tangent circles do not overlap)
#[inline]
pub fn circles_overlap(a: Circle, b: Circle) -> bool {
    let sum = a.radius + b.radius;
    a.position.distance_squared(b.position) < sum * sum
}

/// Check overlap between two circles
///
/// Returns the minimum translation vector that moves `a` out of `b`, or
/// `None` if they do not overlap. Its length is the penetration depth and it
/// points from `b`'s center toward `a`'s center.
pub fn circle_vs_circle(a: Circle, b: Circle) -> Option<Vec2> {
    if !circles_overlap(a, b) {
        return None;
    }

    let delta = a.position - b.position;
    let distance = delta.length();
    let normal = if distance > f32::EPSILON {
        delta / distance
    } else {
        CONCENTRIC_SEPARATION_AXIS
    };

    Some(normal * (a.radius + b.radius - distance))
}

/// Intersect segment `p0 -> p1` with a circle
///
/// Returns the intersection nearest `p0`. A segment that starts inside (or
/// on) the circle hits at `p0`.
pub fn line_vs_circle(p0: Vec2, p1: Vec2, circle: Circle) -> Option<Vec2> {
    if circle.contains(p0) {
        return Some(p0);
    }

    let length = p0.distance(p1);
    if length <= f32::EPSILON {
        // Zero-length segment outside the circle
        return None;
    }
    let dir = (p1 - p0) / length;

    // Closest approach of the supporting line to the center
    let along = (circle.position - p0).dot(dir);
    let closest = p0 + dir * along;
    let offset_sq = closest.distance_squared(circle.position);
    let radius_sq = circle.radius * circle.radius;
    if offset_sq > radius_sq {
        return None;
    }

    // p0 is outside, so the entry point is the nearer root
    let t = along - (radius_sq - offset_sq).sqrt();
    if (0.0..=length).contains(&t) {
        Some(p0 + dir * t)
    } else {
        None
    }
}

/// Nearest intersection of segment `p0 -> p1` with any obstacle
pub fn nearest_intersection(p0: Vec2, p1: Vec2, obstacles: &[Circle]) -> Option<Vec2> {
    obstacles
        .iter()
        .filter_map(|&obstacle| line_vs_circle(p0, p1, obstacle))
        .min_by(|a, b| {
            a.distance_squared(p0)
                .partial_cmp(&b.distance_squared(p0))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Inclusive point-in-rectangle test
#[inline]
pub fn point_in_rect(point: Vec2, rect: &Rect) -> bool {
    point.x >= rect.x
        && point.x <= rect.x + rect.width
        && point.y >= rect.y
        && point.y <= rect.y + rect.height
}
