//! Elapsed-time cooldown gate

use serde::{Deserialize, Serialize};

/// Cooldown timer: expired once `elapsed >= duration`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Timer {
    pub duration: f32,
    pub elapsed: f32,
}

impl Timer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
        }
    }

    /// A timer that is ready on its first check
    pub fn expired(duration: f32) -> Self {
        Self {
            duration,
            elapsed: duration,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Fraction of the cooldown completed, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }
}
