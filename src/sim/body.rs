//! Point-mass disk body

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A rigid disk with no orientation.
///
/// `mass > 0` and `radius >= 0` are configuration-time invariants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: DVec2,
    pub vel: DVec2,
    pub mass: f64,
    pub radius: f64,
}

impl Body {
    pub fn new(pos: DVec2, mass: f64, radius: f64) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            mass,
            radius,
        }
    }

    pub fn with_velocity(mut self, vel: DVec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn inv_mass(&self) -> f64 {
        1.0 / self.mass
    }

    /// Change velocity by `impulse / mass`
    #[inline]
    pub fn apply_impulse(&mut self, impulse: DVec2) {
        self.vel += impulse * self.inv_mass();
    }

    /// Semi-implicit Euler: velocity first, then position with the new velocity
    #[inline]
    pub fn integrate(&mut self, force: DVec2, dt: f64) {
        self.vel += force * self.inv_mass() * dt;
        self.pos += self.vel * dt;
    }

    pub fn momentum(&self) -> DVec2 {
        self.vel * self.mass
    }
}
