//! Vortex - a pursuer that orbits a movable target
//!
//! Core modules:
//! - `sim`: Physics core (bodies, collisions, steering law, agent state machine)
//! - `config`: Startup configuration
//! - `platform`: Input/render/clock collaborator seams and the session loop

pub mod config;
pub mod platform;
pub mod sim;

pub use config::{Config, ConfigError};

use glam::DVec2;

/// Numeric policy constants shared by the physics core
pub mod consts {
    /// Below this magnitude a vector is treated as degenerate
    pub const NORMALIZE_EPSILON: f64 = 1e-9;
    /// Feedforward is skipped when the agent sits closer than this to the target
    pub const FEEDFORWARD_MIN_DIST: f64 = 1e-3;
    /// Fallback direction for degenerate normalization
    pub const FALLBACK_DIR: glam::DVec2 = glam::DVec2::X;
}

/// Normalize a vector, returning `(unit, magnitude)`.
///
/// Degenerate input (magnitude below [`consts::NORMALIZE_EPSILON`]) yields
/// `((1, 0), 0)` so callers always get a well-formed unit vector.
#[inline]
pub fn normalize_or_fallback(v: DVec2) -> (DVec2, f64) {
    let mag = v.length();
    if mag < consts::NORMALIZE_EPSILON {
        (consts::FALLBACK_DIR, 0.0)
    } else {
        (v / mag, mag)
    }
}

/// Inner product
#[inline]
pub fn dot(a: DVec2, b: DVec2) -> f64 {
    a.dot(b)
}

/// Scale `force` down to `max` magnitude, keeping its direction.
///
/// Zero vectors and vectors already within the limit pass through untouched.
#[inline]
pub fn clamp_magnitude(force: DVec2, max: f64) -> DVec2 {
    let mag = force.length();
    if mag == 0.0 || mag <= max {
        return force;
    }
    force * (max / mag)
}

/// Wrap an angle to [0, 2π)
#[inline]
pub fn wrap_angle_positive(angle: f64) -> f64 {
    angle.rem_euclid(std::f64::consts::TAU)
}
