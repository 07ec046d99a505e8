//! Orbit/dive steering law
//!
//! A PD controller in the target-centred polar frame. Radially it tracks a
//! desired distance (the orbit radius, or zero while diving); tangentially it
//! only damps toward a desired speed, since the orbit angle itself is free.
//! An optional feedforward term supplies the centripetal pull a circular path
//! needs, leaving the PD terms to correct residual error.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::state::{Mode, OrbitDirection};
use crate::consts::FEEDFORWARD_MIN_DIST;
use crate::{clamp_magnitude, dot, normalize_or_fallback};

/// Setpoints and gains for [`orbit_dive_force`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringParams {
    /// Orbit radius `R`
    pub orbit_radius: f64,
    /// Desired tangential speed while orbiting
    pub tangential_speed: f64,
    /// Radial proportional gain
    pub k_pr: f64,
    /// Radial damping gain
    pub k_dr: f64,
    /// Tangential damping gain
    pub k_pt: f64,
    pub feedforward: bool,
    /// Output force clamp
    pub fmax: f64,
}

/// Polar frame of the agent relative to the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitFrame {
    /// Unit vector target -> agent
    pub radial: DVec2,
    /// Unit tangent, "forward" for the chosen orbit direction
    pub tangent: DVec2,
    /// Centre distance
    pub dist: f64,
}

impl OrbitFrame {
    pub fn new(agent: &Body, target: &Body, direction: OrbitDirection) -> Self {
        let (radial, dist) = normalize_or_fallback(agent.pos - target.pos);
        let tangent = radial.perp() * direction.sign();
        Self {
            radial,
            tangent,
            dist,
        }
    }

    /// Split a velocity into `(radial, tangential)` components
    pub fn decompose(&self, vel: DVec2) -> (f64, f64) {
        (dot(vel, self.radial), dot(vel, self.tangent))
    }
}

/// Steering force for the agent.
///
/// Pure function of its inputs; the result never exceeds `params.fmax`.
pub fn orbit_dive_force(
    agent: &Body,
    target: &Body,
    mode: Mode,
    direction: OrbitDirection,
    params: &SteeringParams,
) -> DVec2 {
    let frame = OrbitFrame::new(agent, target, direction);
    let (v_r, v_t) = frame.decompose(agent.vel);

    let (r_des, v_t_set) = match mode {
        Mode::Inward => (0.0, 0.0),
        Mode::Orbit | Mode::Outward => (params.orbit_radius, params.tangential_speed),
    };

    let f_r = -params.k_pr * (frame.dist - r_des) - params.k_dr * v_r;
    let f_t = -params.k_pt * (v_t - v_t_set);

    let f_ff = match mode {
        Mode::Orbit | Mode::Outward if params.feedforward && frame.dist > FEEDFORWARD_MIN_DIST => {
            -(v_t_set * v_t_set) / frame.dist
        }
        _ => 0.0,
    };

    let force = frame.radial * (f_r + f_ff) + frame.tangent * f_t;
    clamp_magnitude(force, params.fmax)
}
