//! Simulation state: target, agent and the agent's mode machine

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::body::Body;
use super::controller::OrbitFrame;
use crate::config::Config;
use crate::wrap_angle_positive;

/// Agent steering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Steady circular pursuit
    Orbit,
    /// Commanded dive toward the target
    Inward,
    /// Automatic recovery back out to the orbit radius
    Outward,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Orbit => "ORBIT",
            Mode::Inward => "INWARD",
            Mode::Outward => "OUTWARD",
        }
    }
}

/// Which tangent counts as "forward" around the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitDirection {
    /// +1
    Ccw,
    /// -1
    Cw,
}

impl OrbitDirection {
    pub fn sign(self) -> f64 {
        match self {
            OrbitDirection::Ccw => 1.0,
            OrbitDirection::Cw => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            OrbitDirection::Ccw => OrbitDirection::Cw,
            OrbitDirection::Cw => OrbitDirection::Ccw,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrbitDirection::Ccw => "CCW",
            OrbitDirection::Cw => "CW",
        }
    }
}

/// Held direction keys for the target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    /// Unnormalized direction in screen space (y down)
    pub fn direction(&self) -> DVec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f64;
        DVec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// The movable point the agent orbits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub body: Body,
}

impl Target {
    pub fn new(pos: DVec2, config: &Config) -> Self {
        Self {
            body: Body::new(pos, config.target_mass, config.target_radius),
        }
    }

    /// Integrate held-key velocity, then clamp into the arena
    pub fn update(&mut self, held: HeldDirections, speed: f64, arena: &Arena, dt: f64) {
        self.body.vel = held.direction() * speed;
        self.body.pos = arena.clamp_point(self.body.pos + self.body.vel * dt);
    }
}

/// The pursuer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub body: Body,
    pub mode: Mode,
    pub orbit_direction: OrbitDirection,
    /// Seconds of stun left; force is attenuated while positive
    pub stun_timer: f64,
    /// Number of Orbit -> Inward transitions
    pub dive_count: u32,
    /// Commanded force of the last update after stun scaling, before drag
    #[serde(skip)]
    pub last_force: DVec2,
}

impl Agent {
    /// Place the agent on the orbit, moving along the CCW tangent at orbit speed
    pub fn on_orbit(target: &Body, config: &Config) -> Self {
        let pos = target.pos + DVec2::new(config.orbit_radius, 0.0);
        let body = Body::new(pos, config.agent_mass, config.dot_radius)
            .with_velocity(DVec2::new(0.0, config.tangential_speed));
        Self {
            body,
            mode: Mode::Orbit,
            orbit_direction: OrbitDirection::Ccw,
            stun_timer: 0.0,
            dive_count: 0,
            last_force: DVec2::ZERO,
        }
    }

    /// Start a dive. Returns false (and does nothing) unless orbiting.
    pub fn command_dive(&mut self) -> bool {
        match self.mode {
            Mode::Orbit => {
                self.mode = Mode::Inward;
                self.dive_count += 1;
                true
            }
            Mode::Inward | Mode::Outward => false,
        }
    }

    /// Negate the orbit direction; the next update may detect it right back
    pub fn flip_orbit_direction(&mut self) {
        self.orbit_direction = self.orbit_direction.flipped();
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_timer > 0.0
    }

    /// Apply the radius-driven mode rule; at most one transition per call
    pub fn advance_mode(&mut self, dist: f64, config: &Config) -> Option<(Mode, Mode)> {
        let next = match self.mode {
            Mode::Inward if dist <= config.capture_eps => Mode::Outward,
            Mode::Outward if dist >= config.orbit_radius - config.eps => Mode::Orbit,
            Mode::Orbit | Mode::Inward | Mode::Outward => return None,
        };
        let prev = std::mem::replace(&mut self.mode, next);
        Some((prev, next))
    }

    /// Follow whichever rotational sense the agent already moves faster along
    pub fn redetect_direction(&mut self, target: &Body) {
        let ccw = OrbitFrame::new(&self.body, target, OrbitDirection::Ccw);
        let vt_ccw = self.body.vel.dot(ccw.tangent);
        let vt_cw = self.body.vel.dot(-ccw.tangent);
        self.orbit_direction = if vt_ccw >= vt_cw {
            OrbitDirection::Ccw
        } else {
            OrbitDirection::Cw
        };
    }
}

/// Read-only per-frame view handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub target: Body,
    pub agent: Body,
    pub mode: Mode,
    pub orbit_direction: OrbitDirection,
    pub stun_timer: f64,
    pub dive_count: u32,
}

impl Snapshot {
    pub fn radial_distance(&self) -> f64 {
        self.agent.pos.distance(self.target.pos)
    }

    /// Angle of the agent around the target, in [0, 2π)
    pub fn orbit_angle(&self) -> f64 {
        let frame = OrbitFrame::new(&self.agent, &self.target, self.orbit_direction);
        wrap_angle_positive(frame.radial.y.atan2(frame.radial.x))
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    pub target: Target,
    pub agent: Agent,
    /// Simulated seconds
    pub time: f64,
    /// Completed steps
    pub frames: u64,
    arena: Arena,
    config: Config,
}

impl SimState {
    /// Target at the window centre, agent on the orbit to its right
    pub fn new(config: &Config) -> Self {
        let center = DVec2::new(config.width * 0.5, config.height * 0.5);
        let target = Target::new(center, config);
        let agent = Agent::on_orbit(&target.body, config);
        Self {
            target,
            agent,
            time: 0.0,
            frames: 0,
            arena: config.arena(),
            config: config.clone(),
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            target: self.target.body,
            agent: self.agent.body,
            mode: self.agent.mode,
            orbit_direction: self.agent.orbit_direction,
            stun_timer: self.agent.stun_timer,
            dive_count: self.agent.dive_count,
        }
    }
}
