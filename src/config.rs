//! Startup configuration
//!
//! One immutable value, built once and handed by reference to every
//! component. The default gains are critically damped (`k_dr = 2 * sqrt(k_pr)`)
//! and equal radially and tangentially, so a dive pulls straight in.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{Arena, CollisionParams, SteeringParams};

/// Environment variable naming an optional JSON config file
pub const CONFIG_ENV_VAR: &str = "VORTEX_CONFIG";

/// Configuration failures (startup only; the simulation itself never fails)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config JSON")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("safety margin {margin} leaves no room inside a {width}x{height} window")]
    ArenaCollapsed { width: f64, height: f64, margin: f64 },
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Window / arena ===
    /// Window width in pixels
    pub width: f64,
    /// Window height in pixels
    pub height: f64,
    /// Frame rate target
    pub fps: u32,
    /// Fixed simulation rate; each frame is split into steps of `1 / sim_hz`
    pub sim_hz: u32,
    /// Maximum simulation steps per frame to prevent spiral of death
    pub max_substeps: u32,
    /// Longest frame time fed to the accumulator
    pub max_frame_dt: f64,
    /// Inset from the window edges to the arena walls
    pub safety_margin: f64,
    /// Debug overlay visible at startup
    pub debug_hud: bool,

    // === Orbit ===
    /// Desired orbit radius around the target
    pub orbit_radius: f64,
    /// Desired tangential speed while orbiting
    pub tangential_speed: f64,
    /// Orbit convergence tolerance (Outward -> Orbit at `R - eps`)
    pub eps: f64,
    /// Centre distance at which a dive counts as having reached the target
    pub capture_eps: f64,

    // === Bodies ===
    /// Agent radius
    pub dot_radius: f64,
    /// Target radius
    pub target_radius: f64,
    pub agent_mass: f64,
    /// Effectively immovable
    pub target_mass: f64,
    /// Target speed while a direction key is held
    pub target_speed: f64,

    // === Controller ===
    /// Radial proportional gain
    pub k_pr: f64,
    /// Radial damping gain
    pub k_dr: f64,
    /// Tangential damping gain
    pub k_pt: f64,
    /// Add the centripetal feedforward term
    pub feedforward: bool,
    /// Steering force clamp
    pub fmax: f64,
    /// Linear drag coefficient
    pub drag: f64,

    // === Contacts ===
    pub restitution: f64,
    pub friction: f64,
    /// Baumgarte positional correction factor
    pub beta: f64,
    /// Penetration tolerated without correction
    pub slop: f64,

    // === Stun ===
    /// Seconds of reduced authority after an impact
    pub stun_time: f64,
    /// Force multiplier while stunned
    pub stun_force_scale: f64,

    /// Floor applied to every frame time
    pub min_dt: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 650.0,
            fps: 60,
            sim_hz: 240,
            max_substeps: 8,
            max_frame_dt: 0.1,
            safety_margin: 12.0,
            debug_hud: true,

            orbit_radius: 120.0,
            tangential_speed: 350.0,
            eps: 1.0,
            capture_eps: 16.0,

            dot_radius: 6.0,
            target_radius: 8.0,
            agent_mass: 1.0,
            target_mass: 9999.0,
            target_speed: 220.0,

            k_pr: 100.0,
            k_dr: 20.0,
            k_pt: 20.0,
            feedforward: true,
            fmax: 1200.0,
            drag: 0.0,

            restitution: 0.25,
            friction: 0.6,
            beta: 0.2,
            slop: 0.01,

            stun_time: 0.3,
            stun_force_scale: 0.5,

            min_dt: 1e-3,
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON config; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load the startup configuration.
    ///
    /// Uses the file named by `VORTEX_CONFIG` when set, defaults otherwise.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                let config = Self::from_file(&path)?;
                log::info!("Loaded config from {}", Path::new(&path).display());
                config
            }
            None => {
                log::info!("Using default config");
                let config = Self::default();
                config.validate()?;
                config
            }
        };
        if config.capture_eps <= config.contact_distance() {
            log::warn!(
                "capture_eps {} is inside the contact distance {}; dives will stall on the target",
                config.capture_eps,
                config.contact_distance()
            );
        }
        Ok(config)
    }

    /// Check the invariants the physics core assumes without re-checking
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("agent_mass", self.agent_mass)?;
        positive("target_mass", self.target_mass)?;
        positive("fps", self.fps as f64)?;
        positive("sim_hz", self.sim_hz as f64)?;
        positive("max_substeps", self.max_substeps as f64)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        positive("fmax", self.fmax)?;
        positive("min_dt", self.min_dt)?;
        positive("orbit_radius", self.orbit_radius)?;
        in_range("dot_radius", self.dot_radius, 0.0, f64::MAX)?;
        in_range("target_radius", self.target_radius, 0.0, f64::MAX)?;
        in_range("safety_margin", self.safety_margin, 0.0, f64::MAX)?;
        in_range("restitution", self.restitution, 0.0, 1.0)?;
        in_range("friction", self.friction, 0.0, f64::MAX)?;
        in_range("beta", self.beta, f64::MIN_POSITIVE, 1.0)?;
        in_range("slop", self.slop, 0.0, f64::MAX)?;
        in_range("drag", self.drag, 0.0, f64::MAX)?;
        in_range("stun_time", self.stun_time, 0.0, f64::MAX)?;
        in_range("stun_force_scale", self.stun_force_scale, 0.0, 1.0)?;
        in_range("eps", self.eps, 0.0, self.orbit_radius)?;
        in_range("capture_eps", self.capture_eps, 0.0, self.orbit_radius)?;

        if self.width <= 2.0 * self.safety_margin || self.height <= 2.0 * self.safety_margin {
            return Err(ConfigError::ArenaCollapsed {
                width: self.width,
                height: self.height,
                margin: self.safety_margin,
            });
        }
        Ok(())
    }

    /// Nominal frame time
    pub fn frame_dt(&self) -> f64 {
        1.0 / self.fps as f64
    }

    /// Fixed simulation step
    pub fn sim_dt(&self) -> f64 {
        1.0 / self.sim_hz as f64
    }

    /// Centre distance at which agent and target touch
    pub fn contact_distance(&self) -> f64 {
        self.dot_radius + self.target_radius
    }

    /// Arena rectangle inset from the window bounds
    pub fn arena(&self) -> Arena {
        Arena::inset(self.width, self.height, self.safety_margin)
    }

    /// Contact coefficients for both resolvers
    pub fn collision_params(&self) -> CollisionParams {
        CollisionParams {
            restitution: self.restitution,
            friction: self.friction,
            beta: self.beta,
            slop: self.slop,
        }
    }

    /// Controller setpoints and gains
    pub fn steering_params(&self) -> SteeringParams {
        SteeringParams {
            orbit_radius: self.orbit_radius,
            tangential_speed: self.tangential_speed,
            k_pr: self.k_pr,
            k_dr: self.k_dr,
            k_pt: self.k_pt,
            feedforward: self.feedforward,
            fmax: self.fmax,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    // Written so NaN fails too
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
