//! Deterministic physics core
//!
//! Everything that moves lives here. This module stays pure and deterministic:
//! - Time only advances through `tick`
//! - No randomness
//! - No rendering or platform dependencies

pub mod arena;
pub mod body;
pub mod collision;
pub mod controller;
pub mod state;
pub mod tick;

pub use arena::Arena;
pub use body::Body;
pub use collision::{CollisionParams, Contact, Wall, disk_contact, resolve_dynamic, resolve_wall};
pub use controller::{OrbitFrame, SteeringParams, orbit_dive_force};
pub use state::{Agent, HeldDirections, Mode, OrbitDirection, SimState, Snapshot, Target};
pub use tick::{AgentStep, TickInput, TickReport, tick, update_agent};
