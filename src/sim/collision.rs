//! Impulse-based collision response
//!
//! Two cases: disk vs disk (both bodies respond) and disk vs the four
//! axis-aligned arena walls (infinite mass, only the disk responds).
//! Both apply restitution and Coulomb friction at the velocity level,
//! then a Baumgarte push-apart at the position level.
//!
//! The returned `bool` reports whether a velocity impulse fired, not mere
//! overlap: resting contact is corrected every frame but only an approaching
//! contact counts as a collision.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::body::Body;
use crate::normalize_or_fallback;

/// Contact coefficients shared by both resolvers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionParams {
    /// Coefficient of restitution (0 = inelastic, 1 = elastic)
    pub restitution: f64,
    /// Coulomb friction coefficient
    pub friction: f64,
    /// Fraction of penetration removed per frame
    pub beta: f64,
    /// Penetration tolerated without correction
    pub slop: f64,
}

impl CollisionParams {
    /// Positional push for a given penetration depth (before mass weighting)
    #[inline]
    fn bias(&self, penetration: f64) -> f64 {
        self.beta * (penetration - self.slop).max(0.0)
    }
}

/// Overlap between two disks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from `b` toward `a`
    pub normal: DVec2,
    /// Overlap depth, always positive
    pub penetration: f64,
}

/// Overlap test between two disks.
///
/// Coincident centres fall back to a `+x` normal rather than failing.
pub fn disk_contact(a: &Body, b: &Body) -> Option<Contact> {
    let (normal, dist) = normalize_or_fallback(a.pos - b.pos);
    let penetration = (a.radius + b.radius) - dist;
    if penetration <= 0.0 {
        return None;
    }
    Some(Contact {
        normal,
        penetration,
    })
}

/// Resolve a disk-disk contact, mutating both bodies.
///
/// `a` and `b` are distinct borrows, so the two bodies can never alias.
pub fn resolve_dynamic(a: &mut Body, b: &mut Body, params: &CollisionParams) -> bool {
    let Some(Contact {
        normal: n,
        penetration,
    }) = disk_contact(a, b)
    else {
        return false;
    };

    let rel_vel = a.vel - b.vel;
    let v_n = rel_vel.dot(n);
    let inv_mass_sum = a.inv_mass() + b.inv_mass();
    let mut collided = false;

    // Only approaching bodies bounce
    if v_n < 0.0 {
        let j = -(1.0 + params.restitution) * v_n / inv_mass_sum;
        a.apply_impulse(n * j);
        b.apply_impulse(-n * j);

        let t = n.perp();
        let v_t = rel_vel.dot(t);
        let bound = params.friction * j.abs();
        let j_t = (-v_t / inv_mass_sum).clamp(-bound, bound);
        a.apply_impulse(t * j_t);
        b.apply_impulse(-t * j_t);

        collided = true;
    }

    let corr = params.bias(penetration) / inv_mass_sum;
    a.pos += n * (corr * a.inv_mass());
    b.pos -= n * (corr * b.inv_mass());

    collided
}

/// One of the four arena walls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
    Top,
    Bottom,
}

impl Wall {
    /// Resolution order
    pub const ALL: [Wall; 4] = [Wall::Left, Wall::Right, Wall::Top, Wall::Bottom];

    /// Unit normal pointing into the arena
    pub fn normal(self) -> DVec2 {
        match self {
            Wall::Left => DVec2::X,
            Wall::Right => DVec2::NEG_X,
            Wall::Top => DVec2::Y,
            Wall::Bottom => DVec2::NEG_Y,
        }
    }

    /// Axis friction acts on: the velocity axis orthogonal to the wall normal
    pub fn friction_axis(self) -> DVec2 {
        match self {
            Wall::Left | Wall::Right => DVec2::Y,
            Wall::Top | Wall::Bottom => DVec2::X,
        }
    }

    /// How far the disk pokes through this wall (positive means overlap)
    pub fn penetration(self, body: &Body, arena: &Arena) -> f64 {
        match self {
            Wall::Left => arena.left - (body.pos.x - body.radius),
            Wall::Right => (body.pos.x + body.radius) - arena.right,
            Wall::Top => arena.top - (body.pos.y - body.radius),
            Wall::Bottom => (body.pos.y + body.radius) - arena.bottom,
        }
    }
}

/// Resolve the disk against every arena wall it overlaps.
///
/// Walls are checked independently in [`Wall::ALL`] order, each seeing the
/// velocity and position left by the previous one.
pub fn resolve_wall(body: &mut Body, arena: &Arena, params: &CollisionParams) -> bool {
    let mut collided = false;
    for wall in Wall::ALL {
        collided |= resolve_single_wall(body, wall, arena, params);
    }
    collided
}

fn resolve_single_wall(
    body: &mut Body,
    wall: Wall,
    arena: &Arena,
    params: &CollisionParams,
) -> bool {
    let penetration = wall.penetration(body, arena);
    if penetration <= 0.0 {
        return false;
    }

    let n = wall.normal();
    let mut collided = false;

    let v_n = body.vel.dot(n);
    if v_n < 0.0 {
        let j = -(1.0 + params.restitution) * v_n * body.mass;
        body.apply_impulse(n * j);

        // Friction against the other velocity axis only
        let axis = wall.friction_axis();
        let bound = params.friction * j.abs();
        let j_t = (-body.vel.dot(axis) * body.mass).clamp(-bound, bound);
        body.apply_impulse(axis * j_t);

        collided = true;
    }

    // Wall has infinite mass: the disk takes the whole correction
    body.pos += n * params.bias(penetration);

    collided
}
