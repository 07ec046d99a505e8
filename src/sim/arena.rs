//! Axis-aligned arena rectangle
//!
//! Screen coordinates: `top < bottom`, y grows downward.

use glam::DVec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Arena {
    /// Window bounds inset by `margin` on every side
    pub fn inset(width: f64, height: f64, margin: f64) -> Self {
        Self {
            left: margin,
            right: width - margin,
            top: margin,
            bottom: height - margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// Check if a point lies inside (edges included)
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Nearest point inside the rectangle
    pub fn clamp_point(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            p.x.clamp(self.left, self.right),
            p.y.clamp(self.top, self.bottom),
        )
    }
}
