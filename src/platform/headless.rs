//! Windowless collaborators
//!
//! [`DemoInput`] plays a seeded, reproducible session; [`LogRenderer`] writes
//! the debug overlay through `log` instead of drawing it.

use std::ops::Range;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Frame, InputSource, Renderer};
use crate::sim::{HeldDirections, TickInput};

/// Scripted-by-RNG input for unattended runs
#[derive(Debug, Clone)]
pub struct DemoInput {
    rng: Pcg32,
    frame: u64,
    /// Quit on this frame
    pub quit_after: u64,
    /// Frames between dive commands
    pub dive_every: u64,
    /// Frames during which the debug overlay is hidden
    pub hud_off: Range<u64>,
    /// Chance per frame of flipping the orbit direction
    pub flip_chance: f64,
    held: HeldDirections,
    hold_frames: u32,
}

impl DemoInput {
    pub fn new(seed: u64, quit_after: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            frame: 0,
            quit_after,
            dive_every: 240,
            hud_off: 300..420,
            flip_chance: 0.002,
            held: HeldDirections::default(),
            hold_frames: 0,
        }
    }

    /// Pick a new held-key combination for the next stretch of frames
    fn wander(&mut self) -> HeldDirections {
        if self.hold_frames == 0 {
            // Idle half the time so the orbit can settle between moves
            self.held = if self.rng.random_bool(0.5) {
                HeldDirections::default()
            } else {
                HeldDirections {
                    up: self.rng.random_bool(0.3),
                    down: self.rng.random_bool(0.3),
                    left: self.rng.random_bool(0.3),
                    right: self.rng.random_bool(0.3),
                }
            };
            self.hold_frames = self.rng.random_range(20..90);
        }
        self.hold_frames -= 1;
        self.held
    }
}

impl InputSource for DemoInput {
    fn poll(&mut self) -> TickInput {
        let frame = self.frame;
        self.frame += 1;

        if frame >= self.quit_after {
            return TickInput {
                quit: true,
                ..Default::default()
            };
        }

        TickInput {
            dive: frame > 0 && frame % self.dive_every == 0,
            flip_orbit: self.rng.random_bool(self.flip_chance),
            toggle_debug: frame == self.hud_off.start || frame == self.hud_off.end,
            quit: false,
            held: self.wander(),
        }
    }
}

/// Logs the debug overlay every `every` frames while it is visible
#[derive(Debug, Clone)]
pub struct LogRenderer {
    every: u64,
    /// Overlay blocks written so far
    pub hud_writes: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            hud_writes: 0,
        }
    }
}

impl Renderer for LogRenderer {
    fn draw(&mut self, frame: &Frame<'_>) {
        if log::log_enabled!(log::Level::Trace) {
            match serde_json::to_string(&frame.snapshot) {
                Ok(json) => log::trace!("frame {}: {}", frame.index, json),
                Err(e) => log::warn!("Failed to serialize snapshot: {}", e),
            }
        }

        if !frame.debug || frame.index % self.every != 0 {
            return;
        }
        for line in frame.hud_lines() {
            log::info!("{}", line);
        }
        self.hud_writes += 1;
    }
}
