//! Platform abstraction layer
//!
//! The physics core never talks to a window, keyboard or wall clock. A
//! [`Session`] owns the simulation and three collaborators:
//! - [`InputSource`]: per-frame commands
//! - [`Renderer`]: draws a read-only [`Frame`]
//! - [`FrameClock`]: elapsed time per frame
//!
//! Frame time is fed to an accumulator and consumed in fixed `sim_dt` steps.

pub mod headless;

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::sim::{Arena, SimState, Snapshot, TickInput, tick};

/// Key legend shown in the debug overlay
pub const KEY_LEGEND: &str = "Arrows: move target  SPACE: dive  C: flip dir  D: HUD  ESC: quit";

/// Supplies one [`TickInput`] per frame
pub trait InputSource {
    fn poll(&mut self) -> TickInput;
}

/// Consumes one [`Frame`] per frame
pub trait Renderer {
    fn draw(&mut self, frame: &Frame<'_>);
}

/// Measures frame time in seconds
pub trait FrameClock {
    fn tick(&mut self) -> f64;
}

/// Everything a renderer may look at
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub snapshot: Snapshot,
    pub arena: &'a Arena,
    pub orbit_radius: f64,
    /// Debug overlay visible
    pub debug: bool,
    /// Frames presented so far, this one excluded
    pub index: u64,
}

impl Frame<'_> {
    /// Debug overlay text, top to bottom
    pub fn hud_lines(&self) -> [String; 4] {
        let s = &self.snapshot;
        [
            format!("state={}  stun={:.2}s", s.mode.as_str(), s.stun_timer),
            format!(
                "r={:6.1}  angle={:.2} rad  dir={}",
                s.radial_distance(),
                s.orbit_angle(),
                s.orbit_direction.as_str()
            ),
            format!("dives={}", s.dive_count),
            KEY_LEGEND.to_string(),
        ]
    }
}

/// Wall clock that sleeps to hold a target frame rate
#[derive(Debug)]
pub struct PacedClock {
    frame: Duration,
    last: Instant,
}

impl PacedClock {
    pub fn new(fps: u32) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            last: Instant::now(),
        }
    }
}

impl FrameClock for PacedClock {
    fn tick(&mut self) -> f64 {
        let spent = self.last.elapsed();
        if spent < self.frame {
            std::thread::sleep(self.frame - spent);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        dt
    }
}

/// Constant frame time, for tests and offline runs
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub f64);

impl FrameClock for FixedClock {
    fn tick(&mut self) -> f64 {
        self.0
    }
}

/// Totals reported when a session ends
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionSummary {
    pub frames: u64,
    pub steps: u64,
    pub sim_time: f64,
    pub dives: u32,
    pub impacts: u64,
}

/// Owns the simulation and drives it with its collaborators
pub struct Session<I, R, C> {
    state: SimState,
    input: I,
    renderer: R,
    clock: C,
    /// Edge events not yet consumed by a step
    pending: TickInput,
    accumulator: f64,
    debug: bool,
    summary: SessionSummary,
}

impl<I: InputSource, R: Renderer, C: FrameClock> Session<I, R, C> {
    pub fn new(config: &Config, input: I, renderer: R, clock: C) -> Self {
        Self {
            state: SimState::new(config),
            input,
            renderer,
            clock,
            pending: TickInput::default(),
            accumulator: 0.0,
            debug: config.debug_hud,
            summary: SessionSummary::default(),
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Run one frame. Returns false once quit was requested.
    pub fn run_frame(&mut self) -> bool {
        let config = self.state.config();
        let sim_dt = config.sim_dt();
        let max_substeps = config.max_substeps;
        let dt = self.clock.tick().clamp(0.0, config.max_frame_dt);

        let input = self.input.poll();
        if input.quit {
            log::info!("Quit requested after {} frames", self.summary.frames);
            return false;
        }
        if input.toggle_debug {
            self.debug = !self.debug;
            log::debug!("Debug overlay {}", if self.debug { "on" } else { "off" });
        }

        // Edges survive until a step consumes them; held keys are level.
        // Two flips before the next step cancel out.
        self.pending.dive |= input.dive;
        self.pending.flip_orbit ^= input.flip_orbit;
        self.pending.held = input.held;

        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= sim_dt && substeps < max_substeps {
            let report = tick(&mut self.state, &self.pending, sim_dt);
            self.accumulator -= sim_dt;
            substeps += 1;

            self.pending.dive = false;
            self.pending.flip_orbit = false;

            self.summary.steps += 1;
            if report.agent.collided() {
                self.summary.impacts += 1;
            }
        }
        if substeps == max_substeps && self.accumulator >= sim_dt {
            log::debug!(
                "Dropping {:.3}s of backlog after {} substeps",
                self.accumulator,
                substeps
            );
            self.accumulator = 0.0;
        }

        let frame = Frame {
            snapshot: self.state.snapshot(),
            arena: self.state.arena(),
            orbit_radius: self.state.config().orbit_radius,
            debug: self.debug,
            index: self.summary.frames,
        };
        self.renderer.draw(&frame);

        self.summary.frames += 1;
        self.summary.sim_time = self.state.time;
        self.summary.dives = self.state.agent.dive_count;
        true
    }

    /// Run frames until quit
    pub fn run(&mut self) -> SessionSummary {
        log::info!("Session started");
        while self.run_frame() {}
        log::info!(
            "Session ended: {} frames, {} steps, {:.1}s simulated, {} dives, {} impacts",
            self.summary.frames,
            self.summary.steps,
            self.summary.sim_time,
            self.summary.dives,
            self.summary.impacts
        );
        self.summary
    }
}
