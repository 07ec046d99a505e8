//! Vortex entry point
//!
//! Loads the configuration and runs a seeded demo session headlessly,
//! writing the debug overlay to the log. Set `RUST_LOG=info` to see it.

use std::process::ExitCode;

use vortex::Config;
use vortex::platform::headless::{DemoInput, LogRenderer};
use vortex::platform::{PacedClock, Session};

/// Demo length in seconds of wall time
const DEMO_SECONDS: u64 = 30;
const DEMO_SEED: u64 = 0x5eed;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Vortex starting...");

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::from(1);
        }
    };

    let input = DemoInput::new(DEMO_SEED, DEMO_SECONDS * config.fps as u64);
    let renderer = LogRenderer::new(config.fps as u64);
    let clock = PacedClock::new(config.fps);

    let mut session = Session::new(&config, input, renderer, clock);
    session.run();
    ExitCode::SUCCESS
}
