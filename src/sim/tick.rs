//! Per-frame simulation step
//!
//! The agent update order is fixed; moving any step changes the physics.

use super::arena::Arena;
use super::body::Body;
use super::collision::{resolve_dynamic, resolve_wall};
use super::controller::orbit_dive_force;
use super::state::{Agent, HeldDirections, Mode, SimState};
use crate::config::Config;

/// Input commands for a single frame, sampled once at frame start
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a dive (edge)
    pub dive: bool,
    /// Flip the orbit direction (edge)
    pub flip_orbit: bool,
    /// Toggle the debug overlay (edge, render-only)
    pub toggle_debug: bool,
    /// Quit or window close (edge, handled by the session)
    pub quit: bool,
    /// Target movement keys (held)
    pub held: HeldDirections,
}

/// What happened to the agent during one update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AgentStep {
    pub hit_wall: bool,
    pub hit_target: bool,
    pub transition: Option<(Mode, Mode)>,
}

impl AgentStep {
    pub fn collided(&self) -> bool {
        self.hit_wall || self.hit_target
    }
}

/// Frame summary
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// `dt` actually used after flooring
    pub dt: f64,
    /// A dive command was accepted this frame
    pub dive_started: bool,
    pub agent: AgentStep,
}

/// Advance the agent by one step against a (possibly moving) target.
///
/// Order: steer, stun scaling, drag, integrate, walls, target, stun trigger,
/// mode rule, orbit direction. Both centres are clamped back into the arena
/// after the target contact.
pub fn update_agent(
    agent: &mut Agent,
    target: &mut Body,
    arena: &Arena,
    config: &Config,
    dt: f64,
) -> AgentStep {
    let mut force = orbit_dive_force(
        &agent.body,
        target,
        agent.mode,
        agent.orbit_direction,
        &config.steering_params(),
    );

    if agent.stun_timer > 0.0 {
        force *= config.stun_force_scale;
        agent.stun_timer = (agent.stun_timer - dt).max(0.0);
    }
    agent.last_force = force;

    force += -config.drag * agent.body.vel;
    agent.body.integrate(force, dt);

    let contacts = config.collision_params();
    let hit_wall = resolve_wall(&mut agent.body, arena, &contacts);
    let hit_target = resolve_dynamic(&mut agent.body, target, &contacts);
    // Target push-apart can shove either centre past a wall
    agent.body.pos = arena.clamp_point(agent.body.pos);
    target.pos = arena.clamp_point(target.pos);

    if hit_wall || hit_target {
        agent.stun_timer = config.stun_time;
        log::debug!(
            "Impact (wall={}, target={}), stunned for {:.2}s",
            hit_wall,
            hit_target,
            config.stun_time
        );
    }

    let dist = agent.body.pos.distance(target.pos);
    let transition = agent.advance_mode(dist, config);
    if let Some((from, to)) = transition {
        log::debug!("Mode {} -> {} at r={:.1}", from.as_str(), to.as_str(), dist);
    }

    agent.redetect_direction(target);

    AgentStep {
        hit_wall,
        hit_target,
        transition,
    }
}

/// Advance the whole simulation by one frame
pub fn tick(state: &mut SimState, input: &TickInput, dt: f64) -> TickReport {
    let config = state.config().clone();
    let arena = *state.arena();
    let dt = dt.max(config.min_dt);

    let mut dive_started = false;
    if input.dive {
        dive_started = state.agent.command_dive();
        if dive_started {
            log::debug!("Dive #{} commanded", state.agent.dive_count);
        }
    }
    if input.flip_orbit {
        state.agent.flip_orbit_direction();
    }

    state
        .target
        .update(input.held, config.target_speed, &arena, dt);

    let agent = update_agent(
        &mut state.agent,
        &mut state.target.body,
        &arena,
        &config,
        dt,
    );

    state.time += dt;
    state.frames += 1;

    TickReport {
        dt,
        dive_started,
        agent,
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::sim::controller::OrbitFrame;
    use crate::sim::state::OrbitDirection;

    const FRAME_DT: f64 = 1.0 / 60.0;

    fn sim_dt() -> f64 {
        Config::default().sim_dt()
    }

    #[test]
    fn test_first_frame_force_is_centripetal() {
        let config = Config::default();
        let mut state = SimState::new(&config);
        let agent_pos = state.agent.body.pos;
        let target_pos = state.target.body.pos;

        tick(&mut state, &TickInput::default(), FRAME_DT);

        let force = state.agent.last_force;
        let expected = config.tangential_speed.powi(2) / config.orbit_radius;
        assert!((force.length() - expected).abs() < 1e-6);
        // From agent toward target
        let toward = (target_pos - agent_pos).normalize();
        assert!((force.normalize() - toward).length() < 1e-9);
    }

    #[test]
    fn test_dt_is_floored() {
        let config = Config::default();
        let mut state = SimState::new(&config);
        let report = tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(report.dt, config.min_dt);

        let report = tick(&mut state, &TickInput::default(), -1.0);
        assert_eq!(report.dt, config.min_dt);
        assert!(state.agent.body.pos.is_finite());
        assert_eq!(state.frames, 2);
    }

    #[test]
    fn test_orbit_is_stable() {
        let config = Config::default();
        let mut state = SimState::new(&config);
        let input = TickInput::default();

        // 6 simulated seconds
        for _ in 0..(6 * config.sim_hz) {
            let report = tick(&mut state, &input, config.sim_dt());
            assert!(!report.agent.collided());
            assert_eq!(state.agent.mode, Mode::Orbit);

            let r = state.snapshot().radial_distance();
            assert!(
                (r - config.orbit_radius).abs() <= config.eps,
                "radius drifted to {r} at t={:.3}",
                state.time
            );
        }
        assert_eq!(state.agent.orbit_direction, OrbitDirection::Ccw);
    }

    #[test]
    fn test_dive_recovery_cycle() {
        let config = Config::default();
        let mut state = SimState::new(&config);

        let dive = TickInput {
            dive: true,
            ..Default::default()
        };
        let report = tick(&mut state, &dive, config.sim_dt());
        assert!(report.dive_started);
        assert_eq!(state.agent.dive_count, 1);
        // A dive can't finish in one step from the orbit radius
        assert_eq!(state.agent.mode, Mode::Inward);

        let mut modes = vec![Mode::Orbit, Mode::Inward];
        let mut min_r = f64::MAX;
        for _ in 0..(20 * config.sim_hz) {
            // Hammering dive while not orbiting does nothing
            let report = tick(&mut state, &dive, config.sim_dt());
            assert!(!report.dive_started);

            min_r = min_r.min(state.snapshot().radial_distance());
            if let Some((from, to)) = report.agent.transition {
                assert_eq!(Some(&from), modes.last());
                modes.push(to);
            }
            if state.agent.mode == Mode::Orbit {
                break;
            }
        }

        assert_eq!(
            modes,
            vec![Mode::Orbit, Mode::Inward, Mode::Outward, Mode::Orbit]
        );
        assert!(min_r <= config.capture_eps);
        assert!(state.snapshot().radial_distance() >= config.orbit_radius - config.eps);
        assert_eq!(state.agent.dive_count, 1);
    }

    fn wall_hit_state(config: &Config) -> SimState {
        let mut state = SimState::new(config);
        let arena = *state.arena();
        // 2px into the left wall and still heading into it
        state.agent.body.pos = DVec2::new(arena.left + config.dot_radius - 2.0, 325.0);
        state.agent.body.vel = DVec2::new(-100.0, 0.0);
        state
    }

    #[test]
    fn test_stun_set_on_impact_and_decays() {
        let config = Config::default();
        let mut state = wall_hit_state(&config);
        let input = TickInput::default();

        let report = tick(&mut state, &input, sim_dt());
        assert!(report.agent.hit_wall);
        assert!(!report.agent.hit_target);
        assert_eq!(state.agent.stun_timer, config.stun_time);

        let mut prev = state.agent.stun_timer;
        for _ in 0..100 {
            let before = state.agent.clone();
            let target = state.target.body;
            let report = tick(&mut state, &input, sim_dt());
            assert!(!report.agent.collided());

            // Force attenuated exactly while the timer was running
            let raw = orbit_dive_force(
                &before.body,
                &target,
                before.mode,
                before.orbit_direction,
                &config.steering_params(),
            );
            let scale = if before.stun_timer > 0.0 {
                config.stun_force_scale
            } else {
                1.0
            };
            assert!((state.agent.last_force - raw * scale).length() < 1e-9);

            assert!(state.agent.stun_timer <= prev);
            prev = state.agent.stun_timer;
        }
        assert_eq!(state.agent.stun_timer, 0.0);
    }

    #[test]
    fn test_stun_overwrites_not_accumulates() {
        let config = Config::default();
        let mut state = wall_hit_state(&config);
        state.agent.stun_timer = config.stun_time * 0.5;
        tick(&mut state, &TickInput::default(), sim_dt());
        assert_eq!(state.agent.stun_timer, config.stun_time);
    }

    #[test]
    fn test_target_impact_stuns() {
        let config = Config::default();
        let mut state = SimState::new(&config);
        let target = state.target.body.pos;
        // Just outside contact, rushing at the target
        state.agent.body.pos = target + DVec2::new(15.0, 0.0);
        state.agent.body.vel = DVec2::new(-300.0, 0.0);

        let report = tick(&mut state, &TickInput::default(), sim_dt());
        assert!(report.agent.hit_target);
        assert_eq!(state.agent.stun_timer, config.stun_time);

        // Bounced: now separating from the target
        let normal = (state.agent.body.pos - state.target.body.pos).normalize();
        let v_n = (state.agent.body.vel - state.target.body.vel).dot(normal);
        assert!(v_n > 0.0);
    }

    #[test]
    fn test_manual_flip_overridden_by_detection() {
        let config = Config::default();
        let mut state = SimState::new(&config);
        let flip = TickInput {
            flip_orbit: true,
            ..Default::default()
        };
        tick(&mut state, &flip, FRAME_DT);
        // Still physically moving CCW, so detection wins
        assert_eq!(state.agent.orbit_direction, OrbitDirection::Ccw);
    }

    fn assert_contained(state: &SimState) {
        let arena = state.arena();
        assert!(arena.contains(state.agent.body.pos), "agent left arena");
        assert!(arena.contains(state.target.body.pos), "target left arena");
    }

    #[test]
    fn test_wall_containment_near_walls() {
        let config = Config::default();
        // Targets parked so the orbit circle crosses one or two walls
        let parks = [
            DVec2::new(105.0, 325.0),
            DVec2::new(795.0, 325.0),
            DVec2::new(450.0, 110.0),
            DVec2::new(450.0, 540.0),
            DVec2::new(105.0, 110.0),
            DVec2::new(795.0, 540.0),
        ];
        for park in parks {
            let mut state = SimState::new(&config);
            state.target.body.pos = park;
            // Start on the side of the target facing the arena centre
            let inward = (state.arena().center() - park).normalize();
            state.agent.body.pos = park + inward * config.orbit_radius;
            let frame = OrbitFrame::new(&state.agent.body, &state.target.body, OrbitDirection::Ccw);
            state.agent.body.vel = frame.tangent * config.tangential_speed;

            for i in 0..(8 * config.sim_hz) {
                let input = TickInput {
                    dive: i % 600 == 0,
                    flip_orbit: i % 450 == 0,
                    ..Default::default()
                };
                tick(&mut state, &input, config.sim_dt());
                assert_contained(&state);
            }
        }
    }

    #[test]
    fn test_wall_containment_with_moving_target() {
        let config = Config::default();
        let mut state = SimState::new(&config);
        let moves = [
            HeldDirections {
                right: true,
                ..Default::default()
            },
            HeldDirections {
                up: true,
                ..Default::default()
            },
            HeldDirections {
                left: true,
                down: true,
                ..Default::default()
            },
            HeldDirections::default(),
        ];
        for (i, held) in moves.iter().cycle().take(16).enumerate() {
            for step in 0..120 {
                let input = TickInput {
                    held: *held,
                    dive: step == 0 && i % 3 == 0,
                    ..Default::default()
                };
                tick(&mut state, &input, config.sim_dt());
                assert_contained(&state);
            }
        }
    }

    #[test]
    fn test_target_on_wall_stays_inside_after_impact() {
        let config = Config::default();
        let mut state = SimState::new(&config);
        let arena = *state.arena();
        // Target resting on the wall line, agent slamming into it from inside
        state.target.body.pos = DVec2::new(arena.left, 325.0);
        state.agent.body.pos = DVec2::new(arena.left + 13.0, 325.0);
        state.agent.body.vel = DVec2::new(-300.0, 0.0);

        let report = tick(&mut state, &TickInput::default(), sim_dt());
        assert!(report.agent.hit_target);
        assert_contained(&state);
    }

    #[test]
    fn test_containment_with_target_near_corner() {
        let config = Config::default();
        let arena = *SimState::new(&config).arena();
        // Inside contact distance of the walls, so the agent gets squeezed
        let parks = [
            DVec2::new(arena.left + 5.0, arena.top + 5.0),
            DVec2::new(arena.right - 10.0, 325.0),
            DVec2::new(450.0, arena.bottom),
        ];
        for park in parks {
            let mut state = SimState::new(&config);
            state.target.body.pos = park;
            let inward = (arena.center() - park).normalize();
            state.agent.body.pos = park + inward * config.orbit_radius;
            let frame = OrbitFrame::new(&state.agent.body, &state.target.body, OrbitDirection::Ccw);
            state.agent.body.vel = frame.tangent * config.tangential_speed;

            for i in 0..(10 * config.sim_hz) {
                let input = TickInput {
                    dive: i % 240 == 0,
                    ..Default::default()
                };
                tick(&mut state, &input, config.sim_dt());
                assert_contained(&state);
            }
        }
    }
}
