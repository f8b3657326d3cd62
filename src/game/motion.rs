//! Motion Controller
//!
//! Advances one car by `dt` seconds. The player follows the input
//! snapshot; opponents follow a look-ahead heuristic. Both share the
//! same speed clamp, lateral damping and progress integration.

use tracing::debug;

use crate::core::rng::DeterministicRng;
use crate::core::units::kph_to_mps;
use crate::game::config::RaceConfig;
use crate::game::input::InputFrame;
use crate::game::track::Track;
use crate::game::vehicle::{AiState, Pilot, Vehicle};

/// Result of moving one car.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionOutcome {
    /// Speed right after the boost impulse (km/h), if the car fired its boost this tick
    pub boost_speed: Option<f32>,
}

/// Advance any car, dispatching on who drives it.
pub fn advance_vehicle(
    vehicle: &mut Vehicle,
    input: InputFrame,
    track: &Track,
    config: &RaceConfig,
    rng: &mut DeterministicRng,
    dt: f32,
) -> MotionOutcome {
    match vehicle.pilot {
        Pilot::Controlled => advance_controlled(vehicle, input, config, dt),
        Pilot::Autonomous(mut ai) => {
            advance_autonomous(vehicle, &mut ai, track, config, rng, dt);
            vehicle.pilot = Pilot::Autonomous(ai);
            MotionOutcome::default()
        }
    }
}

/// Player physics for one tick.
pub fn advance_controlled(
    vehicle: &mut Vehicle,
    input: InputFrame,
    config: &RaceConfig,
    dt: f32,
) -> MotionOutcome {
    let mut outcome = MotionOutcome::default();

    if input.boost() && vehicle.try_boost(&config.boost) {
        debug!(vehicle = vehicle.id.0, speed = vehicle.speed, "boost fired");
        outcome.boost_speed = Some(vehicle.speed);
    }

    let throttle = input.throttle();
    if throttle > 0.0 {
        vehicle.speed += vehicle.acceleration * throttle * dt;
    } else if throttle < 0.0 {
        vehicle.speed -= vehicle.brake_deceleration * -throttle * dt;
    } else {
        vehicle.speed -= vehicle.speed.min(config.player.coast_deceleration * dt);
    }
    vehicle.clamp_speed();

    vehicle.lateral_offset += input.steer() * config.player.steer_rate * stability(vehicle, config) * dt;
    vehicle.lateral_offset *= config.lateral_damping;

    vehicle.progress += kph_to_mps(vehicle.speed) * dt;

    vehicle.boost.tick(dt);

    outcome
}

/// Steering authority in `[min_stability, 1]`, falling as speed nears the top.
pub fn stability(vehicle: &Vehicle, config: &RaceConfig) -> f32 {
    let ratio = if vehicle.max_speed > 0.0 {
        vehicle.speed / vehicle.max_speed
    } else {
        1.0
    };
    (1.0 - ratio).max(config.player.min_stability)
}

/// Speed the opponent planner aims for given the curvature ahead.
pub fn target_speed(vehicle: &Vehicle, upcoming_curvature: f32, config: &RaceConfig) -> f32 {
    let desired = vehicle.max_speed - upcoming_curvature.abs() * config.ai.curvature_speed_penalty;
    let floor = config.ai.min_target_speed.min(vehicle.max_speed);
    desired.clamp(floor, vehicle.max_speed)
}

/// Opponent heuristic for one tick.
pub fn advance_autonomous(
    vehicle: &mut Vehicle,
    ai: &mut AiState,
    track: &Track,
    config: &RaceConfig,
    rng: &mut DeterministicRng,
    dt: f32,
) {
    let params = &config.ai;

    let ahead = track.sample_at(vehicle.progress + params.speed_lookahead);
    ai.target_speed = target_speed(vehicle, ahead.curvature, config);

    if vehicle.speed < ai.target_speed {
        let jitter = rng.next_f32_range(params.accel_jitter_min, params.accel_jitter_max);
        vehicle.speed = (vehicle.speed + vehicle.acceleration * dt * jitter).min(ai.target_speed);
    } else {
        vehicle.speed = (vehicle.speed - vehicle.brake_deceleration * dt * params.brake_factor)
            .max(ai.target_speed);
    }
    vehicle.clamp_speed();

    let near = track.sample_at(vehicle.progress + params.line_lookahead);
    let phase = vehicle.progress + vehicle.id.index() as f32 * params.line_phase_step;
    ai.target_offset = (phase * params.line_frequency).sin() * params.line_amplitude
        + rng.next_symmetric(params.line_jitter * 0.5);

    // Ease more slowly through bends so the line stays tight.
    let easing = (params.line_easing
        * dt
        * (1.0 - near.curvature.abs() * params.curvature_easing_penalty))
        .clamp(0.0, 1.0);
    vehicle.lateral_offset += (ai.target_offset - vehicle.lateral_offset) * easing;

    vehicle.progress += kph_to_mps(vehicle.speed) * dt;
    vehicle.lateral_offset *= config.lateral_damping;

    if rng.chance(params.surge_probability) && vehicle.speed < ai.target_speed {
        vehicle.speed = (vehicle.speed + params.surge_amount).min(ai.target_speed);
    }
}

// =============================================================================
// TESTS
// =============================================================================
