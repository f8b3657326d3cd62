//! Simulation Tick
//!
//! One step of the race in a fixed order:
//! pause toggle, motion (player then opponents), collisions, ranking.
//! Given the same state, input and `dt` the result is bit-identical.

use tracing::{debug, info};

use crate::game::collision;
use crate::game::config::{ConfigError, RaceConfig};
use crate::game::events::RaceEvent;
use crate::game::input::{InputFrame, InputRecording};
use crate::game::motion::advance_vehicle;
use crate::game::referee;
use crate::game::state::{RacePhase, RaceState};
use crate::game::vehicle::VehicleId;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick, sorted by tick, then priority, then car
    pub events: Vec<RaceEvent>,
    /// The race is over (finished this tick or earlier)
    pub finished: bool,
    /// Leader at the finish
    pub winner: Option<VehicleId>,
}

/// Run one simulation tick.
///
/// `dt` is clamped to `[0, max_frame_dt]`; non-finite values simulate nothing.
/// While paused only the pause toggle is honored and no car moves.
pub fn tick(state: &mut RaceState, input: InputFrame, config: &RaceConfig, dt: f32) -> TickResult {
    let mut result = TickResult::default();

    if state.phase == RacePhase::Finished {
        result.finished = true;
        result.winner = winner(state);
        return result;
    }

    // 1. Pause toggle
    if input.pause_toggled() {
        state.toggle_pause();
    }
    if state.phase == RacePhase::Paused {
        result.events = state.take_events();
        return result;
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, config.max_frame_dt)
    } else {
        0.0
    };
    state.tick += 1;
    state.elapsed += dt;

    // 2. Motion, grid order puts the player first
    for vehicle in state.vehicles.iter_mut() {
        let outcome = advance_vehicle(vehicle, input, &state.track, config, &mut state.rng, dt);
        if let Some(speed) = outcome.boost_speed {
            state
                .pending_events
                .push(RaceEvent::boost_activated(state.tick, vehicle.id, speed));
        }
    }

    // 3. Contacts
    let contacts = collision::resolve(
        &mut state.vehicles,
        &state.track,
        config,
        &mut state.rng,
        state.tick,
    );
    if !contacts.is_empty() {
        debug!(tick = state.tick, count = contacts.len(), "contacts this tick");
    }
    state.pending_events.extend(contacts);

    // 4. Ranking and finish
    if referee::check_finish(&state.vehicles, state.race_distance) {
        state.finish();
        result.finished = true;
        result.winner = winner(state);
        info!(
            tick = state.tick,
            elapsed = state.elapsed,
            winner = ?result.winner,
            player_position = state.player_position(),
            "race finished"
        );
    }

    let mut events = state.take_events();
    events.sort();
    result.events = events;
    result
}

fn winner(state: &RaceState) -> Option<VehicleId> {
    state
        .final_standings
        .as_ref()
        .and_then(|standings| standings.first())
        .map(|s| s.vehicle)
}

/// Re-run a recorded race from its seed with a fixed step.
///
/// Returns the final state and every event in order.
pub fn replay_race(
    config: &RaceConfig,
    recording: &InputRecording,
    dt: f32,
) -> Result<(RaceState, Vec<RaceEvent>), ConfigError> {
    let mut state = RaceState::new(config, recording.seed)?;
    let mut all_events = Vec::new();

    for (_, frame) in recording.replay_iter() {
        let result = tick(&mut state, frame, config, dt);
        all_events.extend(result.events);

        if result.finished {
            break;
        }
    }

    Ok((state, all_events))
}
