//! Race State
//!
//! Everything one race owns: the immutable track, the field of cars,
//! the seeded RNG and the phase. Created once from a config and a seed;
//! mutated only by [`crate::game::tick::tick`].

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::game::config::{ConfigError, RaceConfig};
use crate::game::events::RaceEvent;
use crate::game::referee::{self, Standing};
use crate::game::track::Track;
use crate::game::vehicle::{AiState, Pilot, Vehicle, VehicleId};

// =============================================================================
// RACE PHASE
// =============================================================================

/// Global race phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RacePhase {
    /// Cars are moving
    #[default]
    Running = 0,
    /// Frozen by the player
    Paused = 1,
    /// A car reached the finish distance
    Finished = 2,
}

// =============================================================================
// RACE STATE
// =============================================================================

/// Complete state of a race.
///
/// Serialize-only: a race is rebuilt from its seed and inputs, never loaded.
#[derive(Clone, Debug, Serialize)]
pub struct RaceState {
    /// Seed the race was created from
    pub seed: u64,

    /// Simulated ticks (paused frames do not count)
    pub tick: u32,

    /// Simulated seconds
    pub elapsed: f32,

    /// Current phase
    pub phase: RacePhase,

    /// Finish distance (meters)
    pub race_distance: f32,

    /// Centerline
    pub track: Track,

    /// Grid order, player first. Never empty and never resized.
    pub(crate) vehicles: Vec<Vehicle>,

    /// Deterministic RNG for everything after generation
    pub(crate) rng: DeterministicRng,

    /// Events generated since the last drain
    #[serde(skip)]
    pub(crate) pending_events: Vec<RaceEvent>,

    /// Standings frozen at the finish
    pub final_standings: Option<Vec<Standing>>,
}

impl RaceState {
    /// Validate the config, generate the track and line up the grid.
    pub fn new(config: &RaceConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = DeterministicRng::new(seed);
        let track = Track::generate(config.race_distance, &config.track, &mut rng);
        let vehicles = spawn_grid(config, &mut rng);

        info!(
            seed,
            samples = track.len(),
            field = vehicles.len(),
            distance = config.race_distance,
            "race created"
        );

        Ok(Self {
            seed,
            tick: 0,
            elapsed: 0.0,
            phase: RacePhase::Running,
            race_distance: config.race_distance,
            track,
            vehicles,
            rng,
            pending_events: Vec::new(),
            final_standings: None,
        })
    }

    /// Create a race whose seed is derived from a label.
    pub fn from_label(config: &RaceConfig, label: &str) -> Result<Self, ConfigError> {
        Self::new(config, crate::core::rng::derive_race_seed(label))
    }

    /// All cars in grid order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// All cars in grid order, mutably. The field size cannot change.
    pub fn vehicles_mut(&mut self) -> &mut [Vehicle] {
        &mut self.vehicles
    }

    /// Look up a car.
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id.index())
    }

    /// The input-driven car.
    pub fn player(&self) -> &Vehicle {
        &self.vehicles[VehicleId::PLAYER.index()]
    }

    /// Is the simulation advancing?
    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == RacePhase::Running
    }

    /// Flip between Running and Paused. No effect once finished.
    pub fn toggle_pause(&mut self) {
        let old = self.phase;
        self.phase = match old {
            RacePhase::Running => RacePhase::Paused,
            RacePhase::Paused => RacePhase::Running,
            RacePhase::Finished => return,
        };
        info!(tick = self.tick, from = ?old, to = ?self.phase, "phase changed");
        self.push_event(RaceEvent::phase_changed(self.tick, old, self.phase));
    }

    /// Freeze the standings and stop the race.
    pub(crate) fn finish(&mut self) {
        if self.phase == RacePhase::Finished {
            return;
        }
        let standings = referee::standings(&self.vehicles);
        let winner = standings
            .first()
            .map(|s| s.vehicle)
            .unwrap_or(VehicleId::PLAYER);

        let old = self.phase;
        self.phase = RacePhase::Finished;
        self.final_standings = Some(standings);

        self.push_event(RaceEvent::phase_changed(self.tick, old, self.phase));
        self.push_event(RaceEvent::race_finished(self.tick, winner));
    }

    /// Current standings.
    pub fn standings(&self) -> Vec<Standing> {
        referee::standings(&self.vehicles)
    }

    /// Player's 1-based race position.
    pub fn player_position(&self) -> u32 {
        referee::position_of(&self.vehicles, VehicleId::PLAYER).unwrap_or(1)
    }

    /// Queue an event.
    pub fn push_event(&mut self, event: RaceEvent) {
        self.pending_events.push(event);
    }

    /// Drain queued events.
    pub fn take_events(&mut self) -> Vec<RaceEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Digest of everything that affects future ticks.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.seed, |hasher| {
            hasher.update_u8(self.phase as u8);
            hasher.update_f32(self.elapsed);
            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
            hasher.update_u32(self.vehicles.len() as u32);
            for vehicle in &self.vehicles {
                vehicle.hash_into(hasher);
            }
        })
    }
}

/// Player on the back of the grid, opponents in a column ahead.
fn spawn_grid(config: &RaceConfig, rng: &mut DeterministicRng) -> Vec<Vehicle> {
    let mut vehicles = Vec::with_capacity(config.field_size());

    let mut player = Vehicle::new(
        VehicleId::PLAYER,
        config.player.name.clone(),
        config.player.color.clone(),
        config.player.max_speed,
        &config.body,
        Pilot::Controlled,
    );
    player.progress = -rng.next_f32() * config.player.start_spread;
    vehicles.push(player);

    let grid = &config.opponents;
    for i in 0..grid.count {
        let max_speed = rng.next_f32_range(grid.max_speed_min, grid.max_speed_max);
        let color = match grid.colors.len() {
            0 => config.player.color.clone(),
            n => grid.colors[i as usize % n].clone(),
        };

        let mut bot = Vehicle::new(
            VehicleId((i + 1) as u8),
            format!("BOT{}", i + 1),
            color,
            max_speed,
            &config.body,
            Pilot::Autonomous(AiState::default()),
        );
        bot.progress = grid.grid_start + i as f32 * grid.grid_gap;
        bot.speed = rng.next_f32_range(grid.start_speed_min, grid.start_speed_max);
        bot.clamp_speed();
        bot.pilot = Pilot::Autonomous(AiState {
            target_offset: 0.0,
            target_speed: bot.speed,
        });
        vehicles.push(bot);
    }

    vehicles
}

// =============================================================================
// TESTS
// =============================================================================
