//! Vehicle State
//!
//! Per-car kinematic state. World position is never stored: it is
//! derived from the track at `progress` plus `lateral_offset` every
//! time it is needed.

use glam::Vec2;
use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::game::config::{BodyConfig, BoostConfig};
use crate::game::track::Track;

/// Stable vehicle identifier (grid index, player is 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct VehicleId(pub u8);

impl VehicleId {
    /// The player's id.
    pub const PLAYER: Self = Self(0);

    /// Grid index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Opponent planner state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AiState {
    /// Lateral offset the opponent is easing toward (render units)
    pub target_offset: f32,
    /// Speed the opponent is easing toward (km/h)
    pub target_speed: f32,
}

/// Who drives the car.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Pilot {
    /// Driven by the per-tick input snapshot
    Controlled,
    /// Driven by the target-tracking heuristic
    Autonomous(AiState),
}

/// Boost availability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoostState {
    /// Boost can fire this tick
    pub available: bool,
    /// Seconds until boost is available again (never negative)
    pub cooldown: f32,
}

impl Default for BoostState {
    fn default() -> Self {
        Self {
            available: true,
            cooldown: 0.0,
        }
    }
}

impl BoostState {
    /// Advance the cooldown timer.
    pub fn tick(&mut self, dt: f32) {
        if self.available {
            return;
        }
        self.cooldown = (self.cooldown - dt).max(0.0);
        if self.cooldown <= 0.0 {
            self.available = true;
        }
    }
}

/// Derived world pose.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPose {
    /// Position (render units)
    pub position: Vec2,
    /// Heading of the centerline under the car (radians)
    pub heading: f32,
}

/// One car on the grid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vehicle {
    /// Grid identifier
    pub id: VehicleId,
    /// Display name
    pub name: String,
    /// Display color (CSS hex)
    pub color: String,
    /// Arc-length travelled (meters, may be negative on the grid)
    pub progress: f32,
    /// Signed offset from the centerline (render units)
    pub lateral_offset: f32,
    /// Current speed (km/h), within `[0, max_speed]` after every update
    pub speed: f32,
    /// Top speed (km/h)
    pub max_speed: f32,
    /// Throttle gain (km/h per second)
    pub acceleration: f32,
    /// Braking loss (km/h per second)
    pub brake_deceleration: f32,
    /// Body width (render units)
    pub width: f32,
    /// Body length (render units)
    pub length: f32,
    /// Boost availability
    pub boost: BoostState,
    /// Controller
    pub pilot: Pilot,
}

impl Vehicle {
    /// Create a car at rest on the centerline.
    pub fn new(
        id: VehicleId,
        name: impl Into<String>,
        color: impl Into<String>,
        max_speed: f32,
        body: &BodyConfig,
        pilot: Pilot,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            progress: 0.0,
            lateral_offset: 0.0,
            speed: 0.0,
            max_speed,
            acceleration: body.acceleration,
            brake_deceleration: body.brake_deceleration,
            width: body.width,
            length: body.length,
            boost: BoostState::default(),
            pilot,
        }
    }

    /// Is this the input-driven car?
    #[inline]
    pub fn is_player(&self) -> bool {
        matches!(self.pilot, Pilot::Controlled)
    }

    /// Enforce `0 <= speed <= max_speed`.
    #[inline]
    pub fn clamp_speed(&mut self) {
        self.speed = self.speed.clamp(0.0, self.max_speed);
    }

    /// Fire the boost if available.
    ///
    /// Returns true if the boost fired.
    pub fn try_boost(&mut self, config: &BoostConfig) -> bool {
        if !self.boost.available {
            return false;
        }
        let cap = self.max_speed * config.cap_multiplier;
        self.speed = (self.speed + config.impulse).min(cap).max(self.speed);
        self.boost.available = false;
        self.boost.cooldown = config.cooldown;
        true
    }

    /// World position and heading at the current progress.
    pub fn world_pose(&self, track: &Track, render_scale: f32) -> WorldPose {
        let center = track.sample_at(self.progress);
        WorldPose {
            position: center.position * render_scale
                + center.perpendicular() * self.lateral_offset,
            heading: center.angle,
        }
    }

    /// Hash this car's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.id.0);
        hasher.update_f32(self.progress);
        hasher.update_f32(self.lateral_offset);
        hasher.update_f32(self.speed);
        hasher.update_f32(self.max_speed);
        hasher.update_bool(self.boost.available);
        hasher.update_f32(self.boost.cooldown);
        if let Pilot::Autonomous(ai) = self.pilot {
            hasher.update_f32(ai.target_offset);
            hasher.update_f32(ai.target_speed);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
