//! Race Events
//!
//! Events generated during simulation for the HUD, logs and replay
//! comparison.

use serde::{Serialize, Deserialize};
use crate::game::state::RacePhase;
use crate::game::vehicle::VehicleId;

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Contacts first
    Collision = 0,
    /// Then boosts
    Boost = 1,
    /// Then phase changes
    Phase = 2,
    /// Lowest priority
    Other = 255,
}

/// Race event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RaceEventData {
    /// Two cars touched and were pushed apart
    Collision {
        /// First car of the pair (lower grid index)
        a: VehicleId,
        /// Second car of the pair
        b: VehicleId,
        /// Penetration depth before resolution (render units)
        overlap: f32,
    },

    /// A car fired its boost
    BoostActivated {
        /// Boosting car
        vehicle: VehicleId,
        /// Speed after the impulse (km/h)
        speed: f32,
    },

    /// Race phase changed
    PhaseChanged {
        /// Phase before the change
        old_phase: RacePhase,
        /// Phase after the change
        new_phase: RacePhase,
    },

    /// A car reached the finish distance
    RaceFinished {
        /// Leader at the finish
        winner: VehicleId,
        /// Ticks simulated
        duration_ticks: u32,
    },
}

/// A race event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RaceEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Car involved (for tie-breaking)
    pub vehicle: Option<VehicleId>,

    /// Event data
    pub data: RaceEventData,
}

impl RaceEvent {
    /// Create a new event.
    pub fn new(tick: u32, priority: EventPriority, data: RaceEventData) -> Self {
        let vehicle = match &data {
            RaceEventData::Collision { a, .. } => Some(*a),
            RaceEventData::BoostActivated { vehicle, .. } => Some(*vehicle),
            RaceEventData::RaceFinished { winner, .. } => Some(*winner),
            RaceEventData::PhaseChanged { .. } => None,
        };

        Self {
            tick,
            priority,
            vehicle,
            data,
        }
    }

    /// Create collision event.
    pub fn collision(tick: u32, a: VehicleId, b: VehicleId, overlap: f32) -> Self {
        Self::new(tick, EventPriority::Collision, RaceEventData::Collision { a, b, overlap })
    }

    /// Create boost event.
    pub fn boost_activated(tick: u32, vehicle: VehicleId, speed: f32) -> Self {
        Self::new(
            tick,
            EventPriority::Boost,
            RaceEventData::BoostActivated { vehicle, speed },
        )
    }

    /// Create phase change event.
    pub fn phase_changed(tick: u32, old_phase: RacePhase, new_phase: RacePhase) -> Self {
        Self::new(
            tick,
            EventPriority::Phase,
            RaceEventData::PhaseChanged { old_phase, new_phase },
        )
    }

    /// Create race finished event.
    pub fn race_finished(tick: u32, winner: VehicleId) -> Self {
        Self::new(
            tick,
            EventPriority::Other,
            RaceEventData::RaceFinished {
                winner,
                duration_ticks: tick,
            },
        )
    }
}

impl PartialEq for RaceEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick
            && self.priority == other.priority
            && self.vehicle == other.vehicle
    }
}

impl Eq for RaceEvent {}

impl PartialOrd for RaceEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RaceEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority, then vehicle
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
            .then(self.vehicle.cmp(&other.vehicle))
    }
}
