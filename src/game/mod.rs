//! Race Simulation Module
//!
//! Everything that moves during a race. Deterministic given a seed,
//! the per-tick inputs and the `dt` sequence.
//!
//! ## Module Structure
//!
//! - `config`: Tunable constants and validation
//! - `track`: Procedural centerline and arc-length sampling
//! - `vehicle`: Per-car state and world-pose derivation
//! - `input`: Per-tick control snapshot and recording
//! - `motion`: Player physics and opponent heuristic
//! - `collision`: Pairwise contact resolution
//! - `referee`: Ranking and finish detection
//! - `state`: Race state and phase
//! - `tick`: Simulation step and replay
//! - `clock`: Timestamp to `dt` conversion
//! - `events`: Race events
//! - `view`: Render and HUD snapshots

pub mod config;
pub mod track;
pub mod vehicle;
pub mod input;
pub mod motion;
pub mod collision;
pub mod referee;
pub mod state;
pub mod tick;
pub mod clock;
pub mod events;
pub mod view;

// Re-export key types
pub use config::{ConfigError, RaceConfig};
pub use track::{Track, TrackSample};
pub use vehicle::{Pilot, Vehicle, VehicleId, WorldPose};
pub use input::{InputFrame, InputRecording};
pub use state::{RacePhase, RaceState};
pub use tick::{tick, replay_race, TickResult};
pub use clock::FrameClock;
pub use events::{RaceEvent, RaceEventData};
pub use referee::Standing;
pub use view::{hud_snapshot, render_frame, HudSnapshot, RenderFrame};
