//! # Slipstream
//!
//! Deterministic simulation core for a top-down arcade racer: one
//! player car and a field of autonomous opponents on a procedurally
//! generated winding track, with contacts that shove but never end
//! the race.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SLIPSTREAM                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  ├── hash.rs     - State hashing for verification            │
//! │  └── units.rs    - km/h, m/s and render-unit conversions     │
//! │                                                              │
//! │  game/           - Race logic                                │
//! │  ├── config.rs   - Tunables and validation                   │
//! │  ├── track.rs    - Curvature-integrated centerline           │
//! │  ├── vehicle.rs  - Car state and world pose                  │
//! │  ├── motion.rs   - Player physics, opponent heuristic        │
//! │  ├── collision.rs- Pairwise contact resolution               │
//! │  ├── referee.rs  - Ranking and finish                        │
//! │  ├── tick.rs     - Simulation step and replay                │
//! │  └── view.rs     - Render frame and HUD snapshots            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! All randomness comes from one seeded Xorshift128+ stream owned by
//! the race. Given the same seed, config, inputs and `dt` sequence, a
//! race produces the same state hash on every run.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::rng::DeterministicRng;
pub use crate::core::hash::StateHash;
pub use crate::game::config::{ConfigError, RaceConfig};
pub use crate::game::input::{InputFrame, InputRecording};
pub use crate::game::state::{RacePhase, RaceState};
pub use crate::game::tick::{tick, replay_race, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal frame rate the defaults are tuned for (Hz)
pub const TICK_RATE: u32 = 60;
