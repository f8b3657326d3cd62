//! Core deterministic primitives.
//!
//! Seeded randomness, state hashing and unit conversions shared by
//! every simulation module.

pub mod rng;
pub mod hash;
pub mod units;

// Re-export core types
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash, StateHasher};
pub use units::{kph_to_mps, render_to_meters};
