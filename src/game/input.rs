//! Input Snapshot and Recording
//!
//! The core never polls a keyboard. Each tick receives one
//! [`InputFrame`]; how keys map onto it is the frontend's business.
//! Frames can be recorded with delta compression and replayed.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};

/// Control state for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(transparent)]
pub struct InputFrame {
    /// Action flags (packed bits):
    /// - Bit 0: accelerate held
    /// - Bit 1: brake held
    /// - Bit 2: steer left held
    /// - Bit 3: steer right held
    /// - Bit 4: boost triggered this tick
    /// - Bit 5: pause toggled this tick
    pub flags: u8,
}

impl InputFrame {
    /// Accelerate flag bit
    pub const FLAG_ACCELERATE: u8 = 0x01;

    /// Brake flag bit
    pub const FLAG_BRAKE: u8 = 0x02;

    /// Steer left flag bit
    pub const FLAG_STEER_LEFT: u8 = 0x04;

    /// Steer right flag bit
    pub const FLAG_STEER_RIGHT: u8 = 0x08;

    /// Boost flag bit
    pub const FLAG_BOOST: u8 = 0x10;

    /// Pause toggle flag bit
    pub const FLAG_PAUSE: u8 = 0x20;

    /// Create an idle frame.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Build a frame from the six control booleans.
    pub fn from_controls(
        accelerate: bool,
        brake: bool,
        steer_left: bool,
        steer_right: bool,
        boost: bool,
        pause: bool,
    ) -> Self {
        let mut frame = Self::new();
        frame.set(Self::FLAG_ACCELERATE, accelerate);
        frame.set(Self::FLAG_BRAKE, brake);
        frame.set(Self::FLAG_STEER_LEFT, steer_left);
        frame.set(Self::FLAG_STEER_RIGHT, steer_right);
        frame.set(Self::FLAG_BOOST, boost);
        frame.set(Self::FLAG_PAUSE, pause);
        frame
    }

    /// Builder: set or clear a flag.
    pub const fn with(mut self, flag: u8, on: bool) -> Self {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
        self
    }

    /// Set or clear a flag.
    #[inline]
    pub fn set(&mut self, flag: u8, on: bool) {
        *self = self.with(flag, on);
    }

    #[inline]
    fn has(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    /// Accelerate held.
    #[inline]
    pub fn accelerate(&self) -> bool {
        self.has(Self::FLAG_ACCELERATE)
    }

    /// Brake held.
    #[inline]
    pub fn brake(&self) -> bool {
        self.has(Self::FLAG_BRAKE)
    }

    /// Steer left held.
    #[inline]
    pub fn steer_left(&self) -> bool {
        self.has(Self::FLAG_STEER_LEFT)
    }

    /// Steer right held.
    #[inline]
    pub fn steer_right(&self) -> bool {
        self.has(Self::FLAG_STEER_RIGHT)
    }

    /// Boost requested this tick.
    #[inline]
    pub fn boost(&self) -> bool {
        self.has(Self::FLAG_BOOST)
    }

    /// Pause toggled this tick.
    #[inline]
    pub fn pause_toggled(&self) -> bool {
        self.has(Self::FLAG_PAUSE)
    }

    /// Throttle axis: +1 accelerate, -1 brake, 0 coast.
    ///
    /// Brake wins when both are held.
    #[inline]
    pub fn throttle(&self) -> f32 {
        if self.brake() {
            -1.0
        } else if self.accelerate() {
            1.0
        } else {
            0.0
        }
    }

    /// Steering axis: -1 left, +1 right, 0 when both or neither.
    #[inline]
    pub fn steer(&self) -> f32 {
        let mut axis = 0.0;
        if self.steer_left() {
            axis -= 1.0;
        }
        if self.steer_right() {
            axis += 1.0;
        }
        axis
    }

    /// No control held or triggered.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }
}

/// Input change at a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

/// Delta-compressed input log for one race.
///
/// Only ticks where the input changed are stored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputRecording {
    /// Seed the race was started from
    pub seed: u64,

    /// Last recorded tick
    pub end_tick: u32,

    deltas: Vec<InputDelta>,
}

impl InputRecording {
    /// Create an empty recording for a race seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            end_tick: 0,
            deltas: Vec::with_capacity(256),
        }
    }

    /// Record input for a tick. Only stored if it changed.
    pub fn record(&mut self, tick: u32, frame: InputFrame) {
        self.end_tick = tick;

        if frame != self.last_frame() {
            self.deltas.push(InputDelta { tick, frame });
        }
    }

    /// Most recently stored input, idle before the first delta.
    fn last_frame(&self) -> InputFrame {
        self.deltas.last().map_or(InputFrame::new(), |d| d.frame)
    }

    /// Input in effect at a tick.
    pub fn get_input_at(&self, tick: u32) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.tick <= tick);

        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// All stored deltas.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Iterate `(tick, frame)` for every tick from 0 to `end_tick`.
    pub fn replay_iter(&self) -> impl Iterator<Item = (u32, InputFrame)> + '_ {
        (0..=self.end_tick).map(move |tick| (tick, self.get_input_at(tick)))
    }

    /// Digest of the recording.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_recording();
        hasher.update_u64(self.seed);
        hasher.update_u32(self.end_tick);
        for delta in &self.deltas {
            hasher.update_u32(delta.tick);
            hasher.update_u8(delta.frame.flags);
        }
        hasher.finalize()
    }
}

// =============================================================================
// TESTS
// =============================================================================
