//! Frame clock.
//!
//! Converts the frontend's monotonic frame timestamps into the `dt`
//! fed to the simulation, capped so a long stall (backgrounded
//! window, debugger) becomes one short step instead of a jump.

use std::time::Duration;

/// Turns monotonic timestamps into clamped frame deltas.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last: Option<Duration>,
    max_dt: f32,
}

impl FrameClock {
    /// Create a clock that never reports more than `max_dt` seconds.
    pub fn new(max_dt: f32) -> Self {
        Self { last: None, max_dt }
    }

    /// Seconds since the previous timestamp, clamped to `[0, max_dt]`.
    ///
    /// The first call returns 0.
    pub fn advance(&mut self, now: Duration) -> f32 {
        let dt = match self.last {
            Some(last) => now.saturating_sub(last).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        dt.min(self.max_dt)
    }
}
