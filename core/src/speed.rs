//! Nominal playback speed and the native-animation rate model
//!
//! The user-facing speed is always "milliseconds per frame". Frame sequences
//! use it directly as their timer interval; native animations only accept a
//! percentage of their own rate, so the speed is converted against a fixed
//! 100 ms base tick.

use std::time::Duration;

/// Reference frame time of a native animation at 100% rate.
pub const BASE_TICK_MS: u32 = 100;

/// Fastest accepted speed. Anything lower is clamped up to this.
pub const MIN_SPEED_MS: u32 = 10;

/// Slowest accepted speed. Anything higher is clamped down to this.
pub const MAX_SPEED_MS: u32 = 10_000;

/// Speed used before the user picks one.
pub const DEFAULT_SPEED_MS: u32 = 100;

/// Menu presets: label and milliseconds per frame.
pub const SPEED_PRESETS: [(&str, u32); 5] = [
    ("Very slow", 500),
    ("Slow", 250),
    ("Normal", 100),
    ("Fast", 50),
    ("Very fast", 20),
];

/// Milliseconds per frame, clamped to `[MIN_SPEED_MS, MAX_SPEED_MS]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NominalSpeed(u32);

impl Default for NominalSpeed {
    fn default() -> Self {
        Self(DEFAULT_SPEED_MS)
    }
}

impl NominalSpeed {
    /// Create a speed, clamping out-of-range values.
    pub fn new(millis: u32) -> Self {
        let clamped = millis.clamp(MIN_SPEED_MS, MAX_SPEED_MS);
        if clamped != millis {
            tracing::debug!("Speed {}ms clamped to {}ms", millis, clamped);
        }
        Self(clamped)
    }

    pub fn as_millis(self) -> u32 {
        self.0
    }

    /// Interval of the frame-sequence advance timer.
    pub fn interval(self) -> Duration {
        Duration::from_millis(u64::from(self.0))
    }

    /// Native-animation rate in percent of native speed:
    /// `round(100 * BASE_TICK_MS / speed)`.
    pub fn rate_percent(self) -> u32 {
        let numerator = 100 * BASE_TICK_MS;
        // Integer round-half-up; speed is never zero after clamping.
        (2 * numerator + self.0) / (2 * self.0)
    }
}
