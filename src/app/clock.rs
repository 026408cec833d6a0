//! Monotonic animation time source

use std::time::{Duration, Instant};

/// Elapsed time since loop start.
///
/// The wall-clock start is captured exactly once; every read derives from
/// the same monotonic source, so elapsed time never rewinds. `Duration`
/// has nanosecond resolution over centuries, so sessions of any realistic
/// length are safe.
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    start: Instant,
}

impl AnimationClock {
    /// Captures the start timestamp. Call at loop entry.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
