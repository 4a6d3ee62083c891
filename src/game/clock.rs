//! Monotonic clock abstraction
//!
//! The round logic never reads wall time itself; callers sample a `Clock`
//! and pass timestamps in. Tests drive a `ManualClock` instead of sleeping.

use std::cell::Cell;
use std::rc::Rc;

/// Source of monotonic timestamps in seconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// Hand-cranked clock for tests
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `secs`
    pub fn advance(&self, secs: f64) {
        self.time.set(self.time.get() + secs);
    }

    pub fn set(&self, secs: f64) {
        self.time.set(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.time.get()
    }
}
