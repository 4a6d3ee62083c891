//! Monotonic clock implementations

use std::rc::Rc;

use crate::game::Clock;

/// Browser clock backed by `performance.now()`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct PerformanceClock;

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map_or(0.0, |p| p.now() / 1000.0)
    }
}

/// Native clock backed by `Instant`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct InstantClock {
    epoch: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for InstantClock {
    fn default() -> Self {
        Self {
            epoch: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for InstantClock {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// The platform's default monotonic clock
pub fn system_clock() -> Rc<dyn Clock> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(PerformanceClock)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(InstantClock::default())
    }
}
