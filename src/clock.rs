//! Time sources
//!
//! The session reads "now" from an injected [`Clock`], once per action, and
//! threads that instant through scheduling. [`ManualClock`] lets tests
//! simulate time.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Seconds on the synthesis engine's time axis.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock, counting seconds since construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to. Clones share the same time.
///
/// # Example
/// ```
/// use chordjam::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1.0);
/// let handle = clock.clone();
/// handle.advance(2.5);
/// assert_eq!(clock.now(), 3.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            time: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, time: f64) {
        self.time.set(time);
    }

    pub fn advance(&self, seconds: f64) {
        self.time.set(self.time.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.time.get()
    }
}
