//! Rate-limited side effects.
//!
//! A persistently failing provisioner would otherwise emit one log line per
//! attempt. `Every` gates emission to at most once per window.

use std::time::{Duration, Instant};

/// Gate that opens at most once per interval.
#[derive(Debug)]
pub struct Every {
    interval: Duration,
    last: Option<Instant>,
}

impl Every {
    /// Create a gate with the given minimum interval between openings.
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    /// Returns true when the gate opens; the caller then performs its side
    /// effect. The first call always opens.
    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
