//! Monotonic engine clock
//!
//! Wall clocks can step backwards under NTP adjustment. Order and trade
//! timestamps drive time priority and tiebreaks, so the engine issues
//! timestamps through this clock: if the wall clock has not advanced past
//! the last issued value, the next timestamp is last + 1ns.

use chrono::{DateTime, Duration, Utc};

/// Strictly increasing timestamp source
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    last: DateTime<Utc>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { last: Utc::now() }
    }

    /// Issue the next timestamp, strictly greater than all previous ones
    pub fn now(&mut self) -> DateTime<Utc> {
        let wall = Utc::now();
        let next = if wall > self.last {
            wall
        } else {
            self.last + Duration::nanoseconds(1)
        };
        self.last = next;
        next
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
