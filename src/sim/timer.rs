//! Wall-clock interval timer
//!
//! Spawn and difficulty cadence run on the monotonic clock, independent of
//! frame rate. The frame loop polls with the current time and gets back how
//! many periods elapsed.

use std::time::Duration;

/// Maximum firings reported by a single poll; older missed periods are dropped
pub const MAX_TIMER_CATCH_UP: u32 = 4;

#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: Duration,
    next_due: Duration,
    cancelled: bool,
}

impl IntervalTimer {
    /// A zero period never fires
    pub fn new(period: Duration, now: Duration) -> Self {
        Self {
            period,
            next_due: now + period,
            cancelled: false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Stop for good. Later polls never fire.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Restart the cadence from `now`
    pub fn resync(&mut self, now: Duration) {
        self.next_due = now + self.period;
    }

    /// Count the periods that elapsed up to `now`
    pub fn poll(&mut self, now: Duration) -> u32 {
        if self.cancelled || self.period.is_zero() {
            return 0;
        }

        let mut fired = 0;
        while now >= self.next_due {
            if fired == MAX_TIMER_CATCH_UP {
                // Skip the backlog and keep the phase
                let behind = (now - self.next_due).as_nanos() / self.period.as_nanos();
                self.next_due += self.period * (behind as u32 + 1);
                break;
            }
            self.next_due += self.period;
            fired += 1;
        }
        fired
    }
}
