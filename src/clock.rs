//! Fixed-cadence tick driver
//!
//! The clock is polled by the host loop (animation frames in the browser,
//! a sleep loop natively) with a millisecond timestamp. It fires at most one
//! tick per poll and never queues a backlog: a late poll fires once and the
//! schedule moves on to the next slot. Time itself never reaches the
//! simulation, which counts ticks.

use crate::consts::{FRAME_RATE_HZ, GRID_STEP_MS};
use crate::sim::GameId;

/// Polls this close to a slot already count as on time
const EARLY_TOLERANCE_MS: f64 = 1.0;

/// Interval between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRate {
    pub period_ms: f64,
}

impl TickRate {
    pub fn hz(hz: u32) -> Self {
        Self {
            period_ms: 1000.0 / hz.max(1) as f64,
        }
    }

    pub fn every_ms(ms: u64) -> Self {
        Self {
            period_ms: ms.max(1) as f64,
        }
    }
}

impl GameId {
    /// Continuous games animate at 60 Hz; the grid game steps slower
    pub fn tick_rate(&self) -> TickRate {
        match self {
            GameId::Pipes | GameId::Racer => TickRate::hz(FRAME_RATE_HZ),
            GameId::Snake => TickRate::every_ms(GRID_STEP_MS),
        }
    }
}

/// Start/stop tick scheduler
#[derive(Debug, Clone)]
pub struct Clock {
    rate: TickRate,
    next_due: Option<f64>,
    fired: u64,
}

impl Clock {
    pub fn new(rate: TickRate) -> Self {
        Self {
            rate,
            next_due: None,
            fired: 0,
        }
    }

    pub fn rate(&self) -> TickRate {
        self.rate
    }

    /// Begin ticking; the first tick is due one period after `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.next_due = Some(now_ms + self.rate.period_ms);
    }

    /// After this returns no poll fires until `start` is called again
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Ticks fired since creation
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// True if a tick is due at `now_ms`. Missed slots are skipped, not
    /// replayed.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now_ms + EARLY_TOLERANCE_MS < due {
            return false;
        }

        let period = self.rate.period_ms;
        let mut next = due + period;
        if next <= now_ms {
            // Fell behind by whole slots: resume from the next slot after now
            let behind = ((now_ms - due) / period).floor();
            next = due + (behind + 1.0) * period;
        }
        self.next_due = Some(next);
        self.fired += 1;
        true
    }

    /// Time until the next tick, None when stopped
    pub fn until_next(&self, now_ms: f64) -> Option<f64> {
        self.next_due.map(|due| (due - now_ms).max(0.0))
    }
}
