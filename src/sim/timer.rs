//! Wall-clock timers
//!
//! Timers count real milliseconds handed in by the host clock, never frames,
//! so spawn cadence and the day/night period hold at any frame rate.

/// Fixed-delay repeating timer
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatingTimer {
    period_ms: f64,
    /// Time left until the next fire
    until_next_ms: f64,
    active: bool,
}

impl RepeatingTimer {
    /// First fire after one full period
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            until_next_ms: period_ms,
            active: true,
        }
    }

    /// First fire on the very next `advance`, then every period
    pub fn immediate(period_ms: f64) -> Self {
        Self {
            period_ms,
            until_next_ms: 0.0,
            active: true,
        }
    }

    /// Advance by `dt_ms` and return how many times the timer fired.
    ///
    /// A long stall fires the timer once per elapsed period.
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        if !self.active || self.period_ms <= 0.0 {
            return 0;
        }
        self.until_next_ms -= dt_ms.max(0.0);
        let mut fired = 0;
        while self.until_next_ms <= 0.0 {
            fired += 1;
            self.until_next_ms += self.period_ms;
        }
        fired
    }

    /// Change the period; a pending fire never moves later than one new period
    pub fn set_period(&mut self, period_ms: f64) {
        self.period_ms = period_ms;
        self.until_next_ms = self.until_next_ms.min(period_ms);
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    pub fn until_next_ms(&self) -> f64 {
        self.until_next_ms
    }

    /// Cancel; no further fires until the owning session is replaced
    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Delayed callback that fires once
#[derive(Debug, Clone, PartialEq)]
pub struct OneShotTimer {
    remaining_ms: f64,
    fired: bool,
}

impl OneShotTimer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            remaining_ms: delay_ms,
            fired: false,
        }
    }

    /// Returns true on the single advance that crosses the delay
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        if self.fired {
            return false;
        }
        self.remaining_ms -= dt_ms.max(0.0);
        if self.remaining_ms <= 0.0 {
            self.fired = true;
            true
        } else {
            false
        }
    }
}
