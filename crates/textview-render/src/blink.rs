//! Caret blink phase.
//!
//! The host ticks the blink at half the configured period. After a reset
//! the caret stays on for four ticks, then goes off on every third tick.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CaretBlink {
    status: u32,
    on: bool,
}

impl Default for CaretBlink {
    fn default() -> Self {
        Self { status: 0, on: true }
    }
}

impl CaretBlink {
    /// Timer interval for a blink period.
    pub fn interval(period_ms: u64) -> Duration {
        Duration::from_millis(period_ms / 2)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Restarts the cycle with the caret shown.
    pub fn reset(&mut self) {
        self.status = 0;
        self.on = true;
    }

    /// Advances one tick. Returns true if the phase flipped.
    pub fn tick(&mut self) -> bool {
        let on = self.status < 4 || (self.status - 4) % 3 != 0;
        self.status = self.status.saturating_add(1);
        let changed = on != self.on;
        self.on = on;
        changed
    }
}
