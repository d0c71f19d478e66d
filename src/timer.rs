use std::time::Duration;

/// Steps carried over after a stall. Anything beyond is dropped, not
/// replayed as a burst.
const MAX_BACKLOG: u32 = 2;

/// Fixed-step accumulator: fires once per `interval` of measured time,
/// regardless of how many frames that took.
#[derive(Debug, Clone)]
pub struct StepTimer {
    interval: Duration,
    elapsed: Duration,
}

impl StepTimer {
    /// A primed timer: the first poll fires immediately.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: interval,
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = self.interval;
    }

    /// Start counting from zero: the next step is a full interval away.
    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Consume one due step, if any. At most one step per call.
    pub fn poll(&mut self) -> bool {
        if self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            true
        } else {
            false
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.interval * MAX_BACKLOG);
    }
}
