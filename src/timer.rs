use std::time::{Duration, Instant};

/// Wall-clock stopwatch with lap logging.
pub struct Timer {
    start: Instant,
    last: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    /// Time since the timer was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Logs `msg` with the time since the previous lap at debug level and starts a new lap.
    pub fn log<T: std::fmt::Debug>(&mut self, msg: T) -> Duration {
        let now = Instant::now();
        let lap = now.duration_since(self.last);
        self.last = now;
        log::debug!("{:?}: {:?}", msg, lap);
        lap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_laps_do_not_exceed_total() {
        let mut timer = Timer::new();
        let first = timer.log("first");
        let second = timer.log("second");
        assert!(first + second <= timer.elapsed());
    }
}
