use std::time::{Duration, Instant};

/// Monotonic time source, read when a scenario is shown and when it is answered.
pub trait Clock {
    /// Time elapsed since an arbitrary but fixed origin.
    fn now(&self) -> Duration;
}

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
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
#[cfg(test)]
#[derive(Default)]
pub struct ManualClock {
    now: std::cell::Cell<Duration>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_secs(&self, secs: f64) {
        self.now.set(self.now.get() + Duration::from_secs_f64(secs));
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_never_goes_backwards() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn manual_clock_advances_on_demand() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance_secs(2.5);
        assert_eq!(clock.now(), Duration::from_millis(2500));
    }
}
