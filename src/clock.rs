// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    /// Time since the previous tick; zero on the first tick.
    pub delta: Duration,
    /// Time since the first tick.
    pub elapsed: Duration,
}

/// Wall-clock tracker for one scene session.
///
/// The first [`SceneClock::tick`] pins the start. A host clock that goes
/// backwards yields a zero delta and leaves `elapsed` where it was.
#[derive(Clone, Debug, Default)]
pub struct SceneClock {
    start: Option<Instant>,
    last: Option<Instant>,
    elapsed: Duration,
}

impl SceneClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, now: Instant) -> Tick {
        let start = *self.start.get_or_insert(now);
        let last = self.last.unwrap_or(now);

        if now < last {
            log::debug!(
                "clock went backwards by {:?}; clamping delta to zero",
                last - now
            );
        }
        let delta = now.saturating_duration_since(last);
        self.last = Some(now.max(last));
        self.elapsed = self.elapsed.max(now.saturating_duration_since(start));

        Tick {
            delta,
            elapsed: self.elapsed,
        }
    }

}

/// `value / over`, clamped to `0..=1`. A zero span counts as already done.
///
/// Divides whole nanoseconds so the ratio is the correctly rounded `f64`
/// of the exact fraction.
pub fn progress(value: Duration, over: Duration) -> f64 {
    if over.is_zero() {
        return 1.0;
    }
    (value.as_nanos() as f64 / over.as_nanos() as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_has_zero_delta_and_elapsed() {
        let mut clock = SceneClock::new();
        let t0 = Instant::now();
        let tick = clock.tick(t0);
        assert_eq!(tick.delta, Duration::ZERO);
        assert_eq!(tick.elapsed, Duration::ZERO);
    }

    #[test]
    fn delta_and_elapsed_follow_the_host_clock() {
        let mut clock = SceneClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        let tick = clock.tick(t0 + Duration::from_millis(16));
        assert_eq!(tick.delta, Duration::from_millis(16));
        assert_eq!(tick.elapsed, Duration::from_millis(16));

        let tick = clock.tick(t0 + Duration::from_millis(50));
        assert_eq!(tick.delta, Duration::from_millis(34));
        assert_eq!(tick.elapsed, Duration::from_millis(50));
    }

    #[test]
    fn backwards_clock_is_clamped() {
        let mut clock = SceneClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        clock.tick(t0 + Duration::from_millis(100));

        let tick = clock.tick(t0 + Duration::from_millis(40));
        assert_eq!(tick.delta, Duration::ZERO);
        assert_eq!(tick.elapsed, Duration::from_millis(100));

        let tick = clock.tick(t0 + Duration::from_millis(120));
        assert_eq!(tick.delta, Duration::from_millis(20));
        assert_eq!(tick.elapsed, Duration::from_millis(120));
    }

    #[test]
    fn progress_clamps_to_unit_range() {
        let over = Duration::from_millis(8000);
        assert_eq!(progress(Duration::ZERO, over), 0.0);
        assert_eq!(progress(Duration::from_millis(4000), over), 0.5);
        assert_eq!(progress(Duration::from_millis(8000), over), 1.0);
        assert_eq!(progress(Duration::from_secs(60), over), 1.0);
        assert_eq!(progress(Duration::from_millis(1), Duration::ZERO), 1.0);
    }

    #[test]
    fn progress_is_the_plain_millisecond_ratio() {
        let over = Duration::from_millis(8000);
        assert_eq!(progress(Duration::from_millis(5440), over), 5440.0 / 8000.0);
        assert_eq!(progress(Duration::from_millis(3), over), 3.0 / 8000.0);
    }
}
