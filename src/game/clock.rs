use std::time::Instant;

/// Largest frame delta handed to the simulation, in seconds
pub const MAX_FRAME_DELTA: f64 = 1.0 / 30.0;

/// Measures time between frames for the driver loop.
///
/// Deltas are clamped so a stalled terminal or a long pause never turns into
/// a burst of catch-up steps.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick, clamped to `[0, MAX_FRAME_DELTA]`.
    /// The first tick returns zero.
    pub fn tick(&mut self, now: Instant) -> f64 {
        let delta = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last = Some(now);
        delta.min(MAX_FRAME_DELTA)
    }

    /// Forget the interval since the last tick, e.g. when resuming
    pub fn rebase(&mut self, now: Instant) {
        self.last = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(Instant::now()), 0.0);
    }

    #[test]
    fn test_tick_measures_delta() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick(start);

        let delta = clock.tick(start + Duration::from_millis(16));
        assert!((delta - 0.016).abs() < 1e-9);
    }

    #[test]
    fn test_tick_clamps_long_frames() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick(start);

        assert_eq!(clock.tick(start + Duration::from_secs(5)), MAX_FRAME_DELTA);
    }

    #[test]
    fn test_rebase_skips_paused_interval() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick(start);

        let resume = start + Duration::from_secs(10);
        clock.rebase(resume);
        let delta = clock.tick(resume + Duration::from_millis(10));
        assert!((delta - 0.010).abs() < 1e-9);
    }

    #[test]
    fn test_time_going_backwards_is_zero() {
        let mut clock = FrameClock::new();
        let start = Instant::now() + Duration::from_secs(1);
        clock.tick(start);
        assert_eq!(clock.tick(start - Duration::from_millis(5)), 0.0);
    }
}
