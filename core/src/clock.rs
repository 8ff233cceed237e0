//! Frame pacing
//!
//! The display refresh callback fires at whatever rate the host delivers
//! (often 60Hz or faster). [`FrameClock`] decides which of those callbacks
//! become frame ticks so the engine runs at a bounded rate.

use std::time::{Duration, Instant};

/// Default target frame rate in Hz
pub const DEFAULT_FRAME_RATE: u32 = 24;

/// Drift-corrected frame pacer
///
/// On acceptance the sub-interval remainder of the elapsed time is carried
/// forward instead of dropped, so irregular callback timing does not slow the
/// long-run frame rate.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_interval: Duration,
    last_accepted: Option<Instant>,
    accepted_frames: u64,
}

impl FrameClock {
    /// Create a clock targeting `frame_rate` frames per second
    ///
    /// The first call to [`should_render`](Self::should_render) establishes the
    /// reference time and is rejected.
    pub fn new(frame_rate: u32) -> Self {
        let frame_rate = frame_rate.max(1);
        Self {
            frame_interval: Duration::from_secs_f64(1.0 / frame_rate as f64),
            last_accepted: None,
            accepted_frames: 0,
        }
    }

    /// Create a clock whose reference time is already set
    pub fn started_at(frame_rate: u32, start: Instant) -> Self {
        let mut clock = Self::new(frame_rate);
        clock.last_accepted = Some(start);
        clock
    }

    /// Decide whether the callback at `now` produces a frame
    ///
    /// Rejection leaves the clock untouched. Timestamps earlier than the last
    /// accepted time are treated as zero elapsed time.
    pub fn should_render(&mut self, now: Instant) -> bool {
        let Some(last) = self.last_accepted else {
            self.last_accepted = Some(now);
            return false;
        };

        let delta = now.saturating_duration_since(last);
        if delta < self.frame_interval {
            return false;
        }

        let residual = delta.as_nanos() % self.frame_interval.as_nanos();
        // residual < frame_interval, which always fits in u64 nanoseconds
        self.last_accepted = Some(now - Duration::from_nanos(residual as u64));
        self.accepted_frames += 1;
        true
    }

    /// Earliest instant at which the next frame can be accepted
    ///
    /// `None` until the reference time has been established.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.last_accepted.map(|last| last + self.frame_interval)
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }

    /// Number of callbacks accepted as frame ticks so far
    pub fn accepted_frames(&self) -> u64 {
        self.accepted_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_first_callback_sets_reference_and_rejects() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(24);
        assert!(!clock.should_render(t0));
        assert_eq!(clock.last_accepted(), Some(t0));
        assert_eq!(clock.accepted_frames(), 0);
    }

    #[test]
    fn test_rejects_before_interval_without_mutation() {
        let t0 = Instant::now();
        let mut clock = FrameClock::started_at(10, t0);
        assert!(!clock.should_render(t0 + ms(99)));
        assert_eq!(clock.last_accepted(), Some(t0));
    }

    #[test]
    fn test_accepts_at_interval() {
        let t0 = Instant::now();
        let mut clock = FrameClock::started_at(10, t0);
        assert!(clock.should_render(t0 + ms(100)));
        assert_eq!(clock.last_accepted(), Some(t0 + ms(100)));
        assert_eq!(clock.accepted_frames(), 1);
    }

    #[test]
    fn test_acceptance_keeps_residual() {
        let t0 = Instant::now();
        let mut clock = FrameClock::started_at(10, t0);
        // 130ms elapsed: one interval plus 30ms carried forward
        assert!(clock.should_render(t0 + ms(130)));
        assert_eq!(clock.last_accepted(), Some(t0 + ms(100)));
        // Next frame is due 70ms later, not 100ms later
        assert!(clock.should_render(t0 + ms(200)));
    }

    #[test]
    fn test_long_stall_yields_single_frame() {
        let t0 = Instant::now();
        let mut clock = FrameClock::started_at(10, t0);
        assert!(clock.should_render(t0 + ms(1050)));
        assert_eq!(clock.last_accepted(), Some(t0 + ms(1000)));
        assert_eq!(clock.accepted_frames(), 1);
        assert!(!clock.should_render(t0 + ms(1090)));
    }

    #[test]
    fn test_backwards_timestamp_rejected() {
        let t0 = Instant::now() + ms(500);
        let mut clock = FrameClock::started_at(10, t0);
        assert!(!clock.should_render(t0 - ms(200)));
        assert_eq!(clock.last_accepted(), Some(t0));
    }

    #[test]
    fn test_next_deadline() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(10);
        assert_eq!(clock.next_deadline(), None);
        clock.should_render(t0);
        assert_eq!(clock.next_deadline(), Some(t0 + ms(100)));
    }

    #[test]
    fn test_zero_rate_clamped() {
        let clock = FrameClock::new(0);
        assert_eq!(clock.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_pacing_matches_elapsed_over_interval() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(24);
        let interval = clock.frame_interval();

        let total = Duration::from_secs(10);
        let mut latest = t0;
        let mut elapsed = Duration::ZERO;
        while elapsed <= total {
            latest = t0 + elapsed;
            clock.should_render(latest);
            elapsed += ms(1);
        }

        let expected = (total.as_nanos() / interval.as_nanos()) as i64;
        let accepted = clock.accepted_frames() as i64;
        assert!(
            (accepted - expected).abs() <= 1,
            "accepted {accepted}, expected {expected}"
        );
        assert!(clock.last_accepted().unwrap() <= latest);
    }

    #[test]
    fn test_jittered_callbacks_converge_to_target_rate() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(24);
        let interval = clock.frame_interval();

        // xorshift64: callback gaps uniform in [0, interval/2)
        let max_gap = interval.as_nanos() as u64 / 2;
        let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
        let mut next_gap = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed % max_gap
        };

        let mut now = t0;
        clock.should_render(now);
        let total = Duration::from_secs(600);
        while now - t0 < total {
            now += Duration::from_nanos(next_gap());
            clock.should_render(now);
        }

        let span = (now - t0).as_secs_f64();
        let rate = clock.accepted_frames() as f64 / span;
        assert!((rate - 24.0).abs() < 0.05, "rate {rate}");
    }
}
