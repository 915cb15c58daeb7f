use crate::error::{Result, ScannerError};
use rand::Rng;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Spreads outbound calls so the long-run request rate stays inside a
/// configured requests-per-minute band.
///
/// Each `wait()` suspends until the permit time recorded by the previous
/// call, then draws a uniformly random pause in `[60/max_rpm, 60/min_rpm]`
/// seconds and records it as the earliest permit for the next call. The
/// permit timestamp is owned by the instance, so independent runs (and tests)
/// never interfere with each other.
#[derive(Debug)]
pub struct MinuteRateLimiter {
    min_interval: Duration,
    max_interval: Duration,
    next_earliest: Option<Instant>,
}

impl MinuteRateLimiter {
    pub fn new(min_rpm: u32, max_rpm: u32) -> Result<Self> {
        if min_rpm == 0 || max_rpm == 0 || max_rpm < min_rpm {
            return Err(ScannerError::Config(format!(
                "invalid RPM band {min_rpm}..{max_rpm}: expected 0 < min_rpm <= max_rpm"
            )));
        }
        Ok(Self {
            min_interval: Duration::from_secs_f64(60.0 / f64::from(max_rpm)),
            max_interval: Duration::from_secs_f64(60.0 / f64::from(min_rpm)),
            next_earliest: None,
        })
    }

    /// Suspends until the recorded permit time, then schedules the next one.
    ///
    /// The first call returns immediately. Suspension is a tokio sleep: the
    /// task yields without blocking the executor.
    pub async fn wait(&mut self) {
        if let Some(at) = self.next_earliest {
            sleep_until(at).await;
        }
        let interval = rand::thread_rng().gen_range(self.min_interval..=self.max_interval);
        trace!(?interval, "scheduled next request permit");
        self.next_earliest = Some(Instant::now() + interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_rpm_bands() {
        assert!(MinuteRateLimiter::new(0, 15).is_err());
        assert!(MinuteRateLimiter::new(10, 0).is_err());
        assert!(MinuteRateLimiter::new(0, 0).is_err());
        assert!(MinuteRateLimiter::new(15, 10).is_err());
    }

    #[test]
    fn accepts_valid_rpm_bands() {
        assert!(MinuteRateLimiter::new(10, 15).is_ok());
        assert!(MinuteRateLimiter::new(12, 12).is_ok());
        assert!(MinuteRateLimiter::new(1, 600).is_ok());
    }

    #[test]
    fn derives_interval_band_from_rpm() {
        let limiter = MinuteRateLimiter::new(10, 15).unwrap();
        assert_eq!(limiter.min_interval, Duration::from_secs(4));
        assert_eq!(limiter.max_interval, Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn first_wait_returns_immediately() {
        let mut limiter = MinuteRateLimiter::new(10, 15).unwrap();
        let start = Instant::now();
        limiter.wait().await;
        assert_eq!(Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn spaces_repeated_waits_within_the_band() {
        let mut limiter = MinuteRateLimiter::new(10, 15).unwrap();
        limiter.wait().await;
        let mut prev = Instant::now();
        for _ in 0..50 {
            limiter.wait().await;
            let gap = Instant::now() - prev;
            assert!(
                gap >= Duration::from_secs(4),
                "gap {gap:?} shorter than 60/max_rpm"
            );
            assert!(
                gap <= Duration::from_secs(6) + Duration::from_millis(1),
                "gap {gap:?} longer than 60/min_rpm"
            );
            prev = Instant::now();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_sleep_after_a_long_idle_gap() {
        let mut limiter = MinuteRateLimiter::new(10, 15).unwrap();
        limiter.wait().await;
        tokio::time::advance(Duration::from_secs(60)).await;
        let start = Instant::now();
        limiter.wait().await;
        assert_eq!(Instant::now(), start);
    }
}
