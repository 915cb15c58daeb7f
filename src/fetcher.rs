use crate::error::{Result, ScannerError};
use crate::rate_limiter::MinuteRateLimiter;
use crate::types::{BanRecord, BansApi};
use metrics::{counter, histogram};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Retry limits applied to each batch.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_backoff: Duration,
}

/// What the fetch loop does after a failed attempt.
#[derive(Debug)]
pub enum RetryStep {
    /// Transient failure with attempts left: pause, then try again.
    Backoff(Duration),
    /// Terminal: the failure is not transient, or attempts ran out.
    GiveUp,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_backoff: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(ScannerError::Config("retry count must be at least 1".into()));
        }
        Ok(Self {
            max_attempts,
            base_backoff,
        })
    }

    /// Backoff grows linearly with the attempt number.
    pub fn evaluate(&self, error: &ScannerError, attempt: u32) -> RetryStep {
        let transient = matches!(
            error,
            ScannerError::RateLimited | ScannerError::Transport(_)
        );
        if transient && attempt < self.max_attempts {
            RetryStep::Backoff(self.base_backoff * attempt)
        } else {
            RetryStep::GiveUp
        }
    }
}

/// Fetches ban records for a full identifier list in bounded-size batches,
/// one batch in flight at a time, throttled by a [`MinuteRateLimiter`].
pub struct BatchFetcher<A> {
    api: A,
    limiter: MinuteRateLimiter,
    retry: RetryPolicy,
}

impl<A: BansApi> BatchFetcher<A> {
    pub fn new(api: A, limiter: MinuteRateLimiter, retry: RetryPolicy) -> Self {
        Self {
            api,
            limiter,
            retry,
        }
    }

    /// Fetches ban records for every identifier, `batch_size` per request.
    ///
    /// Batches partition the input exactly and run strictly in order, so the
    /// returned records follow batch submission order. A batch that exhausts
    /// its retries aborts the whole run; no partial aggregate is returned.
    #[instrument(skip(self, steam_ids), fields(ids = steam_ids.len()))]
    pub async fn fetch_all(
        &mut self,
        steam_ids: &[String],
        batch_size: usize,
    ) -> Result<Vec<BanRecord>> {
        if batch_size == 0 {
            return Err(ScannerError::Config("batch size must be at least 1".into()));
        }
        let total_batches = (steam_ids.len() + batch_size - 1) / batch_size;
        let mut aggregate = Vec::with_capacity(steam_ids.len());
        for (index, batch) in steam_ids.chunks(batch_size).enumerate() {
            let started = std::time::Instant::now();
            let records = self.fetch_batch(batch).await?;
            histogram!("bans_batch_fetch_duration_seconds").record(started.elapsed().as_secs_f64());
            counter!("bans_records_fetched_total").increment(records.len() as u64);
            info!(
                batch = index + 1,
                total_batches,
                records = records.len(),
                total = aggregate.len() + records.len(),
                "batch fetched"
            );
            aggregate.extend(records);
        }
        Ok(aggregate)
    }

    /// One batch through the retry state machine. The rate limiter is
    /// consulted before every attempt, retries included.
    async fn fetch_batch(&mut self, batch: &[String]) -> Result<Vec<BanRecord>> {
        let mut attempt = 1;
        loop {
            self.limiter.wait().await;
            match self.api.get_player_bans(batch).await {
                Ok(records) => {
                    counter!("bans_requests_success_total").increment(1);
                    return Ok(records);
                }
                Err(error) => {
                    counter!("bans_requests_error_total").increment(1);
                    match self.retry.evaluate(&error, attempt) {
                        RetryStep::Backoff(delay) => {
                            warn!(attempt, ?delay, %error, "attempt failed, backing off");
                            counter!("bans_retries_total").increment(1);
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        RetryStep::GiveUp => {
                            return Err(match error {
                                ScannerError::RateLimited | ScannerError::Transport(_) => {
                                    ScannerError::FetchFailed {
                                        attempts: attempt,
                                        message: error.to_string(),
                                    }
                                }
                                other => other,
                            });
                        }
                    }
                }
            }
        }
    }
}
