use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// A boolean-producing step that can be re-checked until it is satisfied.
///
/// Implementations perform one attempt per `check` call; transient failures
/// are reported as `Ok(false)` so the poller retries them, while fatal
/// conditions surface through `Err` and stop the poll immediately.
#[async_trait]
pub trait Condition: Send {
    type Error: Send;

    async fn check(&mut self) -> Result<bool, Self::Error>;
}

#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub interval: Duration,
    pub timeout: Option<Duration>,
}

impl PollOptions {
    /// Retry indefinitely, sleeping `interval` between checks.
    pub fn forever(interval: Duration) -> Self {
        PollOptions {
            interval,
            timeout: None,
        }
    }

    pub fn with_timeout(interval: Duration, timeout: Duration) -> Self {
        PollOptions {
            interval,
            timeout: Some(timeout),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollError<E> {
    #[error("condition not satisfied within {timeout:?} (waited {waited:?})")]
    Timeout { waited: Duration, timeout: Duration },

    #[error("condition step failed: {0}")]
    Step(E),
}

/// Wait for a condition to be satisfied, sleeping in-between checks.
///
/// The sleep interval is fixed rather than backed off: chain state changes
/// slowly and repeated read-only checks are cheap. Without a timeout this
/// blocks until the condition reports satisfied, yielding to the runtime at
/// every sleep and at every suspension point inside the condition itself.
pub async fn wait_for_condition<C>(
    condition: &mut C,
    options: PollOptions,
) -> Result<(), PollError<C::Error>>
where
    C: Condition + ?Sized,
{
    let started = Instant::now();

    loop {
        if condition.check().await.map_err(PollError::Step)? {
            return Ok(());
        }
        if let Some(timeout) = options.timeout {
            let waited = started.elapsed();
            if waited >= timeout {
                return Err(PollError::Timeout { waited, timeout });
            }
        }
        debug!("condition not satisfied; retrying in {:?}", options.interval);
        sleep(options.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    struct AfterAttempts {
        remaining: u32,
    }

    #[async_trait]
    impl Condition for AfterAttempts {
        type Error = Infallible;

        async fn check(&mut self) -> Result<bool, Infallible> {
            if self.remaining == 0 {
                return Ok(true);
            }
            self.remaining -= 1;
            Ok(false)
        }
    }

    #[test]
    fn immediately_satisfied_condition_returns_without_sleeping() {
        tokio_test::block_on(async {
            let mut condition = AfterAttempts { remaining: 0 };
            let options = PollOptions::forever(Duration::from_secs(3600));
            wait_for_condition(&mut condition, options)
                .await
                .expect("condition should be satisfied on the first check");
        });
    }

    #[test]
    fn unsatisfied_checks_are_retried() {
        tokio_test::block_on(async {
            let mut condition = AfterAttempts { remaining: 2 };
            let options = PollOptions::forever(Duration::from_millis(1));
            wait_for_condition(&mut condition, options)
                .await
                .expect("condition should eventually be satisfied");
            assert_eq!(condition.remaining, 0);
        });
    }
}
