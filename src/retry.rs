//! Retry logic for the composite speed test.
//!
//! A failed composite run is repeated as a whole, with a fixed pause between
//! attempts.

use log::{debug, warn};
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Default number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between two attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, delay: DEFAULT_DELAY }
    }
}

impl RetryConfig {
    /// Create a new retry configuration.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }

    fn total_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Error that wraps the last error from a series of retry attempts.
#[derive(Debug)]
pub struct RetryError<E> {
    /// The last error that occurred.
    pub last_error: E,
    /// Number of attempts made.
    pub attempts: u32,
    /// Description of the operation that failed.
    pub operation: String,
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed after {} attempts: {}",
            self.operation, self.attempts, self.last_error
        )
    }
}

impl<E: Error + 'static> Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.last_error)
    }
}

/// Execute an async operation, retrying on failure.
///
/// Sleeps `config.delay` between attempts, so `n` attempts cost exactly
/// `n - 1` pauses. The last error is handed back when every attempt fails.
pub async fn retry_async<T, E, F, Fut>(
    config: &RetryConfig,
    operation_name: &str,
    mut f: F,
) -> Result<T, RetryError<E>>
where
    E: fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let total_attempts = config.total_attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match f().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("{}: Succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(e) if attempt < total_attempts => {
                warn!(
                    "{}: Attempt {}/{} failed: {}",
                    operation_name, attempt, total_attempts, e
                );
                debug!(
                    "{}: Retrying after {:?}",
                    operation_name, config.delay
                );
                sleep(config.delay).await;
            }
            Err(e) => {
                warn!(
                    "{}: All {} attempts failed. Last error: {}",
                    operation_name, total_attempts, e
                );
                return Err(RetryError {
                    last_error: e,
                    attempts: total_attempts,
                    operation: operation_name.to_string(),
                });
            }
        }
    }
}
