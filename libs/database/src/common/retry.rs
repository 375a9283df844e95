use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse};

/// Backoff policy for startup connection attempts
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Attempts made after the first failure
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    /// Upper bound on a single wait
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Randomise each wait to 50-100% of its nominal value
    pub use_jitter: bool,
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    fn next_delay(&self, delay_ms: u64) -> u64 {
        ((delay_ms as f64 * self.backoff_multiplier) as u64).min(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 200,
            max_delay_ms: 5_000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Environment variables:
/// - `DB_CONNECT_RETRIES` (optional, default: 5)
/// - `DB_CONNECT_RETRY_DELAY_MS` (optional, default: 200)
#[cfg(feature = "config")]
impl FromEnv for RetryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            max_retries: env_parse("DB_CONNECT_RETRIES", defaults.max_retries)?,
            initial_delay_ms: env_parse("DB_CONNECT_RETRY_DELAY_MS", defaults.initial_delay_ms)?,
            ..defaults
        })
    }
}

/// Run `operation` until it succeeds or the retry budget is spent.
///
/// The last error is returned once `config.max_retries` additional
/// attempts have failed.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay_ms;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(retries = attempt, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) if attempt >= config.max_retries => {
                warn!(attempts = attempt + 1, error = %e, "Giving up");
                return Err(e);
            }
            Err(e) => {
                attempt += 1;
                let wait = if config.use_jitter {
                    apply_jitter(delay)
                } else {
                    delay
                };

                debug!(
                    attempt,
                    max = config.max_retries,
                    error = %e,
                    wait_ms = wait,
                    "Attempt failed, retrying"
                );

                tokio::time::sleep(Duration::from_millis(wait)).await;
                delay = config.next_delay(delay);
            }
        }
    }
}

/// Scale `delay` by a pseudo-random factor in [0.5, 1.0)
fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;

    (delay as f64 * factor) as u64
}

/// [`retry_with_backoff`] with the default policy
pub async fn retry<F, Fut, T, E>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_with_backoff(operation, RetryConfig::default()).await
}
