// SPDX-License-Identifier: Apache-2.0

//! Retry logic with exponential backoff for transient failures.
//!
//! Provides helpers to detect retryable responses and configure exponential
//! backoff for calls against the Shopify endpoints.

use std::time::Duration;

use backon::ExponentialBuilder;

use crate::config::RetryConfig;

/// Determines if an HTTP status code is retryable.
///
/// Retryable status codes are:
/// - 429 (Too Many Requests / Rate Limited)
/// - 500 (Internal Server Error)
/// - 502 (Bad Gateway)
/// - 503 (Service Unavailable)
/// - 504 (Gateway Timeout)
#[must_use]
pub fn is_retryable_http(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Determines if a GraphQL `errors` payload signals throttling.
///
/// Shopify reports cost-based rate limiting as a regular error entry
/// (`"message": "Throttled"`, `"extensions": {"code": "THROTTLED"}`), so the
/// check is a case-insensitive substring match on the serialized payload.
#[must_use]
pub fn is_throttle_message(serialized_errors: &str) -> bool {
    serialized_errors.to_lowercase().contains("throttle")
}

/// Backoff policy for a single remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: usize,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Randomize delays.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(20),
            jitter: false,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            jitter: config.jitter,
        }
    }
}

impl RetryPolicy {
    /// Creates a configured exponential backoff builder.
    ///
    /// - Factor: 2 (delay doubles after each retry)
    /// - Min delay: `initial_delay`
    /// - Max delay: `max_delay`
    /// - Max times: `max_attempts - 1` retries after the first attempt
    #[must_use]
    pub fn backoff(&self) -> ExponentialBuilder {
        let builder = ExponentialBuilder::default()
            .with_factor(2.0)
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts.saturating_sub(1));
        if self.jitter {
            builder.with_jitter()
        } else {
            builder
        }
    }
}

#[cfg(test)]
mod tests {
    use backon::BackoffBuilder;

    use super::*;

    #[test]
    fn test_is_retryable_http_retryable_codes() {
        assert!(is_retryable_http(429));
        assert!(is_retryable_http(500));
        assert!(is_retryable_http(502));
        assert!(is_retryable_http(503));
        assert!(is_retryable_http(504));
    }

    #[test]
    fn test_is_retryable_http_non_retryable_codes() {
        assert!(!is_retryable_http(400));
        assert!(!is_retryable_http(401));
        assert!(!is_retryable_http(403));
        assert!(!is_retryable_http(404));
        assert!(!is_retryable_http(200));
        assert!(!is_retryable_http(501));
    }

    #[test]
    fn test_throttle_message_detection() {
        assert!(is_throttle_message(r#"[{"message":"Throttled"}]"#));
        assert!(is_throttle_message(r#"[{"extensions":{"code":"THROTTLED"}}]"#));
        assert!(!is_throttle_message(r#"[{"message":"Field 'foo' doesn't exist"}]"#));
    }

    #[test]
    fn test_default_policy_delays_double_and_cap() {
        let delays: Vec<u64> = RetryPolicy::default()
            .backoff()
            .build()
            .map(|d| d.as_secs())
            .collect();

        assert_eq!(delays, vec![1, 2, 4, 8, 16]);
    }

    #[test]
    fn test_delays_capped_at_max() {
        let policy = RetryPolicy {
            max_attempts: 8,
            ..RetryPolicy::default()
        };
        let delays: Vec<u64> = policy.backoff().build().map(|d| d.as_secs()).collect();

        assert_eq!(delays, vec![1, 2, 4, 8, 16, 20, 20]);
    }

    #[test]
    fn test_single_attempt_means_no_retries() {
        let policy = RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff().build().count(), 0);
    }

    #[test]
    fn test_policy_from_config() {
        let config = RetryConfig {
            max_attempts: 0,
            initial_delay_ms: 250,
            max_delay_ms: 5_000,
            jitter: true,
        };
        let policy = RetryPolicy::from(&config);

        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.initial_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Duration::from_secs(5));
        assert!(policy.jitter);
    }
}
