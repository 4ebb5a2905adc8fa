//! Retry with exponential back-off and jitter for catalog requests.
//!
//! Only transient failures are retried. A 404 or a malformed body is
//! returned immediately since repeating the request cannot change it.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Retriable: 429, timeouts, connection failures, and 5xx responses.
/// Builder, redirect and body-decode errors are returned as-is.
fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::RateLimited { .. } => true,
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        ClientError::NotFound { .. }
        | ClientError::Deserialize { .. }
        | ClientError::InvalidBaseUrl { .. } => false,
    }
}

/// Wait before retry number `attempt` (1-based).
///
/// Exponential back-off `backoff_base_ms * 2^(attempt-1)` scaled by
/// `jitter`. A 429 waits at least its `Retry-After`. Capped at 30 s.
fn retry_delay_ms(err: &ClientError, attempt: u32, backoff_base_ms: u64, jitter: f64) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (computed.min(MAX_DELAY_MS) as f64 * jitter) as u64;
    let floor_ms = match err {
        ClientError::RateLimited {
            retry_after_secs, ..
        } => retry_after_secs.saturating_mul(1_000),
        _ => 0,
    };
    jittered.max(floor_ms).min(MAX_DELAY_MS)
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Jitter is a random factor in `[0.75, 1.25)` on the back-off part of the delay.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }
        attempt += 1;
        let jitter = rand::random::<f64>() * 0.5 + 0.75;
        let delay_ms = retry_delay_ms(&err, attempt, backoff_base_ms, jitter);
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms,
            error = %err,
            "transient catalog error, retrying"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn server_error() -> ClientError {
        ClientError::UnexpectedStatus {
            status: 503,
            url: "http://catalog.test/api/products/1".to_owned(),
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ClientError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_server_errors_until_success() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(server_error())
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result: Result<(), _> = retry_with_backoff(2, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::RateLimited {
                    url: "http://catalog.test".to_owned(),
                    retry_after_secs: 0,
                })
            }
        })
        .await;
        assert!(matches!(result, Err(ClientError::RateLimited { .. })));
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result: Result<(), _> = retry_with_backoff(5, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::NotFound {
                    resource: "/products/1".to_owned(),
                })
            }
        })
        .await;
        assert!(matches!(result, Err(ClientError::NotFound { .. })));
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn client_errors_are_not_retriable() {
        assert!(!is_retriable(&ClientError::UnexpectedStatus {
            status: 400,
            url: String::new(),
        }));
        assert!(is_retriable(&server_error()));
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let err = server_error();
        assert_eq!(retry_delay_ms(&err, 1, 500, 1.0), 500);
        assert_eq!(retry_delay_ms(&err, 2, 500, 1.0), 1_000);
        assert_eq!(retry_delay_ms(&err, 3, 500, 1.0), 2_000);
        assert_eq!(retry_delay_ms(&err, 2, 500, 0.75), 750);
    }

    #[test]
    fn delay_is_capped() {
        assert_eq!(retry_delay_ms(&server_error(), 12, 10_000, 1.25), MAX_DELAY_MS);
    }

    #[test]
    fn rate_limit_waits_at_least_retry_after() {
        let err = ClientError::RateLimited {
            url: "http://catalog.test".to_owned(),
            retry_after_secs: 7,
        };
        assert_eq!(retry_delay_ms(&err, 1, 500, 1.0), 7_000);
        // back-off already longer than Retry-After
        assert_eq!(retry_delay_ms(&err, 5, 1_000, 1.0), 16_000);
        // missing header defaults to 60 s upstream, still capped
        let default_wait = ClientError::RateLimited {
            url: String::new(),
            retry_after_secs: 60,
        };
        assert_eq!(retry_delay_ms(&default_wait, 1, 0, 1.0), MAX_DELAY_MS);
    }

    #[tokio::test]
    async fn builder_errors_are_not_retried() {
        // an unparseable URL fails while building the request, before any I/O
        let err = reqwest::Client::new()
            .get("http://[::1")
            .send()
            .await
            .unwrap_err();
        assert!(!err.is_timeout() && !err.is_connect());
        assert!(!is_retriable(&ClientError::Http(err)));
    }
}
