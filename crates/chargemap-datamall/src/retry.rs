//! Retry with exponential back-off and jitter for the DataMall client.

use std::future::Future;
use std::time::Duration;

use crate::error::DataMallError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Retriable: network timeouts, connection failures, HTTP 5xx, and 429
/// (DataMall throttles by account key). Deserialization failures and client
/// errors are returned immediately — retrying cannot fix them.
pub(crate) fn is_retriable(err: &DataMallError) -> bool {
    match err {
        DataMallError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        DataMallError::UnexpectedStatus { status, .. } => *status >= 500 || *status == 429,
        DataMallError::Deserialize { .. }
        | DataMallError::PaginationLimit { .. }
        | DataMallError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors. The wait before the n-th retry is `backoff_base_ms * 2^(n-1)`,
/// jittered ±25 % and capped at 60 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, DataMallError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DataMallError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "DataMall transient error — retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
