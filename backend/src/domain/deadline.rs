//! Deadline enforcement for external round-trips.
//!
//! Services wrap every verifier and collection round-trip with
//! [`with_deadline`] so an unresponsive collaborator surfaces as a distinct,
//! retryable `Timeout` rather than hanging the request.

use std::future::Future;
use std::time::Duration;

use crate::domain::Error;

/// Deadline applied when a service is constructed without an explicit one.
pub const DEFAULT_OPERATION_DEADLINE: Duration = Duration::from_secs(5);

/// Run `operation` to completion unless `limit` elapses first.
///
/// # Errors
/// Returns [`Error::timeout`] when the deadline elapses; the operation's own
/// output is returned untouched otherwise.
pub async fn with_deadline<T>(
    limit: Duration,
    operation: impl Future<Output = T> + Send,
) -> Result<T, Error> {
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| Error::timeout("operation deadline exceeded"))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test(start_paused = true)]
    async fn fast_operations_pass_through() {
        let value = with_deadline(Duration::from_millis(100), async { 7_u32 })
            .await
            .expect("operation completes within deadline");
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_deadline_is_a_timeout_error() {
        let result = with_deadline(Duration::from_millis(100), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            7_u32
        })
        .await;

        let err = result.expect_err("deadline must elapse first");
        assert_eq!(err.code(), ErrorCode::Timeout);
    }
}
