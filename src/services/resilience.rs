//! Shared resilience primitives: deadline and bounded retry.
//!
//! Every external call in the orchestrator goes through these wrappers.
//! Both are side-effect-transparent: they never inspect or transform the
//! wrapped operation's successful result, only its timing and failure.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};

/// Race an operation against a deadline.
///
/// On expiry the pending future is dropped, so a late result is discarded
/// rather than applied to pipeline state. Expiry does not guarantee the
/// downstream call itself was aborted.
pub async fn with_timeout<T, Fut>(label: &str, budget: Duration, operation: Fut) -> DomainResult<T>
where
    Fut: Future<Output = DomainResult<T>>,
{
    match tokio::time::timeout(budget, operation).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation = label, budget_ms = budget.as_millis() as u64, "operation timed out");
            Err(DomainError::Timeout(label.to_string()))
        }
    }
}

/// Invoke an operation once; on a transient failure, perform exactly one
/// additional attempt before surfacing the failure.
///
/// This is a deliberately narrow retry-once policy, not backoff: a second
/// chance for flaky backends, never a loop. Non-transient failures such
/// as validation errors come back unchanged on a repeat call, so they
/// skip the retry entirely.
pub async fn with_retry<T, F, Fut>(label: &str, mut operation: F) -> DomainResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    match operation().await {
        Ok(value) => Ok(value),
        Err(first_err) if !first_err.is_transient() => {
            warn!(operation = label, error = %first_err, "non-transient failure, not retrying");
            Err(first_err)
        }
        Err(first_err) => {
            warn!(operation = label, error = %first_err, "first attempt failed, retrying once");
            match operation().await {
                Ok(value) => {
                    debug!(operation = label, "retry succeeded");
                    Ok(value)
                }
                Err(second_err) => {
                    warn!(operation = label, error = %second_err, "retry failed");
                    Err(second_err)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn retry_succeeds_immediately_without_second_call() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = with_retry("op", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, DomainError>(7)
            }
        })
        .await;

        assert_eq!(assert_ok!(result), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_makes_exactly_one_additional_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = with_retry("op", || {
            let calls = Arc::clone(&calls);
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(DomainError::BackendFailed("flaky".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retry_is_bounded_at_two_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: DomainResult<()> = with_retry("op", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::BackendFailed("down".into()))
            }
        })
        .await;

        assert_err!(result);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn validation_failure_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: DomainResult<()> = with_retry("op", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::ValidationFailed("bad input".into()))
            }
        })
        .await;

        assert_err!(result);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn timeout_expiry_yields_timeout_error() {
        let result: DomainResult<()> = with_timeout("slow", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        match result {
            Err(DomainError::Timeout(label)) => assert_eq!(label, "slow"),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn timeout_passes_fast_results_through_untouched() {
        let result = with_timeout("fast", Duration::from_secs(5), async {
            Ok::<_, DomainError>("done")
        })
        .await;
        assert_eq!(result.unwrap(), "done");
    }

    #[tokio::test]
    async fn late_result_is_discarded_not_applied() {
        // The wrapped future owns the only sender; when the deadline fires
        // the future is dropped and the side channel sees a closed sender
        // instead of a late value.
        let (tx, rx) = tokio::sync::oneshot::channel::<u32>();
        let result: DomainResult<u32> =
            with_timeout("slow", Duration::from_millis(10), async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                let _ = tx.send(99);
                Ok(99)
            })
            .await;

        assert!(matches!(result, Err(DomainError::Timeout(_))));
        assert!(rx.await.is_err());
    }
}
