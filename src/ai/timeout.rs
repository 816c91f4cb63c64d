//! External-Call Timeouts
//!
//! Every external-call boundary (generative-model call, remote fetch) runs
//! under an explicit timeout so a hung collaborator degrades into a per-node
//! or per-phase failure instead of stalling the job indefinitely.

use std::future::Future;
use std::time::Duration;

use crate::types::{Result, SmithError};

/// Execute an async operation with a timeout.
///
/// Returns a timeout error if the operation doesn't complete within the
/// specified duration.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(SmithError::timeout(operation_name, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout(
            Duration::from_secs(1),
            async { Ok::<_, SmithError>(42) },
            "test operation",
        )
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, SmithError>(42)
            },
            "slow operation",
        )
        .await;
        assert!(matches!(result, Err(SmithError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_timeout_is_model_degradation() {
        let err = with_timeout(
            Duration::from_millis(5),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, SmithError>(())
            },
            "llm call",
        )
        .await
        .unwrap_err();
        assert!(err.is_model_degradation());
    }
}
