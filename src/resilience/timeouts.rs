//! Timeout enforcement.
//!
//! Every upstream call gets a deadline; an unbounded outbound call would
//! hold the caller's request open indefinitely.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

/// Raised when a call outlives its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(pub Duration);

/// Run `fut` with a deadline.
pub async fn with_deadline<F, T>(deadline: Duration, fut: F) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    timeout(deadline, fut).await.map_err(|_| Elapsed(deadline))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let value = with_deadline(Duration::from_secs(1), async { 7 }).await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test]
    async fn test_deadline_elapsed() {
        let result = with_deadline(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
        })
        .await;
        assert_eq!(result, Err(Elapsed(Duration::from_millis(20))));
    }
}
