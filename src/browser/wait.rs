//! Condition polling, used instead of blind sleeps wherever the page offers
//! something observable to wait on.

use crate::errors::{AppError, AppResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Poll `probe` until it yields Some, or fail with a Timeout naming `what`
/// once `budget` is spent.
pub async fn wait_until<F, Fut, T>(what: &str, budget: Duration, mut probe: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + budget;
    loop {
        if let Some(v) = probe().await {
            return Ok(v);
        }
        if Instant::now() >= deadline {
            return Err(AppError::Timeout {
                what: what.to_string(),
                after_ms: budget.as_millis() as u64,
            });
        }
        sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_as_soon_as_probe_succeeds() {
        let mut calls = 0;
        let v = wait_until("thing", Duration::from_secs(5), || {
            calls += 1;
            let hit = calls >= 2;
            async move { hit.then_some(calls) }
        })
        .await
        .unwrap();
        assert_eq!(v, 2);
    }

    #[tokio::test]
    async fn times_out_with_named_target() {
        let err = wait_until("the popover", Duration::from_millis(1), || async { None::<()> })
            .await
            .unwrap_err();
        match err {
            AppError::Timeout { what, .. } => assert_eq!(what, "the popover"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
