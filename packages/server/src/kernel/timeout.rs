use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Result};

/// Run an upstream call, failing instead of hanging once `limit` elapses
pub async fn with_timeout<T, F>(limit: Duration, operation: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(anyhow!("{} timed out after {:?}", operation, limit)),
    }
}
