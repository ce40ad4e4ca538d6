use std::future::Future;
use std::time::Duration;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, error};

use crate::errors::{KitError, Result};

/// Execute a future with a timeout, failing with an HTTP-class error.
pub async fn with_timeout<F, T>(future: F, duration: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => {
            error!("Operation '{}' timed out after {:?}", operation_name, duration);
            Err(KitError::Http(format!(
                "Operation '{}' timed out after {} ms",
                operation_name,
                duration.as_millis()
            )))
        }
    }
}

/// Race a yes/no probe against a deadline; losing the race reads as `false`.
pub async fn false_after_deadline<F>(future: F, deadline: Instant, probe_name: &str) -> bool
where
    F: Future<Output = bool>,
{
    match timeout_at(deadline, future).await {
        Ok(answer) => answer,
        Err(_) => {
            debug!("Probe '{}' did not answer before its deadline", probe_name);
            false
        }
    }
}
