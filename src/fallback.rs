use crate::error::GatewayError;
use crate::gateway::ApiResult;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Which strategy produced a gateway result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedBy {
    Remote,
    Local,
}

/// A gateway result together with the strategy that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub result: ApiResult<T>,
    pub served_by: ServedBy,
}

/// Try the remote strategy once, then fall back to the local one
///
/// # Arguments
/// * `operation_name` - Name of the operation for logging
/// * `limit` - Upper bound on the remote attempt
/// * `remote` - The remote call; any error (or the timeout) triggers the fallback
/// * `local` - Deterministic local generator; `Err(message)` is a terminal failure
///
/// There is exactly one remote attempt: no retries, no backoff.
pub async fn attempt_then_fallback<T, Fut, F>(
    operation_name: &str,
    limit: Duration,
    remote: Fut,
    local: F,
) -> ApiResult<T>
where
    Fut: Future<Output = Result<T, GatewayError>>,
    F: FnOnce() -> Result<T, String>,
{
    attempt_then_fallback_traced(operation_name, limit, remote, local)
        .await
        .result
}

/// Same as [`attempt_then_fallback`], also reporting which strategy answered
pub async fn attempt_then_fallback_traced<T, Fut, F>(
    operation_name: &str,
    limit: Duration,
    remote: Fut,
    local: F,
) -> Resolved<T>
where
    Fut: Future<Output = Result<T, GatewayError>>,
    F: FnOnce() -> Result<T, String>,
{
    let error = match timeout(limit, remote).await {
        Ok(Ok(data)) => {
            debug!("{}: served by remote backend", operation_name);
            return Resolved {
                result: ApiResult::Success(data),
                served_by: ServedBy::Remote,
            };
        }
        Ok(Err(e)) => e,
        Err(_) => GatewayError::Timeout(limit),
    };

    match error {
        GatewayError::Unavailable => {
            debug!("{}: no remote backend, using local data", operation_name)
        }
        ref e => warn!("{}: remote failed ({}), using local data", operation_name, e),
    }

    let result = match local() {
        Ok(data) => ApiResult::Success(data),
        Err(message) => {
            info!("{}: local data has no result: {}", operation_name, message);
            ApiResult::Failure(message)
        }
    };

    Resolved {
        result,
        served_by: ServedBy::Local,
    }
}
