pub mod memory;
pub mod mongo;

use std::future::Future;
use std::time::Duration;

use crate::errors::ServiceError;

/// Run a store call under `limit`; an elapsed limit becomes `ServiceError::Timeout`.
pub async fn with_timeout<T, E, F>(limit: Duration, fut: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<ServiceError>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res.map_err(Into::into),
        Err(_) => Err(ServiceError::Timeout(limit)),
    }
}
