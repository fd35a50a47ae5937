use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use log::warn;
use tokio::time::sleep;

use crate::{ApiRequest, ApiResponse, ApiTransport, StdResult, TransportError};

/// A struct that retries an ApiTransport a specified number of times in case of failure with exponential backoff strategy.
///
/// Client-side rejections (4xx) are surfaced immediately, a retry cannot fix them.
pub struct TransportRetrier {
    /// The transport to be retried.
    transport: Arc<dyn ApiTransport>,

    /// The maximum number of retries for a request.
    max_retries: u32,

    /// The base delay for exponential backoff.
    base_delay: Duration,
}

impl TransportRetrier {
    /// Creates a new `TransportRetrier` instance with the given maximum number of retries.
    pub fn new(transport: Arc<dyn ApiTransport>, max_retries: u32, base_delay: Duration) -> Self {
        Self {
            transport,
            max_retries,
            base_delay,
        }
    }

    fn calculate_exponential_backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * (2u32.pow(attempt.min(31)))
    }
}

#[async_trait::async_trait]
impl ApiTransport for TransportRetrier {
    /// Retries the request if it fails, up to the maximum number of retries.
    async fn send(&self, request: &ApiRequest) -> StdResult<ApiResponse> {
        let mut attempts = 0;

        loop {
            match self.transport.send(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if e.downcast_ref::<TransportError>()
                        .is_some_and(TransportError::is_unretryable)
                    {
                        return Err(e);
                    }
                    warn!("Send attempt #{} failed for {request}: {e}", attempts + 1);
                    attempts += 1;
                    if attempts >= self.max_retries {
                        return Err(anyhow!("Failed after {attempts} attempts: {e}"));
                    }
                    sleep(self.calculate_exponential_backoff_delay(attempts)).await;
                }
            }
        }
    }
}
