use std::sync::Arc;

use chrono::Utc;
use log::warn;
use tokio::time::sleep;

use crate::{ApiRequest, ApiResponse, ApiTransport, StdResult};

/// This struct is responsible for enforcing rate limits on API requests.
pub struct TransportRateLimitEnforcer {
    /// The transport to be rate limited.
    transport: Arc<dyn ApiTransport>,
}

impl TransportRateLimitEnforcer {
    /// Creates a new `TransportRateLimitEnforcer` instance with the given transport.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait::async_trait]
impl ApiTransport for TransportRateLimitEnforcer {
    /// Enforce the rate limit on the API requests.
    async fn send(&self, request: &ApiRequest) -> StdResult<ApiResponse> {
        let response = self.transport.send(request).await?;
        if let Some(rate_limit) = response.rate_limit() {
            if rate_limit.is_exceeded() {
                let duration_until_reset = rate_limit.duration_until_reset(Utc::now())?;
                warn!("API rate limit exceeded, waiting for {duration_until_reset:?}");
                sleep(duration_until_reset).await;
            }
        }

        Ok(response)
    }
}
