use crate::{ApiRequest, ApiResponse, StdResult};

/// A trait for sending requests to the Instantly API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ApiTransport: Sync + Send {
    /// Sends the request and returns the decoded JSON response.
    async fn send(&self, request: &ApiRequest) -> StdResult<ApiResponse>;
}
