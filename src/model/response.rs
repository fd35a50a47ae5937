use serde_json::Value;

use super::ApiRateLimit;

/// A response from the Instantly API, passed through as raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// The decoded JSON body of the response.
    pub(crate) body: Value,

    /// The API rate limit information, when the response carried it.
    pub(crate) rate_limit: Option<ApiRateLimit>,
}

impl ApiResponse {
    /// Creates a new `ApiResponse` instance with the given body and rate limit.
    pub fn new(body: Value, rate_limit: Option<ApiRateLimit>) -> Self {
        Self { body, rate_limit }
    }

    /// Retrieves the JSON body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Consumes the response and returns the JSON body.
    pub fn into_body(self) -> Value {
        self.body
    }

    /// Retrieves the API rate limit information, if any.
    pub fn rate_limit(&self) -> Option<&ApiRateLimit> {
        self.rate_limit.as_ref()
    }
}
