use anyhow::Context;
use chrono::Utc;
use log::debug;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::{ApiMethod, ApiRateLimit, ApiRequest, ApiResponse, ApiTransport, StdResult, TransportError};

/// The production endpoint for the Instantly API.
pub const INSTANTLY_API_ENDPOINT: &str = "https://api.instantly.ai";

/// The environment variable holding the API key.
pub const INSTANTLY_API_KEY_VARIABLE: &str = "INSTANTLY_API_KEY";

/// Sends requests to the Instantly REST API.
pub struct RestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl RestTransport {
    /// Creates a new `RestTransport` for the given endpoint, reading the API
    /// key from the environment.
    pub fn try_new(base_url: &str) -> StdResult<Self> {
        let api_key = std::env::var(INSTANTLY_API_KEY_VARIABLE)
            .with_context(|| format!("Missing {INSTANTLY_API_KEY_VARIABLE} environment variable"))?;

        Self::try_new_with_api_key(base_url, &api_key)
    }

    /// Creates a new `RestTransport` for the given endpoint and API key.
    pub fn try_new_with_api_key(base_url: &str, api_key: &str) -> StdResult<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {api_key}"))?;
        authorization.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        let client = reqwest::Client::builder()
            .user_agent("instantly-supersearch")
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn rate_limit_from_headers(headers: &HeaderMap) -> Option<ApiRateLimit> {
        let header_value =
            |name: &str| -> Option<i64> { headers.get(name)?.to_str().ok()?.parse().ok() };
        let limit = header_value("x-ratelimit-limit")?;
        let remaining = header_value("x-ratelimit-remaining")?;
        let reset_in_seconds = header_value("x-ratelimit-reset")?;
        let reset_at = (Utc::now() + chrono::Duration::seconds(reset_in_seconds)).to_rfc3339();

        Some(ApiRateLimit {
            limit,
            remaining,
            reset_at,
        })
    }
}

#[async_trait::async_trait]
impl ApiTransport for RestTransport {
    async fn send(&self, request: &ApiRequest) -> StdResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path());
        let mut builder = match request.method() {
            ApiMethod::Get => self.client.get(&url),
            ApiMethod::Post => self.client.post(&url),
        };
        if !request.query().is_empty() {
            builder = builder.query(request.query());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        debug!("Sending {request}");
        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to send {request}"))?;
        let status = response.status();
        let rate_limit = Self::rate_limit_from_headers(response.headers());
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(TransportError::Remote {
                status: status.as_u16(),
                message: text,
            }
            .into());
        }
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| TransportError::Parse(e.to_string()))?
        };

        Ok(ApiResponse::new(body, rate_limit))
    }
}
