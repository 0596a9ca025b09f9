//! Outbound HTTP client for the restaurant/menu service.
//!
//! # Responsibilities
//! - Own one pooled `reqwest::Client` carrying the browser-like header set
//! - Issue exactly one GET per call (no retries)
//! - Classify failures into status / transport / decode

use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, USER_AGENT,
};
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::upstream::error::{ClientInitError, UpstreamError};

#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientInitError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// Any non-2xx status is an error; the upstream body is discarded.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, UpstreamError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response.bytes().await.map_err(UpstreamError::Transport)?;
        Ok(serde_json::from_slice(&body)?)
    }
}
