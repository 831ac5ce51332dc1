// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reqwest implementation of [`HttpTransport`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use pitstop_core::{HttpResponse, HttpTransport, PitstopError};

/// HTTP transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, PitstopError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pitstop/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PitstopError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client })
    }

    async fn into_response(response: reqwest::Response) -> HttpResponse {
        let status = response.status().as_u16();
        // A body that cannot be read is reported as empty; the status decides.
        let body = response.text().await.unwrap_or_default();
        debug!(status, bytes = body.len(), "HTTP response received");
        HttpResponse { status, body }
    }
}

fn request_failed(e: reqwest::Error) -> PitstopError {
    PitstopError::Transport {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, PitstopError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(request_failed)?;
        Ok(Self::into_response(response).await)
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, PitstopError> {
        let response = self.client.get(url).send().await.map_err(request_failed)?;
        Ok(Self::into_response(response).await)
    }
}
