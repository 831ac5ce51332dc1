// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock HTTP transport for deterministic testing.
//!
//! `MockTransport` answers from a queue of scripted outcomes (falling back to
//! `200 {}` when the queue is empty) and captures every request for
//! assertion.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use pitstop_core::{HttpResponse, HttpTransport, PitstopError};

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRequest {
    pub method: &'static str,
    pub url: String,
    /// JSON body for POSTs, `None` for GETs.
    pub body: Option<serde_json::Value>,
}

enum Scripted {
    Response(HttpResponse),
    Error(String),
}

/// A scriptable [`HttpTransport`].
pub struct MockTransport {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockTransport {
    /// Create a transport that answers `200 {}` until scripted otherwise.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response for the next request.
    pub async fn push_response(&self, status: u16, body: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(Scripted::Response(HttpResponse {
                status,
                body: body.into(),
            }));
    }

    /// Queue a connection-level failure for the next request.
    pub async fn push_error(&self, message: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(Scripted::Error(message.into()));
    }

    /// All requests made so far, in order.
    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn answer(&self, request: CapturedRequest) -> Result<HttpResponse, PitstopError> {
        self.requests.lock().await.push(request);
        match self.script.lock().await.pop_front() {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Error(message)) => Err(PitstopError::Transport {
                message,
                source: None,
            }),
            None => Ok(HttpResponse {
                status: 200,
                body: "{}".to_string(),
            }),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, PitstopError> {
        self.answer(CapturedRequest {
            method: "POST",
            url: url.to_string(),
            body: Some(body.clone()),
        })
        .await
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, PitstopError> {
        self.answer(CapturedRequest {
            method: "GET",
            url: url.to_string(),
            body: None,
        })
        .await
    }
}
