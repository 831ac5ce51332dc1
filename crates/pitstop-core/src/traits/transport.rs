// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport port.

use async_trait::async_trait;

use crate::error::PitstopError;

/// A completed HTTP exchange. Any status code, including 4xx/5xx, is a
/// response; only connection-level failures are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP client used for conversion delivery, backend forwarding and
/// IP lookup.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` as JSON to `url`.
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, PitstopError>;

    /// GET `url`.
    async fn get(&self, url: &str) -> Result<HttpResponse, PitstopError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        let ok = |status| HttpResponse {
            status,
            body: String::new(),
        };
        assert!(ok(200).is_success());
        assert!(ok(204).is_success());
        assert!(!ok(199).is_success());
        assert!(!ok(301).is_success());
        assert!(!ok(500).is_success());
    }
}
