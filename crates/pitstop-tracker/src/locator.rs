// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! IP-based location lookup.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use pitstop_core::{DetectedLocation, HttpTransport, LocationProvider, PitstopError};

/// Body of an ipapi-style `/json/` lookup.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    city: Option<String>,
    region: Option<String>,
    country_code: Option<String>,
    postal: Option<String>,
}

/// [`LocationProvider`] backed by a JSON IP-lookup endpoint.
pub struct IpLocator {
    url: String,
    transport: Arc<dyn HttpTransport>,
}

impl IpLocator {
    pub fn new(url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            url: url.into(),
            transport,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl LocationProvider for IpLocator {
    async fn locate(&self) -> Result<DetectedLocation, PitstopError> {
        let response = self.transport.get(&self.url).await?;
        if !response.is_success() {
            return Err(PitstopError::Location(format!(
                "lookup answered {}",
                response.status
            )));
        }

        let body: LookupResponse = serde_json::from_str(&response.body)
            .map_err(|e| PitstopError::Location(format!("unreadable lookup body: {e}")))?;
        if body.error {
            return Err(PitstopError::Location(
                body.reason.unwrap_or_else(|| "lookup refused".to_string()),
            ));
        }

        let location = DetectedLocation {
            city: non_blank(body.city),
            region: non_blank(body.region),
            country: non_blank(body.country_code).map(|c| c.to_lowercase()),
            postal_code: non_blank(body.postal),
        };
        debug!(city = ?location.city, country = ?location.country, "location detected");
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use pitstop_test_utils::MockTransport;

    use super::*;

    #[tokio::test]
    async fn maps_lookup_fields() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_response(
                200,
                r#"{"ip":"203.0.113.7","city":"Pune","region":"Maharashtra","country_code":"IN","postal":"411001"}"#,
            )
            .await;
        let locator = IpLocator::new("https://ipapi.test/json/", transport.clone());

        let location = locator.locate().await.unwrap();
        assert_eq!(
            location,
            DetectedLocation {
                city: Some("Pune".into()),
                region: Some("Maharashtra".into()),
                country: Some("in".into()),
                postal_code: Some("411001".into()),
            }
        );
        assert_eq!(transport.requests().await[0].method, "GET");
    }

    #[tokio::test]
    async fn rate_limit_body_is_an_error() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_response(200, r#"{"error":true,"reason":"RateLimited"}"#)
            .await;
        let err = IpLocator::new("https://ipapi.test/json/", transport)
            .locate()
            .await
            .unwrap_err();
        assert!(matches!(err, PitstopError::Location(reason) if reason == "RateLimited"));
    }

    #[tokio::test]
    async fn error_status_and_garbage_are_errors() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(429, "slow down").await;
        transport.push_response(200, "<html>").await;
        let locator = IpLocator::new("https://ipapi.test/json/", transport);
        assert!(locator.locate().await.is_err());
        assert!(locator.locate().await.is_err());
    }
}
