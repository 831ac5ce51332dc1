// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the conversion API `/events` endpoint.
//!
//! Delivery is fire-and-forget: one POST per event, no retry, no queue. The
//! outcome is a boolean and every failure becomes a [`Diagnostic`].

use std::sync::Arc;
use std::time::Instant;

use reqwest::Url;
use tracing::debug;

use pitstop_config::model::PixelConfig;
use pitstop_core::{
    Diagnostic, DiagnosticSink, EventBatch, HttpTransport, PitstopError, TrackedEvent,
};

use crate::metrics::{Outcome, record_event, record_latency};

/// Sends built events to the conversion API.
pub struct ConversionClient {
    endpoint: String,
    test_event_code: Option<String>,
    transport: Arc<dyn HttpTransport>,
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for ConversionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionClient")
            .field("endpoint", &"[REDACTED]")
            .field("test_event_code", &self.test_event_code)
            .finish()
    }
}

impl ConversionClient {
    /// Create a client from the `[pixel]` section.
    ///
    /// Fails with [`PitstopError::Config`] when the pixel id or access token is
    /// missing or blank, or when they do not form a valid URL.
    pub fn new(
        config: &PixelConfig,
        transport: Arc<dyn HttpTransport>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, PitstopError> {
        let base = format!("https://{}", config.host);
        Self::build(config, &base, transport, sink)
    }

    /// Points the client at a local server (for testing with wiremock).
    #[cfg(test)]
    fn with_base_url(
        config: &PixelConfig,
        base: &str,
        transport: Arc<dyn HttpTransport>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, PitstopError> {
        Self::build(config, base, transport, sink)
    }

    fn build(
        config: &PixelConfig,
        base: &str,
        transport: Arc<dyn HttpTransport>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, PitstopError> {
        let pixel_id = required(config.pixel_id.as_deref(), "pixel.pixel_id")?;
        let access_token = required(config.access_token.as_deref(), "pixel.access_token")?;

        let mut url = Url::parse(&format!(
            "{base}/{}/{pixel_id}/events",
            config.api_version
        ))
        .map_err(|e| PitstopError::Config(format!("invalid conversion API URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("access_token", access_token);

        Ok(Self {
            endpoint: url.into(),
            test_event_code: config
                .test_event_code
                .clone()
                .filter(|code| !code.trim().is_empty()),
            transport,
            sink,
        })
    }

    /// Deliver one event. `true` only for a 2xx response; never errors.
    pub async fn send_event(&self, event: TrackedEvent) -> bool {
        let name = event.event_name;
        let batch = EventBatch::single(event, self.test_event_code.clone());
        let body = match serde_json::to_value(&batch) {
            Ok(body) => body,
            Err(e) => {
                self.sink.report(Diagnostic::DeliveryFailed {
                    event: name,
                    message: format!("payload encoding failed: {e}"),
                });
                record_event(name, Outcome::Failed);
                return false;
            }
        };

        let started = Instant::now();
        let result = self.transport.post_json(&self.endpoint, &body).await;
        record_latency(started.elapsed().as_secs_f64());

        match result {
            Ok(response) if response.is_success() => {
                debug!(event = %name, status = response.status, "conversion event delivered");
                record_event(name, Outcome::Delivered);
                true
            }
            Ok(response) => {
                self.sink.report(Diagnostic::DeliveryRejected {
                    event: name,
                    status: response.status,
                    body: response.body,
                });
                record_event(name, Outcome::Rejected);
                false
            }
            Err(e) => {
                self.sink.report(Diagnostic::DeliveryFailed {
                    event: name,
                    message: e.to_string(),
                });
                record_event(name, Outcome::Failed);
                false
            }
        }
    }
}

fn required<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str, PitstopError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| PitstopError::Config(format!("{key} is required for event delivery")))
}

#[cfg(test)]
mod tests {
    use pitstop_core::{ActionSource, EventName, UserData};
    use pitstop_test_utils::{MockTransport, RecordingSink};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::transport::ReqwestTransport;

    fn pixel() -> PixelConfig {
        PixelConfig {
            pixel_id: Some("1234567890".into()),
            access_token: Some("tok&en=1".into()),
            ..PixelConfig::default()
        }
    }

    fn event(name: EventName) -> TrackedEvent {
        TrackedEvent {
            event_name: name,
            event_time: 1_709_294_400,
            event_source_url: "https://pitstop.test/".into(),
            action_source: ActionSource::Website,
            user_data: UserData {
                client_user_agent: "ua/1".into(),
                ..UserData::default()
            },
            custom_data: None,
        }
    }

    #[test]
    fn missing_credentials_fail_fast() {
        let transport = Arc::new(MockTransport::new());
        let sink = Arc::new(RecordingSink::new());

        let mut config = pixel();
        config.pixel_id = None;
        let err = ConversionClient::new(&config, transport.clone(), sink.clone()).unwrap_err();
        assert!(matches!(err, PitstopError::Config(msg) if msg.contains("pixel.pixel_id")));

        let mut config = pixel();
        config.access_token = Some("  ".into());
        let err = ConversionClient::new(&config, transport, sink).unwrap_err();
        assert!(matches!(err, PitstopError::Config(msg) if msg.contains("pixel.access_token")));
    }

    #[tokio::test]
    async fn posts_batch_to_versioned_endpoint() {
        let transport = Arc::new(MockTransport::new());
        let client =
            ConversionClient::new(&pixel(), transport.clone(), Arc::new(RecordingSink::new()))
                .unwrap();

        assert!(client.send_event(event(EventName::Lead)).await);

        let requests = transport.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://graph.facebook.com/v18.0/1234567890/events?access_token=tok%26en%3D1"
        );
        let body = requests[0].body.as_ref().unwrap();
        assert_eq!(body["data"][0]["event_name"], "Lead");
        assert!(body.get("test_event_code").is_none());
    }

    #[tokio::test]
    async fn test_event_code_is_attached_to_the_envelope() {
        let transport = Arc::new(MockTransport::new());
        let mut config = pixel();
        config.test_event_code = Some("TEST4242".into());
        let client =
            ConversionClient::new(&config, transport.clone(), Arc::new(RecordingSink::new()))
                .unwrap();

        client.send_event(event(EventName::Purchase)).await;
        let requests = transport.requests().await;
        assert_eq!(requests[0].body.as_ref().unwrap()["test_event_code"], "TEST4242");
    }

    #[tokio::test]
    async fn rejection_is_false_with_diagnostic() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(400, r#"{"error":{"message":"Invalid OAuth"}}"#).await;
        let sink = Arc::new(RecordingSink::new());
        let client = ConversionClient::new(&pixel(), transport, sink.clone()).unwrap();

        assert!(!client.send_event(event(EventName::Contact)).await);
        assert!(matches!(
            &sink.diagnostics()[..],
            [Diagnostic::DeliveryRejected { event: EventName::Contact, status: 400, body }]
                if body.contains("Invalid OAuth")
        ));
    }

    #[tokio::test]
    async fn transport_error_is_false_with_diagnostic() {
        let transport = Arc::new(MockTransport::new());
        transport.push_error("connection reset").await;
        let sink = Arc::new(RecordingSink::new());
        let client = ConversionClient::new(&pixel(), transport, sink.clone()).unwrap();

        assert!(!client.send_event(event(EventName::PageView)).await);
        assert!(matches!(
            &sink.diagnostics()[..],
            [Diagnostic::DeliveryFailed { event: EventName::PageView, .. }]
        ));
    }

    #[tokio::test]
    async fn no_retry_after_failure() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(503, "unavailable").await;
        let client =
            ConversionClient::new(&pixel(), transport.clone(), Arc::new(RecordingSink::new()))
                .unwrap();

        assert!(!client.send_event(event(EventName::Schedule)).await);
        assert_eq!(transport.request_count().await, 1);
    }

    #[tokio::test]
    async fn http_500_over_real_http_is_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v18.0/1234567890/events"))
            .and(query_param("access_token", "tok&en=1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .expect(1)
            .mount(&server)
            .await;

        let sink = Arc::new(RecordingSink::new());
        let transport = Arc::new(ReqwestTransport::new(std::time::Duration::from_secs(5)).unwrap());
        let client =
            ConversionClient::with_base_url(&pixel(), &server.uri(), transport, sink.clone())
                .unwrap();

        assert!(!client.send_event(event(EventName::Lead)).await);
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[tokio::test]
    async fn http_200_over_real_http_is_true() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v18.0/1234567890/events"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"events_received": 1})),
            )
            .mount(&server)
            .await;

        let transport = Arc::new(ReqwestTransport::new(std::time::Duration::from_secs(5)).unwrap());
        let client = ConversionClient::with_base_url(
            &pixel(),
            &server.uri(),
            transport,
            Arc::new(RecordingSink::new()),
        )
        .unwrap();

        assert!(client.send_event(event(EventName::Lead)).await);
    }

    #[test]
    fn debug_output_hides_the_token() {
        let client = ConversionClient::new(
            &pixel(),
            Arc::new(MockTransport::new()),
            Arc::new(RecordingSink::new()),
        )
        .unwrap();
        assert!(!format!("{client:?}").contains("tok"));
    }
}
