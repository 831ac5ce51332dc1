// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end tracker testing.
//!
//! `TestHarness` assembles a complete [`ConversionTracker`] over in-memory
//! stores, a scripted transport, a fixed clock and recording sinks, and keeps
//! handles to all of them for assertions.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use pitstop_config::PitstopConfig;
use pitstop_config::model::ServiceConfig;
use pitstop_core::{AnalyticsTag, CookieJar, PitstopError, StaticPage};
use pitstop_storage::MemoryStore;
use pitstop_tracker::{ConversionTracker, Ports};

use crate::fakes::{FixedClock, RecordingSink, RecordingTag};
use crate::mock_transport::MockTransport;

/// Pixel id used by every harness.
pub const TEST_PIXEL_ID: &str = "1234567890";
/// Access token used by every harness.
pub const TEST_ACCESS_TOKEN: &str = "test-token";
/// Page URL reported by the harness page context.
pub const TEST_PAGE_URL: &str = "https://pitstop.test/services";
/// User agent reported by the harness page context.
pub const TEST_USER_AGENT: &str = "Mozilla/5.0 (PitstopTest)";

/// The instant every harness clock starts at: 2024-03-01T12:00:00Z.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: PitstopConfig,
    cookies: CookieJar,
    with_tag: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let mut config = PitstopConfig::default();
        config.pixel.pixel_id = Some(TEST_PIXEL_ID.to_string());
        config.pixel.access_token = Some(TEST_ACCESS_TOKEN.to_string());
        Self {
            config,
            cookies: CookieJar::default(),
            with_tag: true,
        }
    }

    /// Populate the service catalog.
    pub fn with_services(mut self, services: Vec<ServiceConfig>) -> Self {
        self.config.services = services;
        self
    }

    /// Configure the WhatsApp business number used for deep links.
    pub fn with_whatsapp_number(mut self, number: impl Into<String>) -> Self {
        self.config.whatsapp.business_number = Some(number.into());
        self
    }

    /// Forward redirect records to this backend URL.
    pub fn with_backend(mut self, endpoint: impl Into<String>) -> Self {
        self.config.backend.analytics_endpoint = Some(endpoint.into());
        self
    }

    /// Set a browser cookie visible to the payload builder.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name, value);
        self
    }

    /// Build without an analytics tag attached.
    pub fn without_tag(mut self) -> Self {
        self.with_tag = false;
        self
    }

    /// Adjust any other configuration value.
    pub fn configure(mut self, f: impl FnOnce(&mut PitstopConfig)) -> Self {
        f(&mut self.config);
        self
    }

    /// Build the harness and the tracker under test.
    pub fn build(self) -> Result<TestHarness, PitstopError> {
        let session = Arc::new(MemoryStore::new());
        let persistent = Arc::new(MemoryStore::new());
        let transport = Arc::new(MockTransport::new());
        let clock = Arc::new(FixedClock::new(start_time()));
        let sink = Arc::new(RecordingSink::new());
        let tag = Arc::new(RecordingTag::new());

        let ports = Ports {
            session: session.clone(),
            persistent: persistent.clone(),
            cookies: Arc::new(self.cookies),
            transport: transport.clone(),
            clock: clock.clone(),
            page: Arc::new(StaticPage::new(TEST_USER_AGENT, TEST_PAGE_URL)),
            sink: sink.clone(),
            tag: self
                .with_tag
                .then(|| tag.clone() as Arc<dyn AnalyticsTag>),
        };
        let tracker = ConversionTracker::new(&self.config, ports)?;

        Ok(TestHarness {
            tracker,
            session,
            persistent,
            transport,
            clock,
            sink,
            tag,
            config: self.config,
        })
    }
}

/// A complete tracker with every port exposed for assertions.
pub struct TestHarness {
    /// The tracker under test.
    pub tracker: ConversionTracker,
    /// Session-scoped store.
    pub session: Arc<MemoryStore>,
    /// Persistent store.
    pub persistent: Arc<MemoryStore>,
    /// Scripted HTTP transport shared by delivery, forwarding and lookups.
    pub transport: Arc<MockTransport>,
    pub clock: Arc<FixedClock>,
    pub sink: Arc<RecordingSink>,
    pub tag: Arc<RecordingTag>,
    pub config: PitstopConfig,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// End the visit: the session store is wiped, persistent data stays.
    pub fn end_session(&self) {
        let _ = self.session.clear();
    }

    /// JSON bodies posted to the conversion endpoint, in order.
    pub async fn delivered_payloads(&self) -> Vec<serde_json::Value> {
        self.transport
            .requests()
            .await
            .into_iter()
            .filter(|r| r.method == "POST" && r.url.contains("/events"))
            .filter_map(|r| r.body)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harness_starts_at_fixed_instant() {
        let harness = TestHarness::builder().build().unwrap();
        assert_eq!(harness.clock.now_utc(), start_time());
        assert!(harness.persistent.is_empty());
    }

    #[test]
    fn missing_credentials_fail_to_build() {
        let result = TestHarness::builder()
            .configure(|c| c.pixel.access_token = None)
            .build();
        assert!(matches!(result, Err(PitstopError::Config(_))));
    }

    #[tokio::test]
    async fn page_view_reaches_the_transport() {
        let harness = TestHarness::builder().build().unwrap();
        let outcome = harness
            .tracker
            .track_page_view(Default::default())
            .await;
        assert!(outcome.delivered);
        assert_eq!(harness.delivered_payloads().await.len(), 1);
    }
}
