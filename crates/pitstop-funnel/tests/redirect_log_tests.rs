// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redirect log behaviour: append, aggregate, sweep, fan-out.

use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};
use pitstop_core::{Diagnostic, KeyValueStore, PitstopError};
use pitstop_delivery::BackendForwarder;
use pitstop_funnel::{RedirectLog, RedirectRequest, ServiceCount, SourceCount};
use pitstop_identity::IdentityStore;
use pitstop_payload::CustomerStore;
use pitstop_storage::{MemoryStore, keys};
use pitstop_test_utils::{FixedClock, MockTransport, RecordingSink, RecordingTag};

struct Fixture {
    persistent: Arc<dyn KeyValueStore>,
    session: Arc<MemoryStore>,
    clock: Arc<FixedClock>,
    transport: Arc<MockTransport>,
    sink: Arc<RecordingSink>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_persistent(Arc::new(MemoryStore::new()))
    }

    fn with_persistent(persistent: Arc<dyn KeyValueStore>) -> Self {
        Self {
            persistent,
            session: Arc::new(MemoryStore::new()),
            clock: Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2024, 6, 30, 9, 0, 0).unwrap(),
            )),
            transport: Arc::new(MockTransport::new()),
            sink: Arc::new(RecordingSink::new()),
        }
    }

    fn log(&self, endpoint: Option<&str>) -> RedirectLog {
        let identity = Arc::new(IdentityStore::new(
            self.session.clone(),
            self.persistent.clone(),
            self.clock.clone(),
            self.sink.clone(),
        ));
        let customers = Arc::new(CustomerStore::new(
            self.session.clone(),
            self.persistent.clone(),
            self.sink.clone(),
            "in",
        ));
        RedirectLog::new(
            self.persistent.clone(),
            identity,
            customers,
            self.clock.clone(),
            BackendForwarder::new(
                endpoint.map(str::to_string),
                self.transport.clone(),
                self.sink.clone(),
            ),
            self.sink.clone(),
        )
    }

    /// Start a fresh visit: new session id, same persistent store.
    fn new_session(&self) {
        self.session.clear().unwrap();
    }
}

#[tokio::test]
async fn append_stamps_time_and_identity() {
    let f = Fixture::new();
    let log = f.log(None);

    let record = log
        .track_whatsapp_redirect(RedirectRequest::new("AC", "hero").car("Swift").price(1499.0))
        .await;

    assert_eq!(record.timestamp, f.clock.now_utc());
    assert!(record.session_id.starts_with("sess_"));
    assert!(record.user_id.starts_with("user_"));
    assert_eq!(log.records(), vec![record]);
}

#[tokio::test]
async fn funnel_aggregation_over_two_sessions() {
    let f = Fixture::new();
    let log = f.log(None);

    log.track_whatsapp_redirect(RedirectRequest::new("AC", "ad")).await;
    log.track_whatsapp_redirect(RedirectRequest::new("AC", "organic")).await;
    f.new_session();
    log.track_whatsapp_redirect(RedirectRequest::new("Battery", "ad")).await;

    let summary = log.conversion_funnel_data();
    assert_eq!(summary.total_redirects, 3);
    assert_eq!(summary.unique_sessions, 2);
    assert_eq!(
        summary.top_services,
        vec![
            ServiceCount { service: "AC".into(), count: 2 },
            ServiceCount { service: "Battery".into(), count: 1 },
        ]
    );
    assert_eq!(
        summary.conversion_by_source,
        vec![
            SourceCount { source: "ad".into(), count: 2 },
            SourceCount { source: "organic".into(), count: 1 },
        ]
    );
    assert_eq!(summary.redirects_per_session, 1.5);
}

#[tokio::test]
async fn retention_sweep_keeps_records_within_window() {
    let f = Fixture::new();
    let log = f.log(None);
    let now = f.clock.now_utc();

    for age in [0, 10, 29, 31, 40] {
        f.clock.set(now - Duration::days(age));
        log.track_whatsapp_redirect(RedirectRequest::new(format!("age-{age}"), "test"))
            .await;
    }
    f.clock.set(now);

    assert_eq!(log.clear_old_data(30), 2);
    let kept: Vec<String> = log.records().into_iter().map(|r| r.service).collect();
    assert_eq!(kept, ["age-0", "age-10", "age-29"]);

    // Idempotent.
    assert_eq!(log.clear_old_data(30), 0);
    assert_eq!(log.records().len(), 3);
}

#[tokio::test]
async fn record_exactly_at_the_boundary_is_kept() {
    let f = Fixture::new();
    let log = f.log(None);
    let now = f.clock.now_utc();

    f.clock.set(now - Duration::days(30));
    log.track_whatsapp_redirect(RedirectRequest::new("edge", "test")).await;
    f.clock.set(now);

    assert_eq!(log.clear_old_data(30), 0);
}

#[tokio::test]
async fn window_beyond_calendar_range_keeps_everything() {
    let f = Fixture::new();
    let log = f.log(None);
    log.track_whatsapp_redirect(RedirectRequest::new("AC", "ad")).await;

    assert_eq!(log.clear_old_data(100_000_000), 0);
    assert_eq!(log.clear_old_data(u32::MAX), 0);
    assert_eq!(log.records().len(), 1);
}

#[tokio::test]
async fn sweep_touches_only_the_redirect_key() {
    let f = Fixture::new();
    let log = f.log(None);
    f.persistent.set(keys::USER_MOBILE, "9876543210").unwrap();
    log.track_whatsapp_redirect(RedirectRequest::new("AC", "ad")).await;

    f.clock.set(f.clock.now_utc() + Duration::days(365));
    assert_eq!(log.clear_old_data(30), 1);

    assert_eq!(
        f.persistent.get(keys::USER_MOBILE).unwrap().as_deref(),
        Some("9876543210")
    );
    assert!(f.persistent.get(keys::USER_ID).unwrap().is_some());
}

#[tokio::test]
async fn corrupt_list_reads_as_empty_and_sweep_replaces_it() {
    let f = Fixture::new();
    f.persistent
        .set(keys::WHATSAPP_REDIRECTS, "[{\"half\":")
        .unwrap();
    let log = f.log(None);

    assert_eq!(log.conversion_funnel_data().total_redirects, 0);
    assert_eq!(log.clear_old_data(30), 0);
    assert_eq!(
        f.persistent.get(keys::WHATSAPP_REDIRECTS).unwrap().as_deref(),
        Some("[]")
    );
    assert!(
        f.sink
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::StorageUnreadable { .. }))
    );
}

#[tokio::test]
async fn redirect_updates_profile_tag_and_backend() {
    let f = Fixture::new();
    let tag = Arc::new(RecordingTag::new());
    let log = f
        .log(Some("https://analytics.pitstop.test/redirects"))
        .with_tag(tag.clone());

    log.track_whatsapp_redirect(RedirectRequest::new("Full Service", "pricing").car("i20"))
        .await;

    let emitted = tag.emitted();
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].0, "whatsapp_redirect");
    assert_eq!(emitted[0].1["service"], "Full Service");

    let profile: serde_json::Value = serde_json::from_str(
        &f.persistent.get(keys::CUSTOMER_PROFILE).unwrap().unwrap(),
    )
    .unwrap();
    assert_eq!(profile["preferredCar"], "i20");
    assert_eq!(profile["lastService"], "Full Service");

    let requests = f.transport.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body.as_ref().unwrap()["service"], "Full Service");
}

#[tokio::test]
async fn fan_out_failures_never_lose_the_local_record() {
    let f = Fixture::new();
    f.transport.push_error("backend down").await;
    let log = f
        .log(Some("https://analytics.pitstop.test/redirects"))
        .with_tag(Arc::new(RecordingTag::failing()));

    log.track_whatsapp_redirect(RedirectRequest::new("AC", "ad")).await;

    assert_eq!(log.records().len(), 1);
    let reported = f.sink.diagnostics();
    assert!(reported.iter().any(|d| matches!(d, Diagnostic::TagForwardFailed { .. })));
    assert!(reported.iter().any(|d| matches!(d, Diagnostic::BackendForwardFailed { .. })));
}

/// A store whose next read of the redirect list can be served from an
/// earlier snapshot, standing in for a second tab that read the list before
/// the first tab wrote it.
struct StaleReads {
    inner: MemoryStore,
    pinned: Mutex<Option<Option<String>>>,
}

impl StaleReads {
    fn snapshot(&self) -> Option<String> {
        self.inner.get(keys::WHATSAPP_REDIRECTS).unwrap()
    }

    fn serve_next_read_from(&self, snapshot: Option<String>) {
        *self.pinned.lock().unwrap() = Some(snapshot);
    }
}

impl KeyValueStore for StaleReads {
    fn get(&self, key: &str) -> Result<Option<String>, PitstopError> {
        if key == keys::WHATSAPP_REDIRECTS {
            if let Some(snapshot) = self.pinned.lock().unwrap().take() {
                return Ok(snapshot);
            }
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PitstopError> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PitstopError> {
        self.inner.remove(key)
    }
}

#[tokio::test]
async fn concurrent_appends_are_last_writer_wins() {
    let store = Arc::new(StaleReads {
        inner: MemoryStore::new(),
        pinned: Mutex::new(None),
    });
    let f = Fixture::with_persistent(store.clone());
    let log = f.log(None);

    log.track_whatsapp_redirect(RedirectRequest::new("first", "tab-a")).await;

    // Tab B reads the list here...
    let seen_by_tab_b = store.snapshot();
    // ...tab A appends...
    log.track_whatsapp_redirect(RedirectRequest::new("from-a", "tab-a")).await;
    // ...and tab B writes back its stale copy plus its own record.
    store.serve_next_read_from(seen_by_tab_b);
    log.track_whatsapp_redirect(RedirectRequest::new("from-b", "tab-b")).await;

    let services: Vec<String> = log.records().into_iter().map(|r| r.service).collect();
    assert_eq!(services, ["first", "from-b"]);
}
