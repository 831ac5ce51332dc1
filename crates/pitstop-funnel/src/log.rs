// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The persisted WhatsApp redirect list.
//!
//! The list lives under a single key and every append is a whole-list
//! read-modify-write. Two writers sharing the backing store can therefore
//! lose each other's appends (last writer wins); nothing here tries to
//! prevent that.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};

use pitstop_core::{AnalyticsTag, Clock, Diagnostic, DiagnosticSink, KeyValueStore};
use pitstop_delivery::BackendForwarder;
use pitstop_delivery::metrics::record_redirect;
use pitstop_identity::IdentityStore;
use pitstop_payload::CustomerStore;
use pitstop_storage::{keys, read_json, write_json};

use crate::record::{RedirectRecord, RedirectRequest};
use crate::summary::FunnelSummary;

/// Event name passed to the analytics tag for each redirect.
pub const TAG_EVENT: &str = "whatsapp_redirect";

/// Appends, aggregates and prunes redirect records.
pub struct RedirectLog {
    persistent: Arc<dyn KeyValueStore>,
    identity: Arc<IdentityStore>,
    customers: Arc<CustomerStore>,
    clock: Arc<dyn Clock>,
    forwarder: BackendForwarder,
    tag: Option<Arc<dyn AnalyticsTag>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl RedirectLog {
    pub fn new(
        persistent: Arc<dyn KeyValueStore>,
        identity: Arc<IdentityStore>,
        customers: Arc<CustomerStore>,
        clock: Arc<dyn Clock>,
        forwarder: BackendForwarder,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            persistent,
            identity,
            customers,
            clock,
            forwarder,
            tag: None,
            sink,
        }
    }

    /// Also forward each redirect to an analytics tag.
    pub fn with_tag(mut self, tag: Arc<dyn AnalyticsTag>) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Stamp and append a redirect, then fan it out to the tag, the stored
    /// profile and the backend. Every step is best effort; the stamped record
    /// is returned whether or not it could be stored.
    pub async fn track_whatsapp_redirect(&self, request: RedirectRequest) -> RedirectRecord {
        let record = RedirectRecord {
            timestamp: self.clock.now(),
            service: request.service,
            source: request.source,
            car: request.car,
            price: request.price,
            session_id: self.identity.session_id().0,
            user_id: self.identity.user_id().0,
        };

        let mut records = self.records();
        records.push(record.clone());
        if write_json(
            self.persistent.as_ref(),
            keys::WHATSAPP_REDIRECTS,
            &records,
            self.sink.as_ref(),
        ) {
            debug!(
                service = %record.service,
                source = %record.source,
                total = records.len(),
                "redirect recorded"
            );
        }
        record_redirect(&record.source);

        self.emit_tag(&record);
        self.customers.update_profile(|profile| {
            if let Some(car) = &record.car {
                profile.preferred_car = Some(car.clone());
            }
            profile.last_service = Some(record.service.clone());
        });
        self.forwarder.forward(&record).await;

        record
    }

    /// Every stored record, oldest first. An unreadable list reads as empty.
    pub fn records(&self) -> Vec<RedirectRecord> {
        read_json(
            self.persistent.as_ref(),
            keys::WHATSAPP_REDIRECTS,
            self.sink.as_ref(),
        )
        .unwrap_or_default()
    }

    /// Aggregate statistics over the current list.
    pub fn conversion_funnel_data(&self) -> FunnelSummary {
        FunnelSummary::from_records(&self.records())
    }

    /// Drop records older than `retention_days` and rewrite the list.
    ///
    /// A record exactly `retention_days` old is kept. Returns how many were
    /// removed. Running it twice in a row removes nothing the second time.
    /// A window reaching past the earliest representable date keeps everything.
    pub fn clear_old_data(&self, retention_days: u32) -> usize {
        let Some(cutoff) = self
            .clock
            .now()
            .checked_sub_signed(Duration::days(i64::from(retention_days)))
        else {
            debug!(retention_days, "retention window exceeds calendar range, nothing swept");
            return 0;
        };
        let records = self.records();
        let before = records.len();
        let kept: Vec<RedirectRecord> = records
            .into_iter()
            .filter(|r| r.timestamp >= cutoff)
            .collect();
        let removed = before - kept.len();

        write_json(
            self.persistent.as_ref(),
            keys::WHATSAPP_REDIRECTS,
            &kept,
            self.sink.as_ref(),
        );
        info!(removed, kept = kept.len(), retention_days, "redirect retention sweep");
        removed
    }

    fn emit_tag(&self, record: &RedirectRecord) {
        let Some(tag) = &self.tag else {
            return;
        };
        let params = serde_json::json!({
            "service": record.service,
            "source": record.source,
            "car": record.car,
            "value": record.price,
        });
        if let Err(e) = tag.emit(TAG_EVENT, &params) {
            self.sink.report(Diagnostic::TagForwardFailed {
                message: e.to_string(),
            });
        }
    }
}
