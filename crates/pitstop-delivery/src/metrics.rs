// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; nothing is collected unless the host installs
//! a recorder.

use metrics::{describe_counter, describe_histogram};

use pitstop_core::EventName;

/// Result of one delivery attempt, used as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    Rejected,
    Failed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Delivered => "delivered",
            Outcome::Rejected => "rejected",
            Outcome::Failed => "failed",
        }
    }
}

/// Register all Pitstop metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        "pitstop_events_total",
        "Conversion events sent, by event name and outcome"
    );
    describe_histogram!(
        "pitstop_delivery_latency_seconds",
        "Conversion API round-trip time in seconds"
    );
    describe_counter!(
        "pitstop_backend_forwards_total",
        "Redirect records forwarded to the analytics backend, by outcome"
    );
    describe_counter!(
        "pitstop_redirects_total",
        "WhatsApp redirects recorded, by source"
    );
}

pub fn record_event(event: EventName, outcome: Outcome) {
    metrics::counter!(
        "pitstop_events_total",
        "event" => event.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_latency(seconds: f64) {
    metrics::histogram!("pitstop_delivery_latency_seconds").record(seconds);
}

pub fn record_backend_forward(ok: bool) {
    let outcome = if ok { "ok" } else { "failed" };
    metrics::counter!("pitstop_backend_forwards_total", "outcome" => outcome).increment(1);
}

pub fn record_redirect(source: &str) {
    metrics::counter!("pitstop_redirects_total", "source" => source.to_string()).increment(1);
}
