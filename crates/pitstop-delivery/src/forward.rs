// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optional copy of local records to a secondary analytics backend.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use pitstop_core::{Diagnostic, DiagnosticSink, HttpTransport};

use crate::metrics::record_backend_forward;

/// POSTs records to a configured endpoint, swallowing every failure.
pub struct BackendForwarder {
    endpoint: Option<String>,
    transport: Arc<dyn HttpTransport>,
    sink: Arc<dyn DiagnosticSink>,
}

impl BackendForwarder {
    /// `endpoint = None` disables forwarding entirely.
    pub fn new(
        endpoint: Option<String>,
        transport: Arc<dyn HttpTransport>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            endpoint,
            transport,
            sink,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Forward `record`. Returns whether the backend accepted it; a disabled
    /// forwarder returns `false` without doing anything.
    pub async fn forward<T: Serialize + Sync>(&self, record: &T) -> bool {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return false;
        };

        let body = match serde_json::to_value(record) {
            Ok(body) => body,
            Err(e) => return self.failed(format!("encoding failed: {e}")),
        };

        match self.transport.post_json(endpoint, &body).await {
            Ok(response) if response.is_success() => {
                debug!(status = response.status, "record forwarded to backend");
                record_backend_forward(true);
                true
            }
            Ok(response) => self.failed(format!("backend answered {}", response.status)),
            Err(e) => self.failed(e.to_string()),
        }
    }

    fn failed(&self, message: String) -> bool {
        self.sink
            .report(Diagnostic::BackendForwardFailed { message });
        record_backend_forward(false);
        false
    }
}
