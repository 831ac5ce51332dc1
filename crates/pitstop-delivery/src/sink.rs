// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default [`DiagnosticSink`]: structured `tracing` events.

use tracing::{debug, warn};

use pitstop_core::{Diagnostic, DiagnosticSink};

/// Logs diagnostics through `tracing`.
///
/// Rejected deliveries include the response body only in development mode;
/// in production they are logged at debug level without it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    development: bool,
}

impl TracingSink {
    pub fn new(development: bool) -> Self {
        Self { development }
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::DeliveryRejected {
                event,
                status,
                body,
            } => {
                if self.development {
                    warn!(%event, status, body = %body, "conversion event rejected");
                } else {
                    debug!(%event, status, "conversion event rejected");
                }
            }
            Diagnostic::DeliveryFailed { event, message } => {
                if self.development {
                    warn!(%event, error = %message, "conversion event not delivered");
                } else {
                    debug!(%event, "conversion event not delivered");
                }
            }
            Diagnostic::BackendForwardFailed { message } => {
                warn!(error = %message, "backend analytics forward failed");
            }
            Diagnostic::TagForwardFailed { message } => {
                warn!(error = %message, "analytics tag forward failed");
            }
            Diagnostic::StorageUnreadable { key, message } => {
                warn!(key = %key, error = %message, "stored value unreadable, treating as absent");
            }
            Diagnostic::StorageWriteFailed { key, message } => {
                warn!(key = %key, error = %message, "storage write failed");
            }
            Diagnostic::LocationUnavailable { message } => {
                debug!(error = %message, "location lookup unavailable");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pitstop_core::EventName;
    use tracing_test::traced_test;

    use super::*;

    fn rejected() -> Diagnostic {
        Diagnostic::DeliveryRejected {
            event: EventName::Lead,
            status: 400,
            body: "Invalid parameter".into(),
        }
    }

    #[test]
    #[traced_test]
    fn development_mode_logs_response_body() {
        TracingSink::new(true).report(rejected());
        assert!(logs_contain("conversion event rejected"));
        assert!(logs_contain("Invalid parameter"));
    }

    #[test]
    #[traced_test]
    fn production_mode_hides_response_body() {
        TracingSink::new(false).report(rejected());
        assert!(logs_contain("conversion event rejected"));
        assert!(!logs_contain("Invalid parameter"));
    }

    #[test]
    #[traced_test]
    fn swallowed_backend_failures_are_warnings() {
        TracingSink::default().report(Diagnostic::BackendForwardFailed {
            message: "connection reset".into(),
        });
        assert!(logs_contain("WARN"));
        assert!(logs_contain("connection reset"));
    }
}
