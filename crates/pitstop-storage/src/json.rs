// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON values over a [`KeyValueStore`].
//!
//! Reads never fail: a missing key, a backend error, or a value that does not
//! parse all come back as `None`, and the latter two are reported to the
//! diagnostics sink.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use pitstop_core::{Diagnostic, DiagnosticSink, KeyValueStore};

/// Read and decode the JSON value stored under `key`.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    sink: &dyn DiagnosticSink,
) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            sink.report(Diagnostic::StorageUnreadable {
                key: key.to_string(),
                message: e.to_string(),
            });
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            sink.report(Diagnostic::StorageUnreadable {
                key: key.to_string(),
                message: format!("invalid JSON: {e}"),
            });
            None
        }
    }
}

/// Encode `value` and store it under `key`. Returns whether the write landed.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
    sink: &dyn DiagnosticSink,
) -> bool {
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(e) => {
            sink.report(Diagnostic::StorageWriteFailed {
                key: key.to_string(),
                message: e.to_string(),
            });
            return false;
        }
    };

    match store.set(key, &encoded) {
        Ok(()) => {
            debug!(key, bytes = encoded.len(), "stored JSON value");
            true
        }
        Err(e) => {
            sink.report(Diagnostic::StorageWriteFailed {
                key: key.to_string(),
                message: e.to_string(),
            });
            false
        }
    }
}

/// Read a plain string value, reporting backend errors and treating blank
/// values as absent.
pub fn read_string(
    store: &dyn KeyValueStore,
    key: &str,
    sink: &dyn DiagnosticSink,
) -> Option<String> {
    match store.get(key) {
        Ok(value) => value.filter(|v| !v.trim().is_empty()),
        Err(e) => {
            sink.report(Diagnostic::StorageUnreadable {
                key: key.to_string(),
                message: e.to_string(),
            });
            None
        }
    }
}
