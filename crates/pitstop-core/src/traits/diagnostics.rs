// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostics port for failures that are recovered locally.

use crate::types::EventName;

/// A recovered failure. None of these ever reach the caller of a tracking
/// operation; they exist so failures stay observable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The conversion endpoint answered with a non-2xx status.
    DeliveryRejected {
        event: EventName,
        status: u16,
        body: String,
    },
    /// The conversion request never produced a response.
    DeliveryFailed { event: EventName, message: String },
    /// The optional backend analytics POST failed.
    BackendForwardFailed { message: String },
    /// The analytics tag function rejected a record.
    TagForwardFailed { message: String },
    /// A stored value could not be read or parsed and was treated as absent.
    StorageUnreadable { key: String, message: String },
    /// A value could not be written.
    StorageWriteFailed { key: String, message: String },
    /// IP lookup failed; the visit continues without a detected location.
    LocationUnavailable { message: String },
}

/// Receives [`Diagnostic`]s.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}
