// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External analytics tag port (e.g. a `gtag`-style function on the page).

use crate::error::PitstopError;

/// Forwards named interaction events to a third-party analytics tag.
///
/// Calls are best effort: callers log and discard errors.
pub trait AnalyticsTag: Send + Sync {
    fn emit(&self, event: &str, params: &serde_json::Value) -> Result<(), PitstopError>;
}
