// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Pitstop attribution pipeline.

use thiserror::Error;

/// The primary error type used across Pitstop ports and core operations.
///
/// Only [`PitstopError::Config`] is ever allowed to reach a caller of the
/// public tracking operations; everything else is converted into a boolean,
/// an empty value, or a diagnostic at the crate boundary.
#[derive(Debug, Error)]
pub enum PitstopError {
    /// Configuration errors (missing pixel id, missing access token, bad URLs).
    #[error("configuration error: {0}")]
    Config(String),

    /// Key/value storage errors (database failure, poisoned lock).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// HTTP transport errors (connection refused, timeout, TLS failure).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IP/geolocation lookup failed or returned an unusable body.
    #[error("location lookup failed: {0}")]
    Location(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for PitstopError {
    fn from(err: serde_json::Error) -> Self {
        PitstopError::Serialization(err.to_string())
    }
}
