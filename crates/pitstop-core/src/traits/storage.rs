// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value storage port.

use crate::error::PitstopError;

/// A string-to-string store with browser-storage semantics.
///
/// Two instances are wired into the pipeline: a session-scoped store that is
/// discarded with the visit, and a persistent store that survives restarts.
/// Operations are synchronous and are NOT atomic across processes sharing the
/// same backing data: a read-modify-write by one writer can be overwritten by
/// another (last writer wins).
pub trait KeyValueStore: Send + Sync {
    /// Returns the value for `key`, or `None` when it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, PitstopError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), PitstopError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), PitstopError>;
}
