// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small in-memory fakes for the synchronous ports.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use pitstop_core::{
    AnalyticsTag, Clock, Diagnostic, DiagnosticSink, KeyValueStore, PitstopError,
};

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// A clock stopped at the Unix epoch.
    pub fn epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Current reading, without importing [`Clock`].
    pub fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now_utc()
    }
}

/// Captures every reported [`Diagnostic`].
#[derive(Debug, Default)]
pub struct RecordingSink {
    reported: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.reported.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.reported.lock().unwrap().push(diagnostic);
    }
}

/// Captures tag emissions, or rejects them all when built with [`RecordingTag::failing`].
#[derive(Debug, Default)]
pub struct RecordingTag {
    emitted: Mutex<Vec<(String, serde_json::Value)>>,
    fail: bool,
}

impl RecordingTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn emitted(&self) -> Vec<(String, serde_json::Value)> {
        self.emitted.lock().unwrap().clone()
    }
}

impl AnalyticsTag for RecordingTag {
    fn emit(&self, event: &str, params: &serde_json::Value) -> Result<(), PitstopError> {
        if self.fail {
            return Err(PitstopError::Internal("tag function not loaded".into()));
        }
        self.emitted
            .lock()
            .unwrap()
            .push((event.to_string(), params.clone()));
        Ok(())
    }
}

/// A store where every read and write fails, like a browser with storage
/// disabled.
#[derive(Debug, Default)]
pub struct FailingStore;

impl FailingStore {
    pub fn new() -> Self {
        Self
    }

    fn error() -> PitstopError {
        PitstopError::Storage {
            source: "storage disabled".into(),
        }
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, PitstopError> {
        Err(Self::error())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), PitstopError> {
        Err(Self::error())
    }

    fn remove(&self, _key: &str) -> Result<(), PitstopError> {
        Err(Self::error())
    }
}
