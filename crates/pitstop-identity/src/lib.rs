// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Visitor identity for the Pitstop attribution pipeline.
//!
//! A session id lives in the session-scoped store and a user id in the
//! persistent store. Both are created lazily on first read and returned
//! unchanged for as long as their store keeps them.

use std::sync::Arc;

use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::debug;

use pitstop_core::{Clock, Diagnostic, DiagnosticSink, KeyValueStore, SessionId, UserId};
use pitstop_storage::{keys, read_string};

const SESSION_TOKEN_LEN: usize = 16;
const USER_TOKEN_LEN: usize = 9;

/// Read-or-create access to the visitor's identifiers.
pub struct IdentityStore {
    session: Arc<dyn KeyValueStore>,
    persistent: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn DiagnosticSink>,
}

impl IdentityStore {
    pub fn new(
        session: Arc<dyn KeyValueStore>,
        persistent: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            session,
            persistent,
            clock,
            sink,
        }
    }

    /// The current session id, generating and storing one if none exists.
    ///
    /// Never fails. If the new id cannot be stored it is still returned, so a
    /// later call may produce a different id.
    pub fn session_id(&self) -> SessionId {
        SessionId(self.read_or_create(self.session.as_ref(), keys::SESSION_ID, || {
            format!("sess_{}", random_token(SESSION_TOKEN_LEN))
        }))
    }

    /// The long-lived user id, generating and storing one if none exists.
    ///
    /// The id embeds its creation time in Unix milliseconds.
    pub fn user_id(&self) -> UserId {
        let millis = self.clock.now().timestamp_millis();
        UserId(self.read_or_create(self.persistent.as_ref(), keys::USER_ID, || {
            format!("user_{millis}_{}", random_token(USER_TOKEN_LEN))
        }))
    }

    /// End the visit: forget the session id and everything else stored for
    /// this session, so the next read starts a new one.
    pub fn reset_session(&self) {
        for &key in keys::SESSION_KEYS {
            if let Err(e) = self.session.remove(key) {
                self.sink.report(Diagnostic::StorageWriteFailed {
                    key: key.to_string(),
                    message: e.to_string(),
                });
            }
        }
        debug!("session ended");
    }

    fn read_or_create(
        &self,
        store: &dyn KeyValueStore,
        key: &str,
        generate: impl FnOnce() -> String,
    ) -> String {
        if let Some(existing) = read_string(store, key, self.sink.as_ref()) {
            return existing;
        }

        let fresh = generate();
        match store.set(key, &fresh) {
            Ok(()) => debug!(key, id = %fresh, "generated identifier"),
            Err(e) => self.sink.report(Diagnostic::StorageWriteFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
        fresh
    }
}

/// `len` random ASCII alphanumerics.
fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
