// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The customer-info accumulator kept in session and persistent storage.
//!
//! Three fragments are kept: the stored profile (persistent), the detected
//! location (session) and a captured mobile number (persistent).
//! [`CustomerStore::resolve`] merges them in that order, so the more specific
//! fragment wins on conflict.

use std::sync::Arc;

use tracing::debug;

use pitstop_core::{CustomerInfo, DetectedLocation, DiagnosticSink, KeyValueStore, StoredProfile};
use pitstop_storage::{keys, read_json, read_string, write_json};

/// Reads and writes customer-info fragments.
pub struct CustomerStore {
    session: Arc<dyn KeyValueStore>,
    persistent: Arc<dyn KeyValueStore>,
    sink: Arc<dyn DiagnosticSink>,
    default_country: String,
}

impl CustomerStore {
    pub fn new(
        session: Arc<dyn KeyValueStore>,
        persistent: Arc<dyn KeyValueStore>,
        sink: Arc<dyn DiagnosticSink>,
        default_country: impl Into<String>,
    ) -> Self {
        Self {
            session,
            persistent,
            sink,
            default_country: default_country.into(),
        }
    }

    /// Customer info to attach to an event.
    ///
    /// Explicit info is returned untouched. Otherwise the stored fragments are
    /// merged and the default country is filled in when a city, state or phone
    /// is known without one. `None` when nothing is known at all.
    pub fn resolve(&self, explicit: Option<CustomerInfo>) -> Option<CustomerInfo> {
        if let Some(info) = explicit {
            return Some(info);
        }

        let mut merged = self.profile().info;
        if let Some(location) = self.detected_location() {
            merged.merge(location.to_customer_info());
        }
        if let Some(mobile) = self.mobile() {
            merged.merge(CustomerInfo {
                phone: Some(mobile),
                ..CustomerInfo::default()
            });
        }

        if merged.is_empty() {
            return None;
        }
        if merged.country.is_none() && merged.has_regional_signal() {
            merged.country = Some(self.default_country.clone());
        }
        Some(merged)
    }

    /// The stored profile, or an empty one when missing or unreadable.
    pub fn profile(&self) -> StoredProfile {
        read_json(
            self.persistent.as_ref(),
            keys::CUSTOMER_PROFILE,
            self.sink.as_ref(),
        )
        .unwrap_or_default()
    }

    /// Read-modify-write the stored profile.
    pub fn update_profile(&self, update: impl FnOnce(&mut StoredProfile)) -> bool {
        let mut profile = self.profile();
        update(&mut profile);
        write_json(
            self.persistent.as_ref(),
            keys::CUSTOMER_PROFILE,
            &profile,
            self.sink.as_ref(),
        )
    }

    pub fn detected_location(&self) -> Option<DetectedLocation> {
        read_json(
            self.session.as_ref(),
            keys::DETECTED_LOCATION,
            self.sink.as_ref(),
        )
    }

    /// Remember the visit's location for the rest of the session.
    pub fn record_location(&self, location: &DetectedLocation) -> bool {
        debug!(city = ?location.city, region = ?location.region, "recording detected location");
        write_json(
            self.session.as_ref(),
            keys::DETECTED_LOCATION,
            location,
            self.sink.as_ref(),
        )
    }

    pub fn mobile(&self) -> Option<String> {
        read_string(self.persistent.as_ref(), keys::USER_MOBILE, self.sink.as_ref())
    }

    /// Persist a mobile number exactly as entered (trimmed). Blank input is
    /// ignored and returns `false`.
    pub fn capture_mobile(&self, phone: &str) -> bool {
        let phone = phone.trim();
        if phone.is_empty() {
            return false;
        }
        match self.persistent.set(keys::USER_MOBILE, phone) {
            Ok(()) => true,
            Err(e) => {
                self.sink.report(pitstop_core::Diagnostic::StorageWriteFailed {
                    key: keys::USER_MOBILE.to_string(),
                    message: e.to_string(),
                });
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pitstop_storage::MemoryStore;
    use pitstop_test_utils::RecordingSink;

    use super::*;

    struct Fixture {
        session: Arc<MemoryStore>,
        persistent: Arc<MemoryStore>,
        store: CustomerStore,
    }

    fn fixture() -> Fixture {
        let session = Arc::new(MemoryStore::new());
        let persistent = Arc::new(MemoryStore::new());
        let store = CustomerStore::new(
            session.clone(),
            persistent.clone(),
            Arc::new(RecordingSink::new()),
            "in",
        );
        Fixture {
            session,
            persistent,
            store,
        }
    }

    #[test]
    fn nothing_stored_resolves_to_none() {
        assert!(fixture().store.resolve(None).is_none());
    }

    #[test]
    fn explicit_info_is_used_as_is() {
        let f = fixture();
        f.store.capture_mobile("9876543210");
        let explicit = CustomerInfo {
            email: Some("a@b.co".into()),
            ..CustomerInfo::default()
        };
        assert_eq!(f.store.resolve(Some(explicit.clone())), Some(explicit));
    }

    #[test]
    fn fragments_merge_with_most_specific_last() {
        let f = fixture();
        f.store.update_profile(|p| {
            p.info.email = Some("x@y.in".into());
            p.info.city = Some("Mumbai".into());
            p.info.phone = Some("1111111111".into());
        });
        f.store.record_location(&DetectedLocation {
            city: Some("Pune".into()),
            region: Some("Maharashtra".into()),
            ..DetectedLocation::default()
        });
        f.store.capture_mobile(" 98765 43210 ");

        let info = f.store.resolve(None).unwrap();
        assert_eq!(info.email.as_deref(), Some("x@y.in"));
        assert_eq!(info.city.as_deref(), Some("Pune"));
        assert_eq!(info.state.as_deref(), Some("Maharashtra"));
        assert_eq!(info.phone.as_deref(), Some("98765 43210"));
        assert_eq!(info.country.as_deref(), Some("in"));
    }

    #[test]
    fn default_country_needs_a_regional_signal() {
        let f = fixture();
        f.store.update_profile(|p| p.info.email = Some("x@y.in".into()));
        let info = f.store.resolve(None).unwrap();
        assert!(info.country.is_none());
    }

    #[test]
    fn detected_country_is_not_overridden() {
        let f = fixture();
        f.store.record_location(&DetectedLocation {
            city: Some("Dubai".into()),
            country: Some("ae".into()),
            ..DetectedLocation::default()
        });
        assert_eq!(f.store.resolve(None).unwrap().country.as_deref(), Some("ae"));
    }

    #[test]
    fn corrupt_fragments_are_skipped() {
        let f = fixture();
        f.persistent.set(keys::CUSTOMER_PROFILE, "{broken").unwrap();
        f.session.set(keys::DETECTED_LOCATION, "nope").unwrap();
        f.store.capture_mobile("9876543210");

        let info = f.store.resolve(None).unwrap();
        assert_eq!(info.phone.as_deref(), Some("9876543210"));
        assert_eq!(info.country.as_deref(), Some("in"));
    }

    #[test]
    fn blank_mobile_is_rejected() {
        let f = fixture();
        assert!(!f.store.capture_mobile("   "));
        assert!(f.store.mobile().is_none());
    }
}
