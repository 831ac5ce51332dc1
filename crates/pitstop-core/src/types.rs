// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the identity, payload, delivery and funnel crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Identifier for a single visit, scoped to the session store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Long-lived identifier for a browser profile, scoped to the persistent store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed set of conversion events understood by the conversion API.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum EventName {
    PageView,
    Lead,
    Contact,
    CompleteRegistration,
    SubmitApplication,
    Schedule,
    AddToCart,
    InitiateCheckout,
    Purchase,
    Subscribe,
    FindLocation,
    CustomizeProduct,
}

/// Where a conversion happened. Browser-originated events are always `website`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionSource {
    Website,
}

/// Customer attributes accumulated over a visit.
///
/// Every field is optional. Fragments are merged with [`CustomerInfo::merge`],
/// where present fields of the newer fragment overwrite older values and
/// absent fields leave them untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl CustomerInfo {
    /// Returns true when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self == &CustomerInfo::default()
    }

    /// Overwrite fields with every field present in `newer`.
    pub fn merge(&mut self, newer: CustomerInfo) {
        fn take(slot: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.email, newer.email);
        take(&mut self.phone, newer.phone);
        take(&mut self.first_name, newer.first_name);
        take(&mut self.last_name, newer.last_name);
        take(&mut self.city, newer.city);
        take(&mut self.state, newer.state);
        take(&mut self.country, newer.country);
        take(&mut self.postal_code, newer.postal_code);
        take(&mut self.date_of_birth, newer.date_of_birth);
        take(&mut self.gender, newer.gender);
    }

    /// Whether a city, state or phone number is known.
    ///
    /// The business only operates in India, so any of these signals implies
    /// the default country.
    pub fn has_regional_signal(&self) -> bool {
        self.city.is_some() || self.state.is_some() || self.phone.is_some()
    }
}

/// Location detected for the current visit (IP lookup or explicit pick).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl DetectedLocation {
    /// Project the location onto customer attributes.
    pub fn to_customer_info(&self) -> CustomerInfo {
        CustomerInfo {
            city: self.city.clone(),
            state: self.region.clone(),
            country: self.country.clone(),
            postal_code: self.postal_code.clone(),
            ..CustomerInfo::default()
        }
    }
}

/// Generic profile fragment persisted between visits.
///
/// Only `info` feeds hashed user data. The preference fields are learned from
/// WhatsApp redirects and are never sent to the conversion API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProfile {
    #[serde(flatten)]
    pub info: CustomerInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_car: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_service: Option<String>,
}
