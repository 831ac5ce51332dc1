// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the conversion API.
//!
//! Field names follow the remote schema exactly; every optional field is
//! omitted from the JSON when absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{ActionSource, EventName};

/// Identity block of an outbound event.
///
/// `em` through `ge` hold lowercase hex SHA-256 digests. The remaining fields
/// are transport metadata and opaque cookie tokens that the schema accepts
/// unhashed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub em: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<String>,
    #[serde(rename = "fn", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ln: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub st: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ge: Option<String>,
    pub client_user_agent: String,
    /// Populated by the receiving server, never by the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fbp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fbc: Option<String>,
}

/// A single line item in `custom_data.contents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_price: Option<f64>,
}

/// Business payload of an event. Passed through without hashing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<ContentItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_items: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Free-form keys not covered by the typed fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CustomData {
    /// Returns true when nothing would be serialized.
    pub fn is_empty(&self) -> bool {
        self == &CustomData::default()
    }
}

/// A fully built conversion event. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedEvent {
    pub event_name: EventName,
    /// Unix seconds at construction time.
    pub event_time: i64,
    pub event_source_url: String,
    pub action_source: ActionSource,
    pub user_data: UserData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
}

/// Request body accepted by the `/events` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBatch {
    pub data: Vec<TrackedEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_event_code: Option<String>,
}

impl EventBatch {
    /// Wrap a single event, tagging it with a test code when one is configured.
    pub fn single(event: TrackedEvent, test_event_code: Option<String>) -> Self {
        Self {
            data: vec![event],
            test_event_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> TrackedEvent {
        TrackedEvent {
            event_name: EventName::Lead,
            event_time: 1_760_000_000,
            event_source_url: "https://example.com/book".into(),
            action_source: ActionSource::Website,
            user_data: UserData {
                first_name: Some("abc".into()),
                client_user_agent: "agent/1.0".into(),
                ..UserData::default()
            },
            custom_data: None,
        }
    }

    #[test]
    fn event_serializes_with_schema_field_names() {
        let json = serde_json::to_value(sample_event()).unwrap();
        assert_eq!(json["event_name"], "Lead");
        assert_eq!(json["action_source"], "website");
        assert_eq!(json["user_data"]["fn"], "abc");
        assert_eq!(json["user_data"]["client_user_agent"], "agent/1.0");
        assert!(json["user_data"].get("em").is_none());
        assert!(json["user_data"].get("client_ip_address").is_none());
        assert!(json.get("custom_data").is_none());
    }

    #[test]
    fn custom_data_flattens_extra_keys() {
        let mut data = CustomData {
            currency: Some("INR".into()),
            value: Some(1499.0),
            ..CustomData::default()
        };
        data.extra
            .insert("booking_slot".into(), serde_json::json!("morning"));
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["currency"], "INR");
        assert_eq!(json["booking_slot"], "morning");
        assert!(json.get("content_ids").is_none());
    }

    #[test]
    fn batch_omits_missing_test_code() {
        let batch = EventBatch::single(sample_event(), None);
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["data"].as_array().map(Vec::len), Some(1));
        assert!(json.get("test_event_code").is_none());

        let batch = EventBatch::single(sample_event(), Some("TEST42".into()));
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["test_event_code"], "TEST42");
    }
}
