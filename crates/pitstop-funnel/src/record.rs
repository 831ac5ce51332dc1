// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redirect records as stored in the persistent list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the caller knows about a WhatsApp redirect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedirectRequest {
    /// Service the visitor asked about.
    pub service: String,
    /// Where the click came from (page section, campaign, ...).
    pub source: String,
    pub car: Option<String>,
    pub price: Option<f64>,
}

impl RedirectRequest {
    pub fn new(service: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn car(mut self, car: impl Into<String>) -> Self {
        self.car = Some(car.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}

/// One stored redirect, stamped with time and identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRecord {
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub session_id: String,
    pub user_id: String,
}
