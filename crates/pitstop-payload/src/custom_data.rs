// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fluent construction of [`CustomData`].

use pitstop_core::{ContentItem, CustomData};

/// Builder for the unhashed business payload of an event.
#[derive(Debug, Clone, Default)]
pub struct CustomDataBuilder {
    data: CustomData,
}

impl CustomDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.data.currency = Some(currency.into());
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.data.value = Some(value);
        self
    }

    pub fn content_name(mut self, name: impl Into<String>) -> Self {
        self.data.content_name = Some(name.into());
        self
    }

    pub fn content_type(mut self, kind: impl Into<String>) -> Self {
        self.data.content_type = Some(kind.into());
        self
    }

    pub fn content_category(mut self, category: impl Into<String>) -> Self {
        self.data.content_category = Some(category.into());
        self
    }

    pub fn content_id(mut self, id: impl Into<String>) -> Self {
        self.data.content_ids.push(id.into());
        self
    }

    /// Add a line item. `num_items` tracks the total quantity unless set
    /// explicitly afterwards.
    pub fn item(mut self, id: impl Into<String>, quantity: u32, item_price: Option<f64>) -> Self {
        self.data.contents.push(ContentItem {
            id: id.into(),
            quantity,
            item_price,
        });
        self.data.num_items = Some(self.data.contents.iter().map(|c| c.quantity).sum());
        self
    }

    pub fn num_items(mut self, n: u32) -> Self {
        self.data.num_items = Some(n);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.data.status = Some(status.into());
        self
    }

    /// Free-form key outside the typed fields.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.data.extra.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> CustomData {
        self.data
    }
}
