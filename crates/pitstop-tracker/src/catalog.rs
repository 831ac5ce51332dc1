// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only service catalog.

use pitstop_config::model::ServiceConfig;
use pitstop_core::CustomData;
use pitstop_payload::CustomDataBuilder;

/// Currency every catalog price is quoted in.
pub const CURRENCY: &str = "INR";

/// Services offered, as configured under `[[services]]`.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    services: Vec<ServiceConfig>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<ServiceConfig>) -> Self {
        Self { services }
    }

    /// Exact id match.
    pub fn get(&self, id: &str) -> Option<&ServiceConfig> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Match on id, then on display name ignoring case.
    pub fn find(&self, query: &str) -> Option<&ServiceConfig> {
        let query = query.trim();
        self.get(query).or_else(|| {
            self.services
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(query))
        })
    }

    /// Content fields describing `service`, priced in [`CURRENCY`] when the
    /// catalog has a price.
    pub fn custom_data_for(&self, service: &ServiceConfig) -> CustomData {
        let mut builder = CustomDataBuilder::new()
            .content_name(&service.name)
            .content_type("product")
            .content_id(&service.id);
        if let Some(category) = &service.category {
            builder = builder.content_category(category);
        }
        if let Some(price) = service.price {
            builder = builder.value(price).currency(CURRENCY);
        }
        builder.build()
    }
}
