// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction of complete [`TrackedEvent`]s.

use std::sync::Arc;

use tracing::debug;

use pitstop_core::{
    ActionSource, Clock, CustomData, CustomerInfo, EventName, PageContext, TrackedEvent,
};

use crate::user_data::UserDataBuilder;

/// Stamps events with time and page, and attaches hashed user data.
pub struct EventBuilder {
    clock: Arc<dyn Clock>,
    page: Arc<dyn PageContext>,
    user_data: UserDataBuilder,
}

impl EventBuilder {
    pub fn new(clock: Arc<dyn Clock>, page: Arc<dyn PageContext>, user_data: UserDataBuilder) -> Self {
        Self {
            clock,
            page,
            user_data,
        }
    }

    /// Build an event. An empty `custom_data` is dropped from the payload.
    pub fn build(
        &self,
        event_name: EventName,
        customer: Option<&CustomerInfo>,
        custom_data: Option<CustomData>,
    ) -> TrackedEvent {
        let event = TrackedEvent {
            event_name,
            event_time: self.clock.now().timestamp(),
            event_source_url: self.page.current_url(),
            action_source: ActionSource::Website,
            user_data: self.user_data.build(customer),
            custom_data: custom_data.filter(|data| !data.is_empty()),
        };
        debug!(
            event = %event.event_name,
            event_time = event.event_time,
            has_customer = customer.is_some(),
            "event payload built"
        );
        event
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pitstop_core::{CookieJar, StaticPage};
    use pitstop_test_utils::FixedClock;

    use super::*;
    use crate::custom_data::CustomDataBuilder;
    use crate::normalize::Normalizer;

    fn builder() -> EventBuilder {
        let page = Arc::new(StaticPage::new("ua/1", "https://pitstop.test/services"));
        EventBuilder::new(
            Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            )),
            page.clone(),
            UserDataBuilder::new(Normalizer::default(), page, Arc::new(CookieJar::default())),
        )
    }

    #[test]
    fn stamps_time_page_and_source() {
        let event = builder().build(EventName::PageView, None, None);
        assert_eq!(event.event_time, 1_709_294_400);
        assert_eq!(event.event_source_url, "https://pitstop.test/services");
        assert_eq!(event.action_source, ActionSource::Website);
        assert!(event.custom_data.is_none());

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_name"], "PageView");
        assert_eq!(json["action_source"], "website");
        assert_eq!(json["user_data"]["client_user_agent"], "ua/1");
        assert!(json.get("custom_data").is_none());
    }

    #[test]
    fn empty_custom_data_is_dropped() {
        let event = builder().build(EventName::Lead, None, Some(CustomData::default()));
        assert!(event.custom_data.is_none());
    }

    #[test]
    fn custom_data_passes_through_unhashed() {
        let data = CustomDataBuilder::new()
            .currency("INR")
            .value(1499.0)
            .content_name("AC Service")
            .build();
        let event = builder().build(EventName::Purchase, None, Some(data.clone()));
        assert_eq!(event.custom_data, Some(data));
    }
}
