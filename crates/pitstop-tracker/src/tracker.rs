// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversion tracking facade.
//!
//! Each tracked action runs `Idle -> PayloadBuilt -> Delivered(ok | failed)`.
//! Nothing here returns an error to the caller once construction succeeded.

use std::sync::Arc;

use tracing::{debug, info};

use pitstop_config::PitstopConfig;
use pitstop_core::{
    AnalyticsTag, Clock, CookieReader, CustomData, CustomerInfo, DetectedLocation, Diagnostic,
    DiagnosticSink, EventName, HttpTransport, KeyValueStore, LocationProvider, PageContext,
    PitstopError, TrackedEvent,
};
use pitstop_delivery::{BackendForwarder, ConversionClient};
use pitstop_funnel::{
    FunnelSummary, RedirectLog, RedirectRecord, RedirectRequest, booking_message, whatsapp_link,
};
use pitstop_identity::IdentityStore;
use pitstop_payload::{
    CustomDataBuilder, CustomerStore, EventBuilder, Normalizer, UserDataBuilder,
};

use crate::catalog::ServiceCatalog;

/// Host environment the tracker runs against.
pub struct Ports {
    /// Cleared when the visit ends.
    pub session: Arc<dyn KeyValueStore>,
    /// Survives across visits.
    pub persistent: Arc<dyn KeyValueStore>,
    pub cookies: Arc<dyn CookieReader>,
    pub transport: Arc<dyn HttpTransport>,
    pub clock: Arc<dyn Clock>,
    pub page: Arc<dyn PageContext>,
    pub sink: Arc<dyn DiagnosticSink>,
    pub tag: Option<Arc<dyn AnalyticsTag>>,
}

/// Optional inputs to a tracked event.
#[derive(Debug, Clone, Default)]
pub struct TrackOptions {
    /// Used as-is when given; otherwise stored fragments are resolved.
    pub customer: Option<CustomerInfo>,
    pub custom_data: Option<CustomData>,
}

impl TrackOptions {
    pub fn customer(mut self, customer: CustomerInfo) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn custom_data(mut self, custom_data: CustomData) -> Self {
        self.custom_data = Some(custom_data);
        self
    }
}

/// The event that was built and whether the endpoint accepted it.
#[derive(Debug, Clone)]
pub struct TrackOutcome {
    pub event: TrackedEvent,
    pub delivered: bool,
}

/// A "Book via WhatsApp" click.
#[derive(Debug, Clone, Default)]
pub struct Booking {
    /// Catalog id, catalog name, or free text.
    pub service: String,
    pub source: String,
    pub car: Option<String>,
    pub customer: Option<CustomerInfo>,
}

/// Everything a booking click produced.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub record: RedirectRecord,
    pub delivered: bool,
    /// `None` when no business number is configured.
    pub link: Option<String>,
}

/// Facade over identity, payload building, delivery and the redirect log.
pub struct ConversionTracker {
    identity: Arc<IdentityStore>,
    customers: Arc<CustomerStore>,
    events: EventBuilder,
    client: ConversionClient,
    redirects: RedirectLog,
    catalog: ServiceCatalog,
    whatsapp_number: Option<String>,
    retention_days: u32,
    sink: Arc<dyn DiagnosticSink>,
}

macro_rules! track_helpers {
    ($($(#[$doc:meta])* $name:ident => $event:ident;)*) => {
        $(
            $(#[$doc])*
            pub async fn $name(&self, options: TrackOptions) -> TrackOutcome {
                self.track(EventName::$event, options).await
            }
        )*
    };
}

impl ConversionTracker {
    /// Wire the pipeline from configuration.
    ///
    /// Fails only when the conversion credentials are missing.
    pub fn new(config: &PitstopConfig, ports: Ports) -> Result<Self, PitstopError> {
        let client =
            ConversionClient::new(&config.pixel, ports.transport.clone(), ports.sink.clone())?;

        let identity = Arc::new(IdentityStore::new(
            ports.session.clone(),
            ports.persistent.clone(),
            ports.clock.clone(),
            ports.sink.clone(),
        ));
        let customers = Arc::new(CustomerStore::new(
            ports.session.clone(),
            ports.persistent.clone(),
            ports.sink.clone(),
            config.tracking.default_country.clone(),
        ));
        let events = EventBuilder::new(
            ports.clock.clone(),
            ports.page.clone(),
            UserDataBuilder::new(
                Normalizer::new(config.tracking.country_code.clone()),
                ports.page.clone(),
                ports.cookies.clone(),
            ),
        );

        let mut redirects = RedirectLog::new(
            ports.persistent.clone(),
            identity.clone(),
            customers.clone(),
            ports.clock.clone(),
            BackendForwarder::new(
                config.backend.analytics_endpoint.clone(),
                ports.transport.clone(),
                ports.sink.clone(),
            ),
            ports.sink.clone(),
        );
        if let Some(tag) = ports.tag {
            redirects = redirects.with_tag(tag);
        }

        Ok(Self {
            identity,
            customers,
            events,
            client,
            redirects,
            catalog: ServiceCatalog::new(config.services.clone()),
            whatsapp_number: config.whatsapp.business_number.clone(),
            retention_days: config.tracking.retention_days,
            sink: ports.sink,
        })
    }

    pub fn identity(&self) -> &IdentityStore {
        &self.identity
    }

    pub fn customers(&self) -> &CustomerStore {
        &self.customers
    }

    pub fn redirects(&self) -> &RedirectLog {
        &self.redirects
    }

    /// Build and deliver one event.
    pub async fn track(&self, event: EventName, options: TrackOptions) -> TrackOutcome {
        let customer = self.customers.resolve(options.customer);
        let built = self
            .events
            .build(event, customer.as_ref(), options.custom_data);
        let session = self.identity.session_id();
        debug!(%event, %session, "tracking event");
        let delivered = self.client.send_event(built.clone()).await;
        TrackOutcome {
            event: built,
            delivered,
        }
    }

    track_helpers! {
        track_page_view => PageView;
        /// A contact form or enquiry was submitted.
        track_lead => Lead;
        track_contact => Contact;
        track_complete_registration => CompleteRegistration;
        track_submit_application => SubmitApplication;
        /// An appointment slot was booked.
        track_schedule => Schedule;
        track_add_to_cart => AddToCart;
        track_initiate_checkout => InitiateCheckout;
        track_purchase => Purchase;
        track_subscribe => Subscribe;
        track_find_location => FindLocation;
        track_customize_product => CustomizeProduct;
    }

    /// Record a WhatsApp booking click.
    ///
    /// The Contact event and the local redirect append run concurrently and
    /// independently: a failed delivery never prevents the local record.
    pub async fn book_via_whatsapp(&self, booking: Booking) -> BookingOutcome {
        let service = self.catalog.find(&booking.service);
        let (service_name, price, custom_data) = match service {
            Some(service) => (
                service.name.clone(),
                service.price,
                self.catalog.custom_data_for(service),
            ),
            None => (
                booking.service.trim().to_string(),
                None,
                CustomDataBuilder::new()
                    .content_name(booking.service.trim())
                    .build(),
            ),
        };

        let mut request = RedirectRequest::new(service_name.clone(), booking.source);
        request.car = booking.car.clone();
        request.price = price;

        let options = TrackOptions {
            customer: booking.customer,
            custom_data: Some(custom_data),
        };
        let (outcome, record) = tokio::join!(
            self.track(EventName::Contact, options),
            self.redirects.track_whatsapp_redirect(request),
        );

        let link = self.whatsapp_number.as_deref().and_then(|number| {
            let message = booking_message(&service_name, booking.car.as_deref(), price);
            whatsapp_link(number, &message).ok()
        });

        info!(
            service = %record.service,
            source = %record.source,
            delivered = outcome.delivered,
            "WhatsApp booking recorded"
        );
        BookingOutcome {
            record,
            delivered: outcome.delivered,
            link,
        }
    }

    /// Remember the visitor's mobile number for future events.
    pub fn capture_mobile_number(&self, phone: &str) -> bool {
        self.customers.capture_mobile(phone)
    }

    /// Remember an explicitly chosen or detected location for this visit.
    pub fn record_location(&self, location: &DetectedLocation) -> bool {
        self.customers.record_location(location)
    }

    /// Look up the visitor's location once per session.
    ///
    /// A location already recorded this session is returned without a lookup.
    /// Lookup failures are reported and yield `None`.
    pub async fn enrich_location(&self, provider: &dyn LocationProvider) -> Option<DetectedLocation> {
        if let Some(known) = self.customers.detected_location() {
            return Some(known);
        }
        match provider.locate().await {
            Ok(location) => {
                self.customers.record_location(&location);
                Some(location)
            }
            Err(e) => {
                self.sink.report(Diagnostic::LocationUnavailable {
                    message: e.to_string(),
                });
                None
            }
        }
    }

    pub fn funnel_summary(&self) -> FunnelSummary {
        self.redirects.conversion_funnel_data()
    }

    /// Apply the configured retention window to the redirect list.
    pub fn sweep(&self) -> usize {
        self.redirects.clear_old_data(self.retention_days)
    }
}
