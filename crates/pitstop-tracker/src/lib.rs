// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion tracking facade for the Pitstop attribution pipeline.
//!
//! [`ConversionTracker`] is what call sites use: twelve `track_*` operations,
//! the WhatsApp booking flow, and customer-info capture. It is built once
//! from configuration and a set of [`Ports`].

pub mod catalog;
pub mod locator;
pub mod tracker;

pub use catalog::{CURRENCY, ServiceCatalog};
pub use locator::IpLocator;
pub use tracker::{Booking, BookingOutcome, ConversionTracker, Ports, TrackOptions, TrackOutcome};
