// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Pitstop conversion attribution pipeline.
//!
//! This crate provides the port traits, error type, and shared domain and
//! wire types used throughout the Pitstop workspace. Adapters (SQLite storage,
//! reqwest transport, test fakes) implement the traits defined here.

pub mod error;
pub mod event;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PitstopError;
pub use event::{ContentItem, CustomData, EventBatch, TrackedEvent, UserData};
pub use types::{
    ActionSource, CustomerInfo, DetectedLocation, EventName, SessionId, StoredProfile, UserId,
};

// Re-export all ports at crate root.
pub use traits::{
    AnalyticsTag, Clock, CookieJar, CookieReader, Diagnostic, DiagnosticSink, HttpResponse,
    HttpTransport, KeyValueStore, LocationProvider, PageContext, StaticPage, SystemClock,
};
