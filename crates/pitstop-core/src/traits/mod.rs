// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port traits that isolate the pipeline from its host environment.
//!
//! Storage, cookies, HTTP, time and page metadata are all injected, so the
//! pipeline runs unchanged against real adapters or in-memory fakes.
//! Async ports use `#[async_trait]` for dynamic dispatch compatibility.

pub mod clock;
pub mod cookies;
pub mod diagnostics;
pub mod location;
pub mod page;
pub mod storage;
pub mod tag;
pub mod transport;

pub use clock::{Clock, SystemClock};
pub use cookies::{CookieJar, CookieReader};
pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use location::LocationProvider;
pub use page::{PageContext, StaticPage};
pub use storage::KeyValueStore;
pub use tag::AnalyticsTag;
pub use transport::{HttpResponse, HttpTransport};
