// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local funnel analytics for the Pitstop attribution pipeline.
//!
//! WhatsApp redirects are appended to a list in persistent storage,
//! aggregated on demand and pruned by a retention sweep.

pub mod log;
pub mod record;
pub mod summary;
pub mod whatsapp;

pub use log::RedirectLog;
pub use record::{RedirectRecord, RedirectRequest};
pub use summary::{FunnelSummary, ServiceCount, SourceCount};
pub use whatsapp::{booking_message, whatsapp_link};
