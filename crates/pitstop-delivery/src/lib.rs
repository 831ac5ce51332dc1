// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery side of the Pitstop attribution pipeline.
//!
//! - [`ConversionClient`] posts built events to the conversion API
//! - [`ReqwestTransport`] is the production [`HttpTransport`](pitstop_core::HttpTransport)
//! - [`BackendForwarder`] copies local records to an optional backend
//! - [`TracingSink`] is the default diagnostics sink

pub mod client;
pub mod forward;
pub mod metrics;
pub mod sink;
pub mod transport;

pub use client::ConversionClient;
pub use forward::BackendForwarder;
pub use sink::TracingSink;
pub use transport::ReqwestTransport;
