// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Pitstop integration tests.
//!
//! Provides fakes for every port and a harness that wires a complete tracker
//! over them, so tests run without a network, a database or a real clock.
//!
//! # Components
//!
//! - [`MockTransport`] - scripted HTTP transport capturing requests
//! - [`FixedClock`], [`RecordingSink`], [`RecordingTag`], [`FailingStore`] - port fakes
//! - [`TestHarness`] - a full tracker with handles to all of the above

pub mod fakes;
pub mod harness;
pub mod mock_transport;

pub use fakes::{FailingStore, FixedClock, RecordingSink, RecordingTag};
pub use harness::{TestHarness, TestHarnessBuilder, start_time};
pub use mock_transport::{CapturedRequest, MockTransport};
