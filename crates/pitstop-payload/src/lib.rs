// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event payload assembly for the Pitstop attribution pipeline.
//!
//! Customer attributes are normalized and SHA-256 hashed before they leave
//! the process; only the user agent and the two ad-attribution cookies are
//! sent in the clear. The builder never refuses to build: a visitor about
//! whom nothing is known still produces a deliverable event.

pub mod custom_data;
pub mod customer;
pub mod event_builder;
pub mod normalize;
pub mod user_data;

pub use custom_data::CustomDataBuilder;
pub use customer::CustomerStore;
pub use event_builder::EventBuilder;
pub use normalize::{Normalizer, sha256_hex};
pub use user_data::UserDataBuilder;
