// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Geolocation / IP lookup port.

use async_trait::async_trait;

use crate::error::PitstopError;
use crate::types::DetectedLocation;

/// Resolves the visitor's approximate location.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn locate(&self) -> Result<DetectedLocation, PitstopError>;
}
