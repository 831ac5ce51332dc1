// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Pitstop pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! rejected at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level Pitstop configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with `PITSTOP_*`
/// environment overrides. Every section is optional; the conversion
/// credentials are checked when the delivery client is constructed.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PitstopConfig {
    /// Conversion API credentials and endpoint.
    #[serde(default)]
    pub pixel: PixelConfig,

    /// Payload normalization and local analytics behavior.
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Optional secondary analytics backend.
    #[serde(default)]
    pub backend: BackendConfig,

    /// WhatsApp deep-link settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Persistent store location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// IP lookup used to enrich customer info.
    #[serde(default)]
    pub location: LocationConfig,

    /// Read-only service catalog.
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

/// Conversion API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PixelConfig {
    /// Pixel (dataset) identifier. Required for delivery.
    #[serde(default)]
    pub pixel_id: Option<String>,

    /// Access token for the conversion API. Required for delivery.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Graph API version segment, e.g. `v18.0`.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Host serving the conversion API.
    #[serde(default = "default_host")]
    pub host: String,

    /// When set, events are routed to the test-events tool instead of production.
    #[serde(default)]
    pub test_event_code: Option<String>,

    /// HTTP timeout for a single delivery attempt.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PixelConfig {
    fn default() -> Self {
        Self {
            pixel_id: None,
            access_token: None,
            api_version: default_api_version(),
            host: default_host(),
            test_event_code: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_version() -> String {
    "v18.0".to_string()
}

fn default_host() -> String {
    "graph.facebook.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Tracking behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrackingConfig {
    /// Development mode: delivery failures are logged with status and body.
    #[serde(default)]
    pub development: bool,

    /// Country assumed when a regional signal exists without a country.
    #[serde(default = "default_country")]
    pub default_country: String,

    /// Dialing prefix prepended to bare 10-digit phone numbers before hashing.
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Redirect records older than this many days are swept.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            development: false,
            default_country: default_country(),
            country_code: default_country_code(),
            retention_days: default_retention_days(),
            log_level: default_log_level(),
        }
    }
}

fn default_country() -> String {
    "in".to_string()
}

fn default_country_code() -> String {
    "91".to_string()
}

/// Longest accepted retention window, one hundred years.
pub const MAX_RETENTION_DAYS: u32 = 36_500;

fn default_retention_days() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Secondary analytics backend configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Endpoint receiving a copy of each redirect record. `None` disables forwarding.
    #[serde(default)]
    pub analytics_endpoint: Option<String>,
}

/// WhatsApp deep-link configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Business number in international format, digits only (e.g. `919876543210`).
    #[serde(default)]
    pub business_number: Option<String>,
}

/// Persistent store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite file backing the persistent key/value store.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("pitstop").join("pitstop.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("pitstop.db"))
        .to_string_lossy()
        .into_owned()
}

/// IP lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LocationConfig {
    /// Whether to look up the visitor's location at all.
    #[serde(default = "default_location_enabled")]
    pub enabled: bool,

    /// JSON endpoint returning `city`, `region`, `country_code`, `postal`.
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            enabled: default_location_enabled(),
            lookup_url: default_lookup_url(),
        }
    }
}

fn default_location_enabled() -> bool {
    true
}

fn default_lookup_url() -> String {
    "https://ipapi.co/json/".to_string()
}

/// One entry of the service catalog.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Stable identifier, sent as a content id.
    pub id: String,

    /// Display name, sent as `content_name`.
    pub name: String,

    /// Price in the catalog currency.
    #[serde(default)]
    pub price: Option<f64>,

    /// Category, sent as `content_category`.
    #[serde(default)]
    pub category: Option<String>,
}
