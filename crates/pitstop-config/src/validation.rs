// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation.
//!
//! Checks the constraints serde cannot express. All failures are collected
//! rather than stopping at the first one.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::diagnostic::ConfigError;
use crate::model::{MAX_RETENTION_DAYS, PitstopConfig};

static API_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+\.\d+$").expect("static regex"));

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &PitstopConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    // Credentials may be absent (delivery refuses to start), but never blank.
    if let Some(id) = config.pixel.pixel_id.as_deref() {
        if id.trim().is_empty() || !id.trim().chars().all(|c| c.is_ascii_digit()) {
            fail(format!("pixel.pixel_id `{id}` must be a non-empty string of digits"));
        }
    }
    if let Some(token) = config.pixel.access_token.as_deref() {
        if token.trim().is_empty() {
            fail("pixel.access_token must not be empty when set".to_string());
        }
    }

    if !API_VERSION.is_match(&config.pixel.api_version) {
        fail(format!(
            "pixel.api_version `{}` must look like `v18.0`",
            config.pixel.api_version
        ));
    }

    let host = config.pixel.host.trim();
    if host.is_empty() || host.contains("://") || host.contains('/') {
        fail(format!(
            "pixel.host `{}` must be a bare host name without scheme or path",
            config.pixel.host
        ));
    }

    if config.pixel.timeout_secs == 0 {
        fail("pixel.timeout_secs must be at least 1".to_string());
    }

    let days = config.tracking.retention_days;
    if days == 0 {
        fail("tracking.retention_days must be at least 1".to_string());
    } else if days > MAX_RETENTION_DAYS {
        fail(format!(
            "tracking.retention_days {days} exceeds the maximum of {MAX_RETENTION_DAYS}"
        ));
    }

    let code = &config.tracking.country_code;
    if code.is_empty() || code.len() > 3 || !code.chars().all(|c| c.is_ascii_digit()) {
        fail(format!(
            "tracking.country_code `{code}` must be 1-3 digits without a leading +"
        ));
    }

    let country = &config.tracking.default_country;
    if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
        fail(format!(
            "tracking.default_country `{country}` must be a two-letter ISO code"
        ));
    }

    if let Some(endpoint) = config.backend.analytics_endpoint.as_deref() {
        if !is_http_url(endpoint) {
            fail(format!(
                "backend.analytics_endpoint `{endpoint}` must be an http(s) URL"
            ));
        }
    }

    if config.location.enabled && !is_http_url(&config.location.lookup_url) {
        fail(format!(
            "location.lookup_url `{}` must be an http(s) URL",
            config.location.lookup_url
        ));
    }

    if let Some(number) = config.whatsapp.business_number.as_deref() {
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            fail(format!(
                "whatsapp.business_number `{number}` must contain digits only"
            ));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let mut seen_ids = HashSet::new();
    for (i, service) in config.services.iter().enumerate() {
        if service.id.trim().is_empty() {
            fail(format!("services[{i}].id must not be empty"));
        } else if !seen_ids.insert(service.id.as_str()) {
            fail(format!("duplicate service id `{}` in [[services]]", service.id));
        }
        if service.name.trim().is_empty() {
            fail(format!("services[{i}].name must not be empty"));
        }
        if let Some(price) = service.price {
            if !price.is_finite() || price < 0.0 {
                fail(format!(
                    "services[{i}].price must be a non-negative number, got {price}"
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}
