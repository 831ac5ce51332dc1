// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization and SHA-256 hashing of customer attributes.
//!
//! Phone-like values (digits and `+ - ( )` or whitespace only) collapse to
//! their digits, with the dialing prefix added to bare 10-digit numbers.
//! Everything else is trimmed and lowercased. Values that normalize to the
//! empty string are treated as absent.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

static PHONE_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\-\+\(\)]+$").expect("static regex"));

/// Length of a national mobile number without the country prefix.
const NATIONAL_NUMBER_LEN: usize = 10;

/// Normalizes and hashes attribute values for `user_data`.
#[derive(Debug, Clone)]
pub struct Normalizer {
    country_code: String,
}

impl Normalizer {
    /// `country_code` is the dialing prefix without `+`, e.g. `91`.
    pub fn new(country_code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
        }
    }

    /// Canonical form of `value`, or `None` when nothing is left.
    pub fn normalize(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        let normalized = if PHONE_LIKE.is_match(trimmed) {
            let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
            if digits.len() == NATIONAL_NUMBER_LEN {
                format!("{}{digits}", self.country_code)
            } else {
                digits
            }
        } else {
            trimmed.to_lowercase()
        };

        (!normalized.is_empty()).then_some(normalized)
    }

    /// Lowercase hex SHA-256 of the normalized value.
    pub fn hash(&self, value: &str) -> Option<String> {
        self.normalize(value).map(|v| sha256_hex(&v))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new("91")
    }
}

/// Lowercase hex SHA-256 of `input`.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
