// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cookie access port and a `Cookie:` header backed implementation.

use std::collections::HashMap;

/// Read-only view of the document's cookies.
pub trait CookieReader: Send + Sync {
    /// Returns the value of cookie `name`, if set and non-empty.
    fn cookie(&self, name: &str) -> Option<String>;
}

/// Cookies parsed from a `name=value; name2=value2` string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: HashMap<String, String>,
}

impl CookieJar {
    /// Parse a `document.cookie` style string. Malformed pairs are skipped;
    /// for duplicate names the first occurrence wins.
    pub fn parse(raw: &str) -> Self {
        let mut cookies = HashMap::new();
        for pair in raw.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            cookies
                .entry(name.to_string())
                .or_insert_with(|| value.trim().to_string());
        }
        Self { cookies }
    }

    /// Set a cookie value directly.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }
}

impl CookieReader for CookieJar {
    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
    }
}
