// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered config loading with Figment.
//!
//! Lookup order: `./pitstop.toml` > `~/.config/pitstop/pitstop.toml` >
//! `/etc/pitstop/pitstop.toml`, with `PITSTOP_*` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PitstopConfig;

/// Sections addressable from the environment, in mapping order.
const ENV_SECTIONS: &[&str] = &[
    "pixel", "tracking", "backend", "whatsapp", "storage", "location",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pitstop/pitstop.toml`
/// 3. `~/.config/pitstop/pitstop.toml`
/// 4. `./pitstop.toml`
/// 5. `PITSTOP_*` environment variables
pub fn load_config() -> Result<PitstopConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<PitstopConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PitstopConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path, still honoring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<PitstopConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PitstopConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PitstopConfig::default()))
        .merge(Toml::file("/etc/pitstop/pitstop.toml"))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file("pitstop.toml"))
        .merge(env_provider())
}

/// `~/.config/pitstop/pitstop.toml`, when a config dir exists.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("pitstop").join("pitstop.toml"))
}

/// Environment provider mapping `PITSTOP_<SECTION>_<KEY>` to `section.key`.
///
/// Only the first underscore after the section name becomes a dot, so
/// `PITSTOP_PIXEL_ACCESS_TOKEN` maps to `pixel.access_token` and not
/// `pixel.access.token`.
fn env_provider() -> Env {
    Env::prefixed("PITSTOP_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_on_first_underscore() {
        assert_eq!(map_env_key("pixel_access_token"), "pixel.access_token");
        assert_eq!(map_env_key("tracking_retention_days"), "tracking.retention_days");
        assert_eq!(
            map_env_key("backend_analytics_endpoint"),
            "backend.analytics_endpoint"
        );
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }
}
