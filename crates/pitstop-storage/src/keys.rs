// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage key names.

// Session store.
pub const SESSION_ID: &str = "pitstop_session_id";
pub const DETECTED_LOCATION: &str = "pitstop_detected_location";

/// Every key that belongs to one visit.
pub const SESSION_KEYS: &[&str] = &[SESSION_ID, DETECTED_LOCATION];

// Persistent store.
pub const USER_ID: &str = "pitstop_user_id";
pub const WHATSAPP_REDIRECTS: &str = "pitstop_whatsapp_redirects";
pub const USER_MOBILE: &str = "pitstop_user_mobile";
pub const CUSTOMER_PROFILE: &str = "pitstop_customer_profile";
