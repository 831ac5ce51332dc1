// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp click-to-chat links.

use reqwest::Url;

use pitstop_core::PitstopError;

const WA_BASE: &str = "https://wa.me/";

/// `https://wa.me/<digits>?text=<message>` for `number` in any punctuation.
pub fn whatsapp_link(number: &str, message: &str) -> Result<String, PitstopError> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(PitstopError::Config(format!(
            "WhatsApp number `{number}` contains no digits"
        )));
    }
    let url = Url::parse_with_params(&format!("{WA_BASE}{digits}"), &[("text", message)])
        .map_err(|e| PitstopError::Internal(format!("invalid WhatsApp link: {e}")))?;
    Ok(url.into())
}

/// Pre-filled chat message for a booking enquiry.
pub fn booking_message(service: &str, car: Option<&str>, price: Option<f64>) -> String {
    let mut message = format!("Hi Pitstop! I'd like to book {service}");
    if let Some(car) = car.filter(|c| !c.trim().is_empty()) {
        message.push_str(&format!(" for my {}", car.trim()));
    }
    if let Some(price) = price {
        message.push_str(&format!(" (quoted ₹{price:.0})"));
    }
    message.push('.');
    message
}
