// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering for subcommand results.

use colored::Colorize;
use serde::Serialize;

use pitstop_core::{DetectedLocation, SessionId, UserId};
use pitstop_funnel::FunnelSummary;
use pitstop_tracker::{BookingOutcome, TrackOutcome};

/// Identifier pair for `identity --json`.
#[derive(Debug, Serialize)]
struct IdentityOutput<'a> {
    session_id: &'a str,
    user_id: &'a str,
}

fn status_mark(ok: bool, use_color: bool) -> String {
    match (ok, use_color) {
        (true, true) => "✓".green().to_string(),
        (false, true) => "✗".red().to_string(),
        (true, false) => "[OK]".to_string(),
        (false, false) => "[FAIL]".to_string(),
    }
}

fn header(title: &str) {
    println!();
    println!("  {title}");
    println!("  {}", "-".repeat(35));
}

pub fn print_track(outcome: &TrackOutcome, use_color: bool) {
    header("pitstop track");
    println!("    Event:     {}", outcome.event.event_name);
    println!("    Time:      {}", outcome.event.event_time);
    println!(
        "    Delivered: {} {}",
        status_mark(outcome.delivered, use_color),
        if outcome.delivered { "accepted" } else { "not delivered (see log)" }
    );
    println!();
}

pub fn print_booking(outcome: &BookingOutcome, use_color: bool) {
    header("pitstop book");
    println!("    Service:   {}", outcome.record.service);
    println!("    Source:    {}", outcome.record.source);
    if let Some(car) = &outcome.record.car {
        println!("    Car:       {car}");
    }
    println!("    Session:   {}", outcome.record.session_id);
    println!(
        "    Contact:   {}",
        status_mark(outcome.delivered, use_color)
    );
    match &outcome.link {
        Some(link) => println!("    WhatsApp:  {link}"),
        None => println!("    WhatsApp:  (no business number configured)"),
    }
    println!();
}

pub fn print_funnel(summary: &FunnelSummary, json: bool, use_color: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
        );
        return;
    }

    header("pitstop funnel");
    println!("    Redirects:        {}", summary.total_redirects);
    println!("    Sessions:         {}", summary.unique_sessions);
    println!("    Per session:      {:.2}", summary.redirects_per_session);

    if !summary.top_services.is_empty() {
        println!();
        println!("    Top services");
        for entry in &summary.top_services {
            let name = if use_color {
                entry.service.bold().to_string()
            } else {
                entry.service.clone()
            };
            println!("      {:>4}  {name}", entry.count);
        }
    }
    if !summary.conversion_by_source.is_empty() {
        println!();
        println!("    By source");
        for entry in &summary.conversion_by_source {
            println!("      {:>4}  {}", entry.count, entry.source);
        }
    }
    println!();
}

pub fn print_sweep(removed: usize, days: u32, use_color: bool) {
    let count = if use_color && removed > 0 {
        removed.to_string().yellow().to_string()
    } else {
        removed.to_string()
    };
    println!("pitstop: removed {count} redirect record(s) older than {days} day(s)");
}

pub fn print_identity(session: &SessionId, user: &UserId, json: bool) {
    if json {
        let out = IdentityOutput {
            session_id: &session.0,
            user_id: &user.0,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
        );
        return;
    }
    println!("session  {session}");
    println!("user     {user}");
}

pub fn print_saved(what: &str, saved: bool, use_color: bool) {
    let verdict = if saved { "saved" } else { "not saved" };
    println!("    {} {what} {verdict}", status_mark(saved, use_color));
}

pub fn print_location(location: Option<&DetectedLocation>, use_color: bool) {
    let Some(location) = location else {
        println!("    {} location unavailable", status_mark(false, use_color));
        return;
    };
    let parts: Vec<&str> = [
        location.city.as_deref(),
        location.region.as_deref(),
        location.postal_code.as_deref(),
        location.country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    println!("    {} {}", status_mark(true, use_color), parts.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_marks_have_no_escape_codes() {
        assert_eq!(status_mark(true, false), "[OK]");
        assert_eq!(status_mark(false, false), "[FAIL]");
    }

    #[test]
    fn identity_output_serializes() {
        let out = IdentityOutput {
            session_id: "sess_abc",
            user_id: "user_1_xyz",
        };
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("\"session_id\":\"sess_abc\""));
    }
}
