// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pitstop - conversion tracking and attribution from the command line.
//!
//! This is the binary entry point. It wires the tracker to a local SQLite
//! database and the real HTTP transport, then runs one subcommand.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pitstop_config::{ConfigError, MAX_RETENTION_DAYS};
use pitstop_core::{EventName, PitstopError};

/// Pitstop - conversion tracking and attribution.
#[derive(Parser, Debug)]
#[command(name = "pitstop", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Start a new session before running the command.
    #[arg(long, global = true)]
    new_session: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    /// Page URL reported as the event source.
    #[arg(long, global = true, default_value = "https://pitstop.local/")]
    page_url: String,

    /// Raw `Cookie:` header visible to the payload builder.
    #[arg(long, global = true)]
    cookies: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Send one conversion event.
    Track(TrackArgs),
    /// Record a "Book via WhatsApp" click and print the chat link.
    Book(BookArgs),
    /// Remember the visitor's mobile number.
    Mobile {
        /// Number as entered, any punctuation.
        phone: String,
    },
    /// Look up and remember the visitor's location for this session.
    Locate,
    /// Show aggregated redirect statistics.
    Funnel {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Drop redirect records older than the retention window.
    Sweep {
        /// Retention in days; defaults to `tracking.retention_days`.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_RETENTION_DAYS)))]
        days: Option<u32>,
    },
    /// Show the current session and user identifiers.
    Identity {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Customer attributes accepted on the command line.
#[derive(Args, Debug, Default)]
struct CustomerArgs {
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    /// Date of birth as `YYYYMMDD`.
    #[arg(long)]
    date_of_birth: Option<String>,
    /// `m` or `f`.
    #[arg(long)]
    gender: Option<String>,
}

#[derive(Args, Debug)]
struct TrackArgs {
    /// Event name, e.g. `PageView` or `Lead`.
    #[arg(value_parser = parse_event_name)]
    event: EventName,

    /// Monetary value of the conversion.
    #[arg(long)]
    value: Option<f64>,

    /// ISO currency code; defaults to INR when a value is given.
    #[arg(long)]
    currency: Option<String>,

    #[arg(long)]
    content_name: Option<String>,

    /// Item count, e.g. services in a cart.
    #[arg(long)]
    num_items: Option<u32>,

    /// Free-text status, e.g. `confirmed`.
    #[arg(long)]
    status: Option<String>,

    /// Extra custom data as `KEY=VALUE`; may be repeated.
    #[arg(long = "data", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    extra: Vec<(String, String)>,

    #[command(flatten)]
    customer: CustomerArgs,
}

#[derive(Args, Debug)]
struct BookArgs {
    /// Catalog id, catalog name, or free text.
    service: String,

    /// Where the click came from.
    #[arg(long, default_value = "cli")]
    source: String,

    /// Car model the booking is for.
    #[arg(long)]
    car: Option<String>,

    #[command(flatten)]
    customer: CustomerArgs,
}

fn parse_event_name(raw: &str) -> Result<EventName, String> {
    raw.parse::<EventName>().map_err(|_| {
        let known: Vec<String> = <EventName as strum::IntoEnumIterator>::iter()
            .map(|e| e.to_string())
            .collect();
        format!("unknown event `{raw}` (expected one of: {})", known.join(", "))
    })
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

/// Initialize the tracing subscriber, honoring `RUST_LOG` when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pitstop={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => pitstop_config::load_and_validate_path(path),
        None => pitstop_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            pitstop_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.tracking.log_level);
    pitstop_delivery::metrics::register_metrics();

    match commands::run(&cli, &config).await {
        Ok(()) => {}
        Err(PitstopError::Config(message)) => {
            pitstop_config::render_errors(&[ConfigError::Validation { message }]);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("pitstop: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn parses_track_with_customer_fields() {
        let cli = Cli::try_parse_from([
            "pitstop",
            "track",
            "Lead",
            "--email",
            "a@b.com",
            "--value",
            "499",
        ])
        .unwrap();
        match cli.command {
            Commands::Track(args) => {
                assert_eq!(args.event, EventName::Lead);
                assert_eq!(args.value, Some(499.0));
                assert_eq!(args.customer.email.as_deref(), Some("a@b.com"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_event() {
        let err = Cli::try_parse_from(["pitstop", "track", "Checkout"]).unwrap_err();
        assert!(err.to_string().contains("unknown event `Checkout`"));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["pitstop", "funnel", "--json", "--plain", "--new-session"])
            .unwrap();
        assert!(cli.plain);
        assert!(cli.new_session);
        assert!(matches!(cli.command, Commands::Funnel { json: true }));
    }

    #[test]
    fn book_source_defaults_to_cli() {
        let cli = Cli::try_parse_from(["pitstop", "book", "ac-service", "--car", "Swift"]).unwrap();
        match cli.command {
            Commands::Book(args) => {
                assert_eq!(args.source, "cli");
                assert_eq!(args.car.as_deref(), Some("Swift"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_custom_data_and_profile_flags() {
        let cli = Cli::try_parse_from([
            "pitstop",
            "track",
            "Purchase",
            "--num-items",
            "2",
            "--status",
            "confirmed",
            "--data",
            "coupon=MONSOON",
            "--date-of-birth",
            "19900415",
            "--gender",
            "f",
        ])
        .unwrap();
        match cli.command {
            Commands::Track(args) => {
                assert_eq!(args.num_items, Some(2));
                assert_eq!(args.status.as_deref(), Some("confirmed"));
                assert_eq!(args.extra, [("coupon".to_string(), "MONSOON".to_string())]);
                assert_eq!(args.customer.date_of_birth.as_deref(), Some("19900415"));
                assert_eq!(args.customer.gender.as_deref(), Some("f"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_data_without_equals_sign() {
        let err = Cli::try_parse_from(["pitstop", "track", "Lead", "--data", "coupon"]).unwrap_err();
        assert!(err.to_string().contains("expected KEY=VALUE"));
    }

    #[test]
    fn sweep_days_are_bounded() {
        assert!(Cli::try_parse_from(["pitstop", "sweep", "--days", "100000000"]).is_err());
        assert!(Cli::try_parse_from(["pitstop", "sweep", "--days", "0"]).is_err());
        let cli = Cli::try_parse_from(["pitstop", "sweep", "--days", "36500"]).unwrap();
        assert!(matches!(cli.command, Commands::Sweep { days: Some(36_500) }));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = pitstop_config::load_and_validate_str("").unwrap();
        assert_eq!(config.tracking.retention_days, 30);
    }
}
