// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.
//!
//! Every command opens the local database, splits it into the session and
//! persistent scopes, and only builds the full tracker when it has to talk
//! to the conversion API. Opening the runtime stands in for a page load, so
//! the redirect retention sweep runs there before any command.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use pitstop_config::PitstopConfig;
use pitstop_core::{
    Clock, CookieJar, CustomerInfo, DiagnosticSink, HttpTransport, PitstopError, StaticPage,
    SystemClock,
};
use pitstop_delivery::{BackendForwarder, ReqwestTransport, TracingSink};
use pitstop_funnel::RedirectLog;
use pitstop_identity::IdentityStore;
use pitstop_payload::{CustomDataBuilder, CustomerStore};
use pitstop_storage::{Database, PERSISTENT_SCOPE, SESSION_SCOPE, SqliteStore};
use pitstop_tracker::{Booking, CURRENCY, ConversionTracker, IpLocator, Ports, TrackOptions};

use crate::output;
use crate::{BookArgs, Cli, Commands, CustomerArgs, TrackArgs};

/// Everything a command may need, opened once.
struct Runtime {
    session: Arc<SqliteStore>,
    persistent: Arc<SqliteStore>,
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn DiagnosticSink>,
    use_color: bool,
}

impl Runtime {
    fn open(cli: &Cli, config: &PitstopConfig) -> Result<Self, PitstopError> {
        let db = Database::open(&config.storage.database_path)?;
        debug!(path = %config.storage.database_path, "database opened");
        let transport = ReqwestTransport::new(Duration::from_secs(config.pixel.timeout_secs))?;

        Ok(Self {
            session: Arc::new(db.store(SESSION_SCOPE)),
            persistent: Arc::new(db.store(PERSISTENT_SCOPE)),
            transport: Arc::new(transport),
            clock: Arc::new(SystemClock),
            sink: Arc::new(TracingSink::new(config.tracking.development)),
            use_color: !cli.plain && std::io::stdout().is_terminal(),
        })
    }

    fn identity(&self) -> Arc<IdentityStore> {
        Arc::new(IdentityStore::new(
            self.session.clone(),
            self.persistent.clone(),
            self.clock.clone(),
            self.sink.clone(),
        ))
    }

    fn customers(&self, config: &PitstopConfig) -> Arc<CustomerStore> {
        Arc::new(CustomerStore::new(
            self.session.clone(),
            self.persistent.clone(),
            self.sink.clone(),
            config.tracking.default_country.clone(),
        ))
    }

    /// Redirect log for read and sweep commands; never forwards anywhere.
    fn redirect_log(&self, config: &PitstopConfig) -> RedirectLog {
        RedirectLog::new(
            self.persistent.clone(),
            self.identity(),
            self.customers(config),
            self.clock.clone(),
            BackendForwarder::new(None, self.transport.clone(), self.sink.clone()),
            self.sink.clone(),
        )
    }

    /// Apply `tracking.retention_days` to the redirect list.
    fn sweep_on_start(&self, config: &PitstopConfig) -> usize {
        let removed = self
            .redirect_log(config)
            .clear_old_data(config.tracking.retention_days);
        debug!(removed, "startup retention sweep");
        removed
    }

    fn tracker(&self, cli: &Cli, config: &PitstopConfig) -> Result<ConversionTracker, PitstopError> {
        let user_agent = format!("pitstop-cli/{}", env!("CARGO_PKG_VERSION"));
        let cookies = cli
            .cookies
            .as_deref()
            .map(CookieJar::parse)
            .unwrap_or_default();

        ConversionTracker::new(
            config,
            Ports {
                session: self.session.clone(),
                persistent: self.persistent.clone(),
                cookies: Arc::new(cookies),
                transport: self.transport.clone(),
                clock: self.clock.clone(),
                page: Arc::new(StaticPage::new(user_agent, cli.page_url.clone())),
                sink: self.sink.clone(),
                tag: None,
            },
        )
    }
}

/// Run the selected subcommand.
pub async fn run(cli: &Cli, config: &PitstopConfig) -> Result<(), PitstopError> {
    let rt = Runtime::open(cli, config)?;

    if cli.new_session {
        rt.identity().reset_session();
    }
    rt.sweep_on_start(config);

    match &cli.command {
        Commands::Track(args) => run_track(&rt, cli, config, args).await,
        Commands::Book(args) => run_book(&rt, cli, config, args).await,
        Commands::Mobile { phone } => {
            let saved = rt.customers(config).capture_mobile(phone);
            output::print_saved("mobile number", saved, rt.use_color);
            Ok(())
        }
        Commands::Locate => run_locate(&rt, cli, config).await,
        Commands::Funnel { json } => {
            let summary = rt.redirect_log(config).conversion_funnel_data();
            output::print_funnel(&summary, *json, rt.use_color);
            Ok(())
        }
        Commands::Sweep { days } => {
            let days = days.unwrap_or(config.tracking.retention_days);
            let removed = rt.redirect_log(config).clear_old_data(days);
            output::print_sweep(removed, days, rt.use_color);
            Ok(())
        }
        Commands::Identity { json } => {
            let identity = rt.identity();
            output::print_identity(&identity.session_id(), &identity.user_id(), *json);
            Ok(())
        }
    }
}

async fn run_track(
    rt: &Runtime,
    cli: &Cli,
    config: &PitstopConfig,
    args: &TrackArgs,
) -> Result<(), PitstopError> {
    let tracker = rt.tracker(cli, config)?;

    let mut data = CustomDataBuilder::new();
    if let Some(value) = args.value {
        data = data
            .value(value)
            .currency(args.currency.as_deref().unwrap_or(CURRENCY));
    } else if let Some(currency) = &args.currency {
        data = data.currency(currency);
    }
    if let Some(name) = &args.content_name {
        data = data.content_name(name);
    }
    if let Some(n) = args.num_items {
        data = data.num_items(n);
    }
    if let Some(status) = &args.status {
        data = data.status(status);
    }
    for (key, value) in &args.extra {
        data = data.extra(key.as_str(), value.as_str());
    }

    let options = TrackOptions {
        customer: customer_info(&args.customer),
        custom_data: Some(data.build()),
    };
    let outcome = tracker.track(args.event, options).await;
    output::print_track(&outcome, rt.use_color);
    Ok(())
}

async fn run_book(
    rt: &Runtime,
    cli: &Cli,
    config: &PitstopConfig,
    args: &BookArgs,
) -> Result<(), PitstopError> {
    let tracker = rt.tracker(cli, config)?;
    let outcome = tracker
        .book_via_whatsapp(Booking {
            service: args.service.clone(),
            source: args.source.clone(),
            car: args.car.clone(),
            customer: customer_info(&args.customer),
        })
        .await;
    output::print_booking(&outcome, rt.use_color);
    Ok(())
}

async fn run_locate(rt: &Runtime, cli: &Cli, config: &PitstopConfig) -> Result<(), PitstopError> {
    if !config.location.enabled {
        output::print_location(None, rt.use_color);
        return Ok(());
    }
    let tracker = rt.tracker(cli, config)?;
    let locator = IpLocator::new(config.location.lookup_url.clone(), rt.transport.clone());
    let location = tracker.enrich_location(&locator).await;
    output::print_location(location.as_ref(), rt.use_color);
    Ok(())
}

/// `None` when no attribute was given, so stored fragments are used instead.
fn customer_info(args: &CustomerArgs) -> Option<CustomerInfo> {
    let info = CustomerInfo {
        email: args.email.clone(),
        phone: args.phone.clone(),
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        city: args.city.clone(),
        state: args.state.clone(),
        country: args.country.clone(),
        postal_code: args.postal_code.clone(),
        date_of_birth: args.date_of_birth.clone(),
        gender: args.gender.clone(),
    };
    (!info.is_empty()).then_some(info)
}
