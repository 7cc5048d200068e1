//! `ticketdesk-tui`: terminal dashboard for alarm notification tickets.
//!
//! Built on [ratatui](https://ratatui.rs). A single ticket management
//! screen shows headline metrics cards above a date/hour-filtered ticket
//! table; tickets can be resolved with notes or deleted in place.
//!
//! Logs are written to a file (default `/tmp/ticketdesk-tui.log`) to avoid
//! corrupting the terminal UI. Network calls run in spawned tasks that
//! report back through the action channel.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ticketdesk_core::TicketService;

use crate::app::{App, Session};

/// Terminal dashboard for reviewing and resolving alarm tickets.
#[derive(Parser, Debug)]
#[command(name = "ticketdesk-tui", version, about)]
struct Cli {
    /// Profile to use (defaults to the config's default profile)
    #[arg(short = 'p', long, env = "TICKETDESK_PROFILE")]
    profile: Option<String>,

    /// Ticket API base URL, overriding the profile
    #[arg(long, env = "TICKETDESK_API_URL")]
    api_url: Option<String>,

    /// Log file path (defaults to /tmp/ticketdesk-tui.log)
    #[arg(long, default_value = "/tmp/ticketdesk-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may go to stdout/stderr while the terminal
/// is in raw mode. Hold the returned guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ticketdesk_tui={log_level},ticketdesk_core={log_level},ticketdesk_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("ticketdesk-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the profile from the shared config file and build the service.
fn open_session(cli: &Cli) -> Result<Session> {
    let cfg = ticketdesk_config::load_config_or_default();
    let profile_name = cli
        .profile
        .clone()
        .unwrap_or_else(|| cfg.active_profile_name().to_owned());
    let profile = cfg
        .profile(&profile_name)
        .wrap_err_with(|| format!("cannot load profile '{profile_name}'"))?;

    let mut service_config =
        ticketdesk_config::profile_to_service_config(&profile, &cfg.defaults)?;
    if let Some(ref raw) = cli.api_url {
        service_config.url = raw
            .parse()
            .wrap_err_with(|| format!("invalid --api-url: {raw}"))?;
    }

    let tokens = ticketdesk_config::open_token_store(&profile, &profile_name);
    let service = TicketService::new(&service_config, tokens)?;

    Ok(Session {
        profile_user: ticketdesk_config::profile_user(&profile),
        profile_name,
        service: Arc::new(service),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let session = open_session(&cli)?;
    info!(
        profile = %session.profile_name,
        url = %session.service.api_url(),
        "starting ticketdesk-tui"
    );

    let mut app = App::new(session);
    app.run().await?;

    Ok(())
}
