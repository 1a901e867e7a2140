mod config;
mod detector;
mod error;
mod fetcher;
mod monitor;
mod normalizer;
mod notify;
mod report;
mod segment;
mod stats;
mod types;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{build_client, fetch_bets};
use crate::monitor::run_checks;
use crate::normalizer::normalize;
use crate::notify::{Dispatcher, SlackNotifier};
use crate::report::write_series_csv;
use crate::types::Mode;

#[derive(Parser)]
#[command(name = "bet-monitor")]
#[command(about = "Fairness checks over settled roulette bets")]
struct Cli {
    /// dev: no dispatch, series file written. daily: summary, series and alerts
    /// posted. monitor: alerts posted on threshold breach only.
    #[arg(value_enum, env = "MONITOR_MODE", default_value_t = Mode::Dev)]
    mode: Mode,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg, cli.mode).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config, mode: Mode) -> Result<()> {
    let settings = cfg.run_settings(mode);
    info!(
        mode = %mode,
        max_bet = cfg.max_bet,
        numbers_split = ?cfg.numbers_split,
        "Starting bet monitor"
    );

    // --- Snapshot: any failure here aborts before a single check runs ---
    let client = build_client(cfg.http_timeout_secs)?;
    let raw = fetch_bets(&client, &cfg.feed_url).await?;
    let records = normalize(&raw)?;

    let report = run_checks(&records, &settings);

    // --- Series for external plotting ---
    let series_path = PathBuf::from(&cfg.report_path);
    let series_file: Option<&Path> = if mode.writes_report() {
        match write_series_csv(&series_path, &records) {
            Ok(()) => Some(series_path.as_path()),
            Err(e) => {
                warn!("Could not write series file {}: {e}", series_path.display());
                None
            }
        }
    } else {
        None
    };

    // --- Dispatch ---
    let notifier = match &cfg.slack_token {
        Some(token) => SlackNotifier::new(client.clone(), token.clone(), cfg.slack_api_url.clone()),
        None => {
            if mode.dispatches_alerts() {
                warn!("SLACK_TOKEN not set, notifications disabled");
            }
            SlackNotifier::disabled()
        }
    };
    info!(enabled = notifier.is_enabled(), channel = %cfg.slack_channel, "Notifier ready");

    let dispatcher = Dispatcher::new(&notifier, cfg.slack_channel.clone(), settings);
    dispatcher.dispatch(&report, series_file).await;

    println!("{}", report.render());
    Ok(())
}
