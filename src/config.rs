use crate::error::{AppError, Result};
use crate::types::{Mode, NumbersSplit};

pub const SLACK_API_URL: &str = "https://slack.com/api";
pub const SLACK_CHANNEL: &str = "#bets_monitoring";

/// Number of slots on the wheel, zero included.
pub const WHEEL_SLOTS: u32 = 37;

/// Smallest-unit wagers are divided by this to get standard units.
pub const UNITS_PER_COIN: f64 = 1e18;

/// Theoretical house edge, used only for the expected-profit series.
pub const HOUSE_EDGE: f64 = 0.03;

/// Default maximum stake in standard units.
pub const DEFAULT_MAX_BET: f64 = 0.75;

/// Trailing-bet windows the proportion and independence batteries run over.
/// `None` stands for the whole history.
pub const TEST_WINDOWS: &[Option<usize>] = &[None, Some(2000), Some(1000)];

/// Trailing sizes compared against the rest of the history by the recency check.
pub const RECENCY_WINDOWS: &[usize] = &[2000, 1000];

/// Trailing bets summed by the bet-count drawdown check.
pub const DRAWDOWN_TRAILING_BETS: usize = 100;

/// Trailing blocks summed by the block-window drawdown check.
pub const DRAWDOWN_BLOCK_WINDOW: u64 = 100;

/// Dozen bets are additionally tested on either side of this stake.
pub const DOZEN_VOLUME_SPLIT: f64 = 0.25;

/// p-value breakpoints, most severe first. Comparisons are strict.
pub mod p_thresholds {
    pub const CRITICAL: f64 = 0.0001;
    pub const WARNING: f64 = 0.001;
    pub const ALERT: f64 = 0.01;
}

/// Drawdown breakpoints as multiples of the maximum stake (house loss).
pub mod drawdown_multiples {
    pub const CRITICAL: f64 = 200.0;
    pub const WARNING: f64 = 150.0;
    pub const ALERT: f64 = 100.0;
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the settled-bet JSON snapshot (FEED_URL, required)
    pub feed_url: String,
    /// Slack bot token (SLACK_TOKEN). Dispatch is disabled when absent.
    pub slack_token: Option<String>,
    pub slack_channel: String,
    pub slack_api_url: String,
    /// Maximum stake in standard units (MAX_BET)
    pub max_bet: f64,
    pub log_level: String,
    /// Where the cumulative series CSV is written in dev/daily mode (REPORT_PATH)
    pub report_path: String,
    pub http_timeout_secs: u64,
    /// Numbers selector grouping for the independence check (NUMBERS_SPLIT)
    pub numbers_split: NumbersSplit,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let feed_url = std::env::var("FEED_URL")
            .map_err(|_| AppError::Config("FEED_URL must be set".to_string()))?;

        let max_bet = std::env::var("MAX_BET")
            .unwrap_or_else(|_| DEFAULT_MAX_BET.to_string())
            .parse::<f64>()
            .map_err(|_| AppError::Config("MAX_BET must be a number".to_string()))?;
        if !(max_bet > 0.0) {
            return Err(AppError::Config("MAX_BET must be positive".to_string()));
        }

        let numbers_split = match std::env::var("NUMBERS_SPLIT") {
            Ok(s) => s.parse::<NumbersSplit>().map_err(AppError::Config)?,
            Err(_) => NumbersSplit::default(),
        };

        Ok(Self {
            feed_url,
            slack_token: std::env::var("SLACK_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            slack_channel: std::env::var("SLACK_CHANNEL")
                .unwrap_or_else(|_| SLACK_CHANNEL.to_string()),
            slack_api_url: std::env::var("SLACK_API_URL")
                .unwrap_or_else(|_| SLACK_API_URL.to_string()),
            max_bet,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            report_path: std::env::var("REPORT_PATH")
                .unwrap_or_else(|_| "bet_series.csv".to_string()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .map_err(|_| {
                    AppError::Config("HTTP_TIMEOUT_SECS must be a whole number".to_string())
                })?,
            numbers_split,
        })
    }

    pub fn run_settings(&self, mode: Mode) -> RunSettings {
        RunSettings {
            mode,
            max_bet: self.max_bet,
            numbers_split: self.numbers_split,
        }
    }
}

/// Per-invocation parameters threaded through the orchestrator and dispatcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSettings {
    pub mode: Mode,
    pub max_bet: f64,
    pub numbers_split: NumbersSplit,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            mode: Mode::Dev,
            max_bet: DEFAULT_MAX_BET,
            numbers_split: NumbersSplit::default(),
        }
    }
}
