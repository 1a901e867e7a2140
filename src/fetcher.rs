use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{AppError, Result};

const USER_AGENT: &str = "Mozilla/5.0";

/// A JSON scalar that the feed emits either as a number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            Scalar::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Scalar::Float(_) => None,
            Scalar::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }

    /// Raw textual form, used where the value may exceed 64 bits.
    pub fn as_text(&self) -> String {
        match self {
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Text(s) => s.trim().to_string(),
        }
    }
}

/// One settled bet as it appears in the feed. Every field is optional here;
/// the normalizer decides what is fatal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBet {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub wager: Option<Scalar>,
    pub value: Option<Scalar>,
    pub bet_type: Option<Scalar>,
    pub bet_input: Option<Scalar>,
    pub block_bet: Option<Scalar>,
    pub block_spin: Option<Scalar>,
    pub player: Option<String>,
}

pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()?)
}

/// Fetch the full settled-bet snapshot. Any transport problem or non-2xx status
/// is returned as an error; the caller aborts the run.
pub async fn fetch_bets(client: &reqwest::Client, url: &str) -> Result<Vec<RawBet>> {
    debug!("Fetching bet feed from {url}");
    let resp = client.get(url).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(AppError::TransportStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = resp.bytes().await?;
    let bets = parse_feed(&body)?;
    info!("Fetched {} bets ({} bytes)", bets.len(), body.len());
    Ok(bets)
}

pub fn parse_feed(body: &[u8]) -> Result<Vec<RawBet>> {
    Ok(serde_json::from_slice(body)?)
}
