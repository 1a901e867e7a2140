use tracing::info;

use crate::config::{HOUSE_EDGE, UNITS_PER_COIN};
use crate::error::{AppError, Result};
use crate::fetcher::{RawBet, Scalar};
use crate::types::{BetCategory, BetRecord, Outcome};

/// Validate every raw bet and attach the derived fields. Order is preserved.
/// A single bad record rejects the whole snapshot.
pub fn normalize(raw: &[RawBet]) -> Result<Vec<BetRecord>> {
    let records = raw
        .iter()
        .enumerate()
        .map(|(index, bet)| normalize_one(index, bet))
        .collect::<Result<Vec<_>>>()?;
    info!("Normalized {} bet records", records.len());
    Ok(records)
}

fn normalize_one(index: usize, raw: &RawBet) -> Result<BetRecord> {
    let malformed = |reason: String| AppError::MalformedRecord { index, reason };

    let outcome = raw
        .kind
        .as_deref()
        .ok_or_else(|| malformed("missing outcome kind".to_string()))?
        .parse::<Outcome>()
        .map_err(malformed)?;

    let wager = parse_wager(raw.wager.as_ref()).map_err(malformed)?;

    let payout = raw
        .value
        .as_ref()
        .ok_or_else(|| malformed("missing payout value".to_string()))?
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| malformed("payout value is not a number".to_string()))?;
    if payout < 0.0 {
        return Err(malformed(format!("negative payout {payout}")));
    }

    let code = required_int(raw.bet_type.as_ref(), "betType").map_err(malformed)?;
    let category = BetCategory::from_code(code)
        .ok_or_else(|| malformed(format!("unknown betType {code}")))?;

    let selector = required_int(raw.bet_input.as_ref(), "betInput").map_err(malformed)?;
    let selector = u32::try_from(selector)
        .map_err(|_| malformed(format!("betInput {selector} out of range")))?;

    let block_bet = required_block(raw.block_bet.as_ref(), "blockBet").map_err(malformed)?;
    let block_spin = required_block(raw.block_spin.as_ref(), "blockSpin").map_err(malformed)?;

    let volume = wager as f64 / UNITS_PER_COIN;
    let result = match outcome {
        Outcome::Loss => payout,
        Outcome::Win => payout - volume,
    };
    let house_result = match outcome {
        Outcome::Loss => result,
        Outcome::Win => -result,
    };

    Ok(BetRecord {
        outcome,
        wager,
        payout,
        category,
        selector,
        block_bet,
        block_spin,
        player: raw.player.clone().unwrap_or_default(),
        result,
        house_result,
        volume,
        expected_profit: volume * HOUSE_EDGE,
    })
}

fn parse_wager(value: Option<&Scalar>) -> std::result::Result<u128, String> {
    let text = value.ok_or("missing wager")?.as_text();
    if text.starts_with('-') {
        return Err(format!("negative wager {text}"));
    }
    text.parse::<u128>()
        .map_err(|_| format!("wager {text:?} is not an integer amount"))
}

fn required_int(value: Option<&Scalar>, field: &str) -> std::result::Result<i64, String> {
    value
        .ok_or_else(|| format!("missing {field}"))?
        .as_i64()
        .ok_or_else(|| format!("{field} is not an integer"))
}

fn required_block(value: Option<&Scalar>, field: &str) -> std::result::Result<u64, String> {
    let height = required_int(value, field)?;
    u64::try_from(height).map_err(|_| format!("{field} {height} is negative"))
}
