use serde::Serialize;

use crate::config::drawdown_multiples;
use crate::error::{AppError, Result};
use crate::types::Severity;

/// Realized house P&L over a window, classified against the maximum stake.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownResult {
    pub label: String,
    pub house_profit: f64,
    pub max_bet: f64,
    pub severity: Option<Severity>,
}

/// Classify a window's house P&L. Losses deeper than 200, 150 and 100 times
/// `max_bet` map to CRITICAL, WARNING and ALERT respectively.
pub fn classify_drawdown(house_profit: f64, max_bet: f64) -> Result<Option<Severity>> {
    if !(max_bet > 0.0) || !max_bet.is_finite() {
        return Err(AppError::DegenerateParameters(format!(
            "max_bet must be positive, got {max_bet}"
        )));
    }
    let severity = if house_profit < -drawdown_multiples::CRITICAL * max_bet {
        Some(Severity::Critical)
    } else if house_profit < -drawdown_multiples::WARNING * max_bet {
        Some(Severity::Warning)
    } else if house_profit < -drawdown_multiples::ALERT * max_bet {
        Some(Severity::Alert)
    } else {
        None
    };
    Ok(severity)
}

pub fn drawdown_check(
    house_profit: f64,
    max_bet: f64,
    label: impl Into<String>,
) -> Result<DrawdownResult> {
    Ok(DrawdownResult {
        label: label.into(),
        house_profit,
        max_bet,
        severity: classify_drawdown(house_profit, max_bet)?,
    })
}
