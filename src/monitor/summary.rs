use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::WHEEL_SLOTS;
use crate::segment::{BetFilter, Segment};
use crate::types::{BetCategory, Outcome};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRate {
    pub category: BetCategory,
    pub bets: usize,
    /// `None` when the category has no bets.
    pub observed: Option<f64>,
    pub expected: f64,
}

/// Headline figures for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub generated_at: DateTime<Utc>,
    pub total_bets: usize,
    pub players: usize,
    pub total_profit: f64,
    pub profit_last_bets: f64,
    pub profit_last_blocks: f64,
    pub trailing_bets: usize,
    pub trailing_blocks: u64,
    pub volume: f64,
    /// Win payouts over staked volume; `None` when nothing was staked.
    pub player_volume_ratio: Option<f64>,
    pub category_rates: Vec<CategoryRate>,
}

impl Summary {
    pub fn build(
        all: &Segment<'_>,
        profit_last_bets: f64,
        profit_last_blocks: f64,
        trailing_bets: usize,
        trailing_blocks: u64,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let volume = all.volume();
        let players = all.iter().map(|r| r.player.as_str()).collect::<HashSet<_>>().len();
        let player_volume_ratio = (volume > 0.0).then(|| all.win_payouts() / volume);

        let category_rates = BetCategory::ALL
            .into_iter()
            .map(|category| {
                let filter = BetFilter::category(category);
                let bets = all.count_matching(&filter);
                let wins = all.count_matching(&filter.with_outcome(Outcome::Win));
                CategoryRate {
                    category,
                    bets,
                    observed: (bets > 0).then(|| wins as f64 / bets as f64),
                    expected: category.fair_probability(),
                }
            })
            .collect();

        Self {
            generated_at,
            total_bets: all.len(),
            players,
            total_profit: all.house_profit(),
            profit_last_bets,
            profit_last_blocks,
            trailing_bets,
            trailing_blocks,
            volume,
            player_volume_ratio,
            category_rates,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "Total bets: {}", self.total_bets)?;
        writeln!(f, "Current total profit: {:.4}", self.total_profit)?;
        writeln!(f, "Profit last {} bets: {:.4}", self.trailing_bets, self.profit_last_bets)?;
        writeln!(f, "Profit last {} blocks: {:.4}", self.trailing_blocks, self.profit_last_blocks)?;
        writeln!(f, "Overall volume: {:.2}", self.volume)?;
        writeln!(f, "Distinct players: {}", self.players)?;
        let fair_ratio = (WHEEL_SLOTS - 1) as f64 / WHEEL_SLOTS as f64;
        match self.player_volume_ratio {
            Some(r) => writeln!(
                f,
                "Overall player win ratio (volume): {r:.4} expected: {fair_ratio:.4}"
            )?,
            None => writeln!(f, "Overall player win ratio (volume): n/a expected: {fair_ratio:.4}")?,
        }
        for rate in &self.category_rates {
            match rate.observed {
                Some(o) => write!(f, "{} winrate: {o:.4} expected: {:.4}", rate.category, rate.expected)?,
                None => write!(f, "{} winrate: n/a expected: {:.4}", rate.category, rate.expected)?,
            }
            writeln!(f, " ({} bets)", rate.bets)?;
        }
        Ok(())
    }
}
