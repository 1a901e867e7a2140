use serde::{Deserialize, Serialize};

use crate::config::WHEEL_SLOTS;

// ---------------------------------------------------------------------------
// Bets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" => Ok(Outcome::Win),
            "loss" => Ok(Outcome::Loss),
            other => Err(format!("unknown outcome kind {other:?}")),
        }
    }
}

/// The six wager types offered by the contract, by on-chain code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetCategory {
    Numbers,
    Color,
    EvenOdd,
    Dozen,
    Column,
    HighLow,
}

impl BetCategory {
    pub const ALL: [BetCategory; 6] = [
        BetCategory::Numbers,
        BetCategory::Color,
        BetCategory::EvenOdd,
        BetCategory::Dozen,
        BetCategory::Column,
        BetCategory::HighLow,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(BetCategory::Numbers),
            1 => Some(BetCategory::Color),
            2 => Some(BetCategory::EvenOdd),
            3 => Some(BetCategory::Dozen),
            4 => Some(BetCategory::Column),
            5 => Some(BetCategory::HighLow),
            _ => None,
        }
    }

    /// Wheel slots that pay out for a single selection in this category.
    pub fn winning_slots(self) -> u32 {
        match self {
            BetCategory::Numbers => 1,
            BetCategory::Color | BetCategory::EvenOdd | BetCategory::HighLow => 18,
            BetCategory::Dozen | BetCategory::Column => 12,
        }
    }

    /// Number of distinct selectors a player can choose from.
    pub fn sub_outcomes(self) -> u32 {
        match self {
            BetCategory::Numbers => WHEEL_SLOTS,
            BetCategory::Color | BetCategory::EvenOdd | BetCategory::HighLow => 2,
            BetCategory::Dozen | BetCategory::Column => 3,
        }
    }

    /// Win probability on an unbiased wheel.
    pub fn fair_probability(self) -> f64 {
        self.winning_slots() as f64 / WHEEL_SLOTS as f64
    }

    /// Lower-case name used in check labels.
    pub fn label(self) -> &'static str {
        match self {
            BetCategory::Numbers => "numbers",
            BetCategory::Color => "color",
            BetCategory::EvenOdd => "even/odd",
            BetCategory::Dozen => "dozen",
            BetCategory::Column => "column",
            BetCategory::HighLow => "high/low",
        }
    }
}

impl std::fmt::Display for BetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BetCategory::Numbers => "Numbers",
            BetCategory::Color => "Color",
            BetCategory::EvenOdd => "Even/Odd",
            BetCategory::Dozen => "Dozen",
            BetCategory::Column => "Column",
            BetCategory::HighLow => "High/Low",
        };
        write!(f, "{s}")
    }
}

/// A settled bet with its derived financial fields. Built only by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetRecord {
    pub outcome: Outcome,
    /// Stake in the asset's smallest unit.
    pub wager: u128,
    /// Payout in standard units as reported by the feed.
    pub payout: f64,
    pub category: BetCategory,
    pub selector: u32,
    pub block_bet: u64,
    pub block_spin: u64,
    pub player: String,
    /// Money moved by this bet: the payout on a loss, payout less stake on a win.
    pub result: f64,
    /// Signed house P&L of this bet: `+result` on a loss, `-result` on a win.
    pub house_result: f64,
    /// Stake in standard units.
    pub volume: f64,
    pub expected_profit: f64,
}

impl BetRecord {
    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }

    /// Signed house P&L contribution of this bet.
    pub fn house_profit(&self) -> f64 {
        self.house_result
    }
}

// ---------------------------------------------------------------------------
// Run parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Local evaluation: no dispatch, series file written.
    Dev,
    /// Summary and series file posted, alerts dispatched.
    Daily,
    /// Alerts dispatched on threshold breach only.
    Monitor,
}

impl Mode {
    pub fn dispatches_alerts(self) -> bool {
        matches!(self, Mode::Daily | Mode::Monitor)
    }

    pub fn dispatches_summary(self) -> bool {
        self == Mode::Daily
    }

    pub fn writes_report(self) -> bool {
        matches!(self, Mode::Dev | Mode::Daily)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Mode::Dev => "dev",
            Mode::Daily => "daily",
            Mode::Monitor => "monitor",
        };
        write!(f, "{s}")
    }
}

/// How Numbers selectors are split into two groups for the independence check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumbersSplit {
    /// `<= 18` vs `> 19`; selector 19 falls in neither group.
    #[default]
    Legacy,
    /// `<= 18` vs `>= 19`.
    Closed,
}

impl std::str::FromStr for NumbersSplit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(NumbersSplit::Legacy),
            "closed" => Ok(NumbersSplit::Closed),
            other => Err(format!("NUMBERS_SPLIT must be legacy or closed, got {other:?}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Test output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// One-sided z-test against the fair probability.
    Proportion,
    /// Chi-square test of independence.
    Independence { dof: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub label: String,
    pub kind: TestKind,
    /// z for proportion tests, chi-square for independence tests.
    pub statistic: f64,
    pub p_value: f64,
    pub sample_size: usize,
}

/// Alert tier, least severe first so that `Ord` ranks by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Alert,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Alert => "ALERT",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        };
        write!(f, "{s}")
    }
}
