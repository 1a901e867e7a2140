use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{
    RunSettings, DRAWDOWN_BLOCK_WINDOW, DRAWDOWN_TRAILING_BETS, RECENCY_WINDOWS, TEST_WINDOWS,
};
use crate::detector::{drawdown_alert, test_alert, Alert};
use crate::error::AppError;
use crate::monitor::checks::{
    independence_battery, proportion_battery, recency_check, CheckOutcome, Evaluated,
};
use crate::monitor::summary::Summary;
use crate::segment::Segment;
use crate::stats::{drawdown_check, DrawdownResult};
use crate::types::{BetRecord, TestKind, TestResult};

/// Everything a run produced. Presentation and dispatch consume this.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub summary: Summary,
    pub outcomes: Vec<CheckOutcome>,
    pub alerts: Vec<Alert>,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CheckOutcome::Test(_) | CheckOutcome::Drawdown(_)))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CheckOutcome::Skipped { .. }))
            .count()
    }

    pub fn faulted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CheckOutcome::Faulted { .. }))
            .count()
    }

    /// Summary text followed by the check tally and any faulted check labels.
    pub fn render(&self) -> String {
        let mut text = format!(
            "{}Checks: {} completed, {} skipped, {} faulted, {} alerts",
            self.summary,
            self.completed(),
            self.skipped(),
            self.faulted(),
            self.alerts.len(),
        );
        let faulted: Vec<&str> = self
            .outcomes
            .iter()
            .filter(|o| matches!(o, CheckOutcome::Faulted { .. }))
            .map(CheckOutcome::label)
            .collect();
        if !faulted.is_empty() {
            text.push_str(&format!("\nFaulted: {}", faulted.join(", ")));
        }
        text
    }
}

pub fn run_checks(records: &[BetRecord], settings: &RunSettings) -> RunReport {
    run_checks_at(records, settings, Utc::now())
}

/// Run the whole battery over one snapshot. Each check is isolated: a failing
/// check is recorded and the rest still run. Alerts are derived only once every
/// check has finished.
pub fn run_checks_at(
    records: &[BetRecord],
    settings: &RunSettings,
    generated_at: DateTime<Utc>,
) -> RunReport {
    let all = Segment::all(records);
    if all.is_empty() {
        warn!("Snapshot holds no settled bets; every check will be skipped");
    }
    let mut outcomes = Vec::new();

    // --- Drawdown ---
    let profit_last_bets = all.tail(DRAWDOWN_TRAILING_BETS).house_profit();
    let profit_last_blocks = all.by_block_window(DRAWDOWN_BLOCK_WINDOW).house_profit();
    for (value, label) in [
        (profit_last_bets, format!("last {DRAWDOWN_TRAILING_BETS} bets")),
        (profit_last_blocks, format!("last {DRAWDOWN_BLOCK_WINDOW} blocks")),
    ] {
        let result = drawdown_check(value, settings.max_bet, &label);
        record_drawdown(&mut outcomes, Evaluated { label, result });
    }

    // --- Windowed batteries ---
    let mut seen_lengths = Vec::new();
    for window in TEST_WINDOWS {
        let segment = match window {
            Some(n) => all.tail(*n),
            None => all.clone(),
        };
        if seen_lengths.contains(&segment.len()) {
            debug!(window = ?window, len = segment.len(), "window covers the same bets as an earlier one");
            continue;
        }
        seen_lengths.push(segment.len());

        for check in proportion_battery(&segment) {
            record_test(&mut outcomes, check);
        }
        for check in independence_battery(&segment, settings.numbers_split) {
            record_test(&mut outcomes, check);
        }
    }

    // --- Recent vs historical outcome frequency ---
    for &recent in RECENCY_WINDOWS {
        record_test(&mut outcomes, recency_check(&all, recent));
    }

    let alerts: Vec<Alert> = outcomes
        .iter()
        .filter_map(|o| match o {
            CheckOutcome::Test(t) => test_alert(t),
            CheckOutcome::Drawdown(d) => drawdown_alert(d),
            _ => None,
        })
        .collect();

    let summary = Summary::build(
        &all,
        profit_last_bets,
        profit_last_blocks,
        DRAWDOWN_TRAILING_BETS,
        DRAWDOWN_BLOCK_WINDOW,
        generated_at,
    );

    let report = RunReport {
        summary,
        outcomes,
        alerts,
    };
    info!(
        bets = records.len(),
        completed = report.completed(),
        skipped = report.skipped(),
        faulted = report.faulted(),
        alerts = report.alerts.len(),
        "Check run finished"
    );
    report
}

fn record_test(outcomes: &mut Vec<CheckOutcome>, check: Evaluated<TestResult>) {
    match check.result {
        Ok(result) => {
            let dof = match result.kind {
                TestKind::Independence { dof } => Some(dof),
                TestKind::Proportion => None,
            };
            debug!(
                label = %result.label,
                dof = ?dof,
                statistic = result.statistic,
                p_value = result.p_value,
                n = result.sample_size,
                "{}: stat {:.2}, p {:.4}",
                result.label,
                result.statistic,
                result.p_value,
            );
            outcomes.push(CheckOutcome::Test(result));
        }
        Err(e) => outcomes.push(failed(check.label, e)),
    }
}

fn record_drawdown(outcomes: &mut Vec<CheckOutcome>, check: Evaluated<DrawdownResult>) {
    match check.result {
        Ok(result) => {
            if let Some(severity) = result.severity {
                warn!(
                    label = %result.label,
                    profit = result.house_profit,
                    max_bet = result.max_bet,
                    %severity,
                    "drawdown threshold breached"
                );
            }
            outcomes.push(CheckOutcome::Drawdown(result));
        }
        Err(e) => outcomes.push(failed(check.label, e)),
    }
}

fn failed(label: String, e: AppError) -> CheckOutcome {
    match e {
        AppError::InsufficientSample(reason) => {
            info!("[SKIP] {reason}");
            CheckOutcome::Skipped { label, reason }
        }
        other => {
            error!("[FAULT] {label}: {other}");
            CheckOutcome::Faulted {
                label,
                reason: other.to_string(),
            }
        }
    }
}
