use serde::Serialize;
use tracing::debug;

use crate::config::DOZEN_VOLUME_SPLIT;
use crate::error::Result;
use crate::segment::{BetFilter, Segment, SelectorRange, VolumeRange};
use crate::stats::{independence_test, proportion_test, ContingencyTable, DrawdownResult};
use crate::types::{BetCategory, NumbersSplit, TestResult};

/// What happened to one check in a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    Test(TestResult),
    Drawdown(DrawdownResult),
    /// Not enough data for the check; logged, never alerted.
    Skipped { label: String, reason: String },
    /// Internal-consistency fault confined to this check.
    Faulted { label: String, reason: String },
}

impl CheckOutcome {
    pub fn label(&self) -> &str {
        match self {
            CheckOutcome::Test(t) => &t.label,
            CheckOutcome::Drawdown(d) => &d.label,
            CheckOutcome::Skipped { label, .. } | CheckOutcome::Faulted { label, .. } => label,
        }
    }
}

/// A check that has been evaluated but not yet recorded.
pub struct Evaluated<T> {
    pub label: String,
    pub result: Result<T>,
}

/// Selector groups compared by the independence check for each category.
pub fn selector_groups(category: BetCategory, split: NumbersSplit) -> Vec<SelectorRange> {
    match category {
        BetCategory::Numbers => match split {
            NumbersSplit::Legacy => vec![SelectorRange::AtMost(18), SelectorRange::Above(19)],
            NumbersSplit::Closed => vec![SelectorRange::AtMost(18), SelectorRange::AtLeast(19)],
        },
        other => (0..other.sub_outcomes()).map(SelectorRange::Eq).collect(),
    }
}

/// Proportion tests for every category plus the Dozen stake split.
pub fn proportion_battery(segment: &Segment<'_>) -> Vec<Evaluated<TestResult>> {
    let window = segment.len();
    let mut out = Vec::with_capacity(BetCategory::ALL.len() + 2);

    for category in BetCategory::ALL {
        let label = format!("{} proba last {window}", category.label());
        let result = proportion_test(segment, category, &BetFilter::category(category), &label);
        out.push(Evaluated { label, result });

        if category == BetCategory::Dozen {
            let splits = [
                ("<", VolumeRange::Below(DOZEN_VOLUME_SPLIT)),
                (">=", VolumeRange::AtLeast(DOZEN_VOLUME_SPLIT)),
            ];
            for (op, range) in splits {
                let label = format!("dozen {op} {DOZEN_VOLUME_SPLIT} proba last {window}");
                let filter = BetFilter::category(category).with_volume(range);
                let result = proportion_test(segment, category, &filter, &label);
                out.push(Evaluated { label, result });
            }
        }
    }
    out
}

/// Volume contingency tests per category across its selector groups.
pub fn independence_battery(
    segment: &Segment<'_>,
    split: NumbersSplit,
) -> Vec<Evaluated<TestResult>> {
    let window = segment.len();

    if split == NumbersSplit::Legacy {
        let gap = segment.count_matching(
            &BetFilter::category(BetCategory::Numbers).with_selector(SelectorRange::Eq(19)),
        );
        if gap > 0 {
            debug!(window, excluded = gap, "numbers selector 19 excluded from legacy split");
        }
    }

    BetCategory::ALL
        .into_iter()
        .map(|category| {
            let label = format!("{} chi2 p last {window}", category.label());
            let groups = selector_groups(category, split);
            let table = ContingencyTable::by_volume(segment, category, &groups);
            let result = independence_test(&table, &label);
            Evaluated { label, result }
        })
        .collect()
}

/// Trailing `recent` bets vs the rest of the segment, by win/loss count.
pub fn recency_check(segment: &Segment<'_>, recent: usize) -> Evaluated<TestResult> {
    let label = format!("last {recent} bets chi2 p");
    let table = ContingencyTable::by_recency(segment, recent);
    let result = independence_test(&table, &label);
    Evaluated { label, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::tests::bet;
    use crate::types::{BetRecord, Outcome};

    #[test]
    fn selector_groups_follow_category_table() {
        assert_eq!(selector_groups(BetCategory::Color, NumbersSplit::Legacy).len(), 2);
        assert_eq!(
            selector_groups(BetCategory::Column, NumbersSplit::Legacy),
            vec![SelectorRange::Eq(0), SelectorRange::Eq(1), SelectorRange::Eq(2)]
        );
        assert_eq!(
            selector_groups(BetCategory::Numbers, NumbersSplit::Legacy),
            vec![SelectorRange::AtMost(18), SelectorRange::Above(19)]
        );
        assert_eq!(
            selector_groups(BetCategory::Numbers, NumbersSplit::Closed),
            vec![SelectorRange::AtMost(18), SelectorRange::AtLeast(19)]
        );
    }

    #[test]
    fn proportion_battery_labels_and_skips() {
        let data: Vec<BetRecord> = (0..20)
            .map(|i| bet(Outcome::Loss, BetCategory::Color, i % 2, 0.1, i as u64))
            .collect();
        let seg = Segment::all(&data);
        let checks = proportion_battery(&seg);
        let labels: Vec<&str> = checks.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "numbers proba last 20",
                "color proba last 20",
                "even/odd proba last 20",
                "dozen proba last 20",
                "dozen < 0.25 proba last 20",
                "dozen >= 0.25 proba last 20",
                "column proba last 20",
                "high/low proba last 20",
            ]
        );
        let ran: Vec<&str> = checks
            .iter()
            .filter(|c| c.result.is_ok())
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(ran, vec!["color proba last 20"]);
    }

    #[test]
    fn legacy_numbers_split_ignores_selector_nineteen() {
        let mut data = Vec::new();
        for i in 0..30 {
            data.push(bet(Outcome::Loss, BetCategory::Numbers, 3, 1.0, i));
            data.push(bet(Outcome::Loss, BetCategory::Numbers, 25, 1.0, i));
        }
        data.push(bet(Outcome::Win, BetCategory::Numbers, 7, 1.0, 40));
        data.push(bet(Outcome::Win, BetCategory::Numbers, 30, 1.0, 40));
        // A pile of selector-19 wins that would skew the closed split.
        for i in 0..20 {
            data.push(bet(Outcome::Win, BetCategory::Numbers, 19, 1.0, 50 + i));
        }
        let seg = Segment::all(&data);

        let legacy = independence_battery(&seg, NumbersSplit::Legacy);
        let legacy_numbers = legacy[0].result.as_ref().unwrap();
        assert_eq!(legacy_numbers.sample_size, 62);

        let closed = independence_battery(&seg, NumbersSplit::Closed);
        let closed_numbers = closed[0].result.as_ref().unwrap();
        assert_eq!(closed_numbers.sample_size, 82);
        assert!(closed_numbers.p_value < legacy_numbers.p_value);
    }

    #[test]
    fn recency_label() {
        let data: Vec<BetRecord> = (0..10)
            .map(|i| bet(Outcome::Loss, BetCategory::Color, 0, 1.0, i))
            .collect();
        let check = recency_check(&Segment::all(&data), 1000);
        assert_eq!(check.label, "last 1000 bets chi2 p");
        assert!(check.result.is_err());
    }
}
