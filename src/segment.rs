use crate::types::{BetCategory, BetRecord, Outcome};

/// Selector predicate used when slicing a category into sub-groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectorRange {
    Eq(u32),
    AtMost(u32),
    Above(u32),
    AtLeast(u32),
}

impl SelectorRange {
    pub fn contains(self, selector: u32) -> bool {
        match self {
            SelectorRange::Eq(v) => selector == v,
            SelectorRange::AtMost(v) => selector <= v,
            SelectorRange::Above(v) => selector > v,
            SelectorRange::AtLeast(v) => selector >= v,
        }
    }
}

/// Stake-size predicate in standard units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeRange {
    Below(f64),
    AtLeast(f64),
}

impl VolumeRange {
    pub fn contains(self, volume: f64) -> bool {
        match self {
            VolumeRange::Below(v) => volume < v,
            VolumeRange::AtLeast(v) => volume >= v,
        }
    }
}

/// Conjunction of optional predicates over a bet. An empty filter matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BetFilter {
    pub category: Option<BetCategory>,
    pub selector: Option<SelectorRange>,
    pub volume: Option<VolumeRange>,
    pub outcome: Option<Outcome>,
}

impl BetFilter {
    pub fn category(category: BetCategory) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn with_selector(mut self, selector: SelectorRange) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn with_volume(mut self, volume: VolumeRange) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn matches(&self, record: &BetRecord) -> bool {
        self.category.map_or(true, |c| record.category == c)
            && self.selector.map_or(true, |s| s.contains(record.selector))
            && self.volume.map_or(true, |v| v.contains(record.volume))
            && self.outcome.map_or(true, |o| record.outcome == o)
    }
}

/// Read-only, ordered view over normalized records. Cheap to clone; never owns data.
#[derive(Debug, Clone, Default)]
pub struct Segment<'a> {
    records: Vec<&'a BetRecord>,
}

impl<'a> Segment<'a> {
    pub fn all(records: &'a [BetRecord]) -> Self {
        Self {
            records: records.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a BetRecord> + '_ {
        self.records.iter().copied()
    }

    /// The last `n` records in ingestion order, or all of them if `n` exceeds the length.
    pub fn tail(&self, n: usize) -> Segment<'a> {
        let start = self.records.len().saturating_sub(n);
        Segment {
            records: self.records[start..].to_vec(),
        }
    }

    /// Splits off the last `n` records: returns `(earlier, trailing)`.
    pub fn split_tail(&self, n: usize) -> (Segment<'a>, Segment<'a>) {
        let start = self.records.len().saturating_sub(n);
        let (earlier, trailing) = self.records.split_at(start);
        (
            Segment { records: earlier.to_vec() },
            Segment { records: trailing.to_vec() },
        )
    }

    /// Records resolved in the last `blocks` blocks, i.e. with
    /// `block_spin > max_block_spin - blocks`. Ingestion order is kept.
    pub fn by_block_window(&self, blocks: u64) -> Segment<'a> {
        let Some(max_block) = self.max_block_spin() else {
            return Segment::default();
        };
        let floor = i128::from(max_block) - i128::from(blocks);
        self.filter_by(|r| i128::from(r.block_spin) > floor)
    }

    pub fn filter(&self, filter: &BetFilter) -> Segment<'a> {
        self.filter_by(|r| filter.matches(r))
    }

    pub fn filter_by(&self, pred: impl Fn(&BetRecord) -> bool) -> Segment<'a> {
        Segment {
            records: self.records.iter().copied().filter(|r| pred(r)).collect(),
        }
    }

    pub fn max_block_spin(&self) -> Option<u64> {
        self.records.iter().map(|r| r.block_spin).max()
    }

    pub fn count_matching(&self, filter: &BetFilter) -> usize {
        self.records.iter().filter(|r| filter.matches(r)).count()
    }

    pub fn wins(&self) -> usize {
        self.records.iter().filter(|r| r.is_win()).count()
    }

    pub fn losses(&self) -> usize {
        self.len() - self.wins()
    }

    /// Sum of `result` over records matching `filter`.
    pub fn result_sum(&self, filter: &BetFilter) -> f64 {
        self.records
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| r.result)
            .sum()
    }

    /// Signed house P&L: loss results minus win results.
    pub fn house_profit(&self) -> f64 {
        self.records.iter().map(|r| r.house_profit()).sum()
    }

    pub fn volume(&self) -> f64 {
        self.records.iter().map(|r| r.volume).sum()
    }

    pub fn win_payouts(&self) -> f64 {
        self.records
            .iter()
            .filter(|r| r.is_win())
            .map(|r| r.payout)
            .sum()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn bet(
        outcome: Outcome,
        category: BetCategory,
        selector: u32,
        volume: f64,
        block_spin: u64,
    ) -> BetRecord {
        let payout = match outcome {
            Outcome::Win => volume * 2.0,
            Outcome::Loss => volume,
        };
        let result = match outcome {
            Outcome::Win => payout - volume,
            Outcome::Loss => payout,
        };
        let house_result = match outcome {
            Outcome::Win => -result,
            Outcome::Loss => result,
        };
        BetRecord {
            outcome,
            wager: (volume * 1e18) as u128,
            payout,
            category,
            selector,
            block_bet: block_spin.saturating_sub(10),
            block_spin,
            player: "0xplayer".to_string(),
            result,
            house_result,
            volume,
            expected_profit: volume * 0.03,
        }
    }

    fn sample() -> Vec<BetRecord> {
        vec![
            bet(Outcome::Loss, BetCategory::Dozen, 0, 0.1, 1000),
            bet(Outcome::Win, BetCategory::Dozen, 1, 0.5, 1050),
            bet(Outcome::Loss, BetCategory::Color, 1, 0.2, 1101),
            bet(Outcome::Win, BetCategory::Numbers, 19, 0.3, 1150),
            bet(Outcome::Loss, BetCategory::Dozen, 2, 0.25, 1200),
        ]
    }

    #[test]
    fn tail_keeps_order_and_clamps() {
        let data = sample();
        let all = Segment::all(&data);
        let t = all.tail(2);
        let blocks: Vec<u64> = t.iter().map(|r| r.block_spin).collect();
        assert_eq!(blocks, vec![1150, 1200]);
        assert_eq!(all.tail(50).len(), 5);
        assert!(all.tail(0).is_empty());
    }

    #[test]
    fn split_tail_partitions_everything() {
        let data = sample();
        let (earlier, trailing) = Segment::all(&data).split_tail(2);
        assert_eq!(earlier.len(), 3);
        assert_eq!(trailing.len(), 2);
        let (earlier, trailing) = Segment::all(&data).split_tail(10);
        assert!(earlier.is_empty());
        assert_eq!(trailing.len(), 5);
    }

    #[test]
    fn block_window_is_relative_to_max_spin() {
        let data = sample();
        let window = Segment::all(&data).by_block_window(100);
        // max = 1200, so block_spin > 1100
        let blocks: Vec<u64> = window.iter().map(|r| r.block_spin).collect();
        assert_eq!(blocks, vec![1101, 1150, 1200]);
    }

    #[test]
    fn block_window_wider_than_chain_keeps_everything() {
        let data = vec![bet(Outcome::Loss, BetCategory::Color, 0, 1.0, 50)];
        assert_eq!(Segment::all(&data).by_block_window(100).len(), 1);
        assert!(Segment::default().by_block_window(100).is_empty());
    }

    #[test]
    fn conjunctive_filter() {
        let data = sample();
        let all = Segment::all(&data);
        let low_dozen = BetFilter::category(BetCategory::Dozen).with_volume(VolumeRange::Below(0.25));
        assert_eq!(all.filter(&low_dozen).len(), 1);
        let high_dozen =
            BetFilter::category(BetCategory::Dozen).with_volume(VolumeRange::AtLeast(0.25));
        assert_eq!(all.filter(&high_dozen).len(), 2);
        let dozen_wins = BetFilter::category(BetCategory::Dozen).with_outcome(Outcome::Win);
        assert_eq!(all.count_matching(&dozen_wins), 1);
        assert_eq!(all.count_matching(&BetFilter::default()), 5);
    }

    #[test]
    fn legacy_numbers_groups_skip_nineteen() {
        assert!(!SelectorRange::AtMost(18).contains(19));
        assert!(!SelectorRange::Above(19).contains(19));
        assert!(SelectorRange::AtLeast(19).contains(19));
    }

    #[test]
    fn aggregates() {
        let data = sample();
        let all = Segment::all(&data);
        assert_eq!(all.wins(), 2);
        assert_eq!(all.losses(), 3);
        // losses: 0.1 + 0.2 + 0.25, wins: 0.5 + 0.3
        assert!((all.house_profit() - (0.55 - 0.8)).abs() < 1e-12);
        assert!((all.volume() - 1.35).abs() < 1e-12);
        assert!((all.win_payouts() - 1.6).abs() < 1e-12);
        let dozen_losses = BetFilter::category(BetCategory::Dozen).with_outcome(Outcome::Loss);
        assert!((all.result_sum(&dozen_losses) - 0.35).abs() < 1e-12);
    }
}
