use crate::error::{AppError, Result};
use crate::segment::{BetFilter, Segment, SelectorRange};
use crate::stats::distributions::chi_square_sf;
use crate::types::{BetCategory, Outcome, TestKind, TestResult};

/// Groups × (wins, losses) table. Cells hold either counts or summed `result`
/// values depending on how it was built.
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    pub rows: Vec<[f64; 2]>,
    /// Bets that contributed to the table.
    pub records: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquare {
    pub statistic: f64,
    pub dof: usize,
    pub p_value: f64,
}

impl ContingencyTable {
    pub fn new(rows: Vec<[f64; 2]>, records: usize) -> Self {
        Self { rows, records }
    }

    /// Win-volume vs loss-volume per selector group of one category.
    pub fn by_volume(segment: &Segment<'_>, category: BetCategory, groups: &[SelectorRange]) -> Self {
        let mut records = 0;
        let rows = groups
            .iter()
            .map(|&group| {
                let base = BetFilter::category(category).with_selector(group);
                records += segment.count_matching(&base);
                [
                    segment.result_sum(&base.with_outcome(Outcome::Win)),
                    segment.result_sum(&base.with_outcome(Outcome::Loss)),
                ]
            })
            .collect();
        Self::new(rows, records)
    }

    /// Win-count vs loss-count for the trailing `recent` bets (first row)
    /// against everything before them (second row).
    pub fn by_recency(segment: &Segment<'_>, recent: usize) -> Self {
        let (earlier, trailing) = segment.split_tail(recent);
        let rows = vec![
            [trailing.wins() as f64, trailing.losses() as f64],
            [earlier.wins() as f64, earlier.losses() as f64],
        ];
        Self::new(rows, segment.len())
    }

    fn row_sums(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r[0] + r[1]).collect()
    }

    fn col_sums(&self) -> [f64; 2] {
        self.rows
            .iter()
            .fold([0.0, 0.0], |acc, r| [acc[0] + r[0], acc[1] + r[1]])
    }

    /// Pearson chi-square test of independence. 2×2 tables get Yates'
    /// continuity correction.
    pub fn chi_square(&self) -> Result<ChiSquare> {
        if self.rows.len() < 2 {
            return Err(AppError::InsufficientSample(format!(
                "contingency table needs at least 2 rows, has {}",
                self.rows.len()
            )));
        }
        if self.rows.iter().flatten().any(|c| *c < 0.0 || !c.is_finite()) {
            return Err(AppError::InsufficientSample(
                "contingency table has a negative or non-finite cell".to_string(),
            ));
        }

        let row_sums = self.row_sums();
        let col_sums = self.col_sums();
        if let Some(i) = row_sums.iter().position(|s| *s <= 0.0) {
            return Err(AppError::InsufficientSample(format!(
                "contingency row {i} sums to zero"
            )));
        }
        if let Some(j) = col_sums.iter().position(|s| *s <= 0.0) {
            let side = if j == 0 { "win" } else { "loss" };
            return Err(AppError::InsufficientSample(format!(
                "contingency {side} column sums to zero"
            )));
        }

        let total: f64 = row_sums.iter().sum();
        let dof = self.rows.len() - 1;
        let yates = dof == 1;

        let mut statistic = 0.0;
        for (row, row_sum) in self.rows.iter().zip(&row_sums) {
            for (observed, col_sum) in row.iter().zip(col_sums) {
                let expected = row_sum * col_sum / total;
                let mut diff = (observed - expected).abs();
                if yates {
                    diff = (diff - 0.5).max(0.0);
                }
                statistic += diff * diff / expected;
            }
        }

        let p_value = chi_square_sf(statistic, dof)?;
        Ok(ChiSquare {
            statistic,
            dof,
            p_value,
        })
    }
}

pub fn independence_test(table: &ContingencyTable, label: impl Into<String>) -> Result<TestResult> {
    let label = label.into();
    let chi = table.chi_square().map_err(|e| match e {
        AppError::InsufficientSample(reason) => {
            AppError::InsufficientSample(format!("{label}: {reason}"))
        }
        other => other,
    })?;
    Ok(TestResult {
        label,
        kind: TestKind::Independence { dof: chi.dof },
        statistic: chi.statistic,
        p_value: chi.p_value,
        sample_size: table.records,
    })
}
