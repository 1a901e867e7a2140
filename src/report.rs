use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::types::BetRecord;

/// One row of the cumulative series handed to external plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub index: usize,
    pub block_spin: u64,
    pub house_profit: f64,
    pub expected_profit: f64,
    pub volume: f64,
}

/// Running totals of house P&L, theoretical edge profit and staked volume.
pub fn cumulative_series(records: &[BetRecord]) -> Vec<SeriesRow> {
    records
        .iter()
        .enumerate()
        .scan((0.0, 0.0, 0.0), |(profit, expected, volume), (index, r)| {
            *profit += r.house_profit();
            *expected += r.expected_profit;
            *volume += r.volume;
            Some(SeriesRow {
                index,
                block_spin: r.block_spin,
                house_profit: *profit,
                expected_profit: *expected,
                volume: *volume,
            })
        })
        .collect()
}

pub fn write_series_csv(path: &Path, records: &[BetRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let rows = cumulative_series(records);
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} series rows to {}", rows.len(), path.display());
    Ok(())
}
