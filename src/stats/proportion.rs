use crate::error::{AppError, Result};
use crate::segment::{BetFilter, Segment};
use crate::stats::distributions::normal_sf;
use crate::types::{BetCategory, TestKind, TestResult};

/// One-sided z-test of a segment's observed win fraction for the bets matching
/// `filter` against the fair probability of `category`.
///
/// ```text
/// z = sqrt(n) * (observed - expected) / sqrt(expected * (1 - expected))
/// p = P(Z > z)
/// ```
///
/// Small p means players are winning more often than the wheel allows;
/// below-fair win rates produce p close to 1 and are never flagged.
pub fn proportion_test(
    segment: &Segment<'_>,
    category: BetCategory,
    filter: &BetFilter,
    label: impl Into<String>,
) -> Result<TestResult> {
    let label = label.into();
    let subset = segment.filter(filter);
    let n = subset.len();
    if n == 0 {
        return Err(AppError::InsufficientSample(format!(
            "{label}: no {category} bets in segment"
        )));
    }
    let wins = subset.wins();
    let (z, p_value) = z_test(wins, n, category.fair_probability())?;

    Ok(TestResult {
        label,
        kind: TestKind::Proportion,
        statistic: z,
        p_value,
        sample_size: n,
    })
}

/// Returns `(z, P(Z > z))` for `wins` successes in `n` trials against `expected`.
pub fn z_test(wins: usize, n: usize, expected: f64) -> Result<(f64, f64)> {
    if n == 0 {
        return Err(AppError::InsufficientSample("zero trials".to_string()));
    }
    if !(expected > 0.0 && expected < 1.0) {
        return Err(AppError::DegenerateParameters(format!(
            "expected proportion {expected} must lie strictly between 0 and 1"
        )));
    }
    let n_f = n as f64;
    let observed = wins as f64 / n_f;
    let z = n_f.sqrt() * (observed - expected) / (expected * (1.0 - expected)).sqrt();
    Ok((z, normal_sf(z)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::tests::bet;
    use crate::segment::VolumeRange;
    use crate::types::{BetRecord, Outcome};

    fn numbers_bets(wins: usize, total: usize) -> Vec<BetRecord> {
        (0..total)
            .map(|i| {
                let outcome = if i < wins { Outcome::Win } else { Outcome::Loss };
                bet(outcome, BetCategory::Numbers, (i % 37) as u32, 0.1, 1000 + i as u64)
            })
            .collect()
    }

    #[test]
    fn observed_equal_to_fair_gives_zero_statistic() {
        // 18 of 37 Color wins is exactly the fair rate
        let data: Vec<BetRecord> = (0..37)
            .map(|i| {
                let outcome = if i < 18 { Outcome::Win } else { Outcome::Loss };
                bet(outcome, BetCategory::Color, (i % 2) as u32, 0.1, 100)
            })
            .collect();
        let seg = Segment::all(&data);
        let res = proportion_test(
            &seg,
            BetCategory::Color,
            &BetFilter::category(BetCategory::Color),
            "color",
        )
        .unwrap();
        assert!(res.statistic.abs() < 1e-12);
        assert!((res.p_value - 0.5).abs() < 1e-12);
        assert_eq!(res.sample_size, 37);
    }

    #[test]
    fn thirteen_numbers_wins_in_391_bets() {
        let data = numbers_bets(13, 391);
        let seg = Segment::all(&data);
        let res = proportion_test(
            &seg,
            BetCategory::Numbers,
            &BetFilter::category(BetCategory::Numbers),
            "numbers proba last 391",
        )
        .unwrap();
        // observed 0.03325 vs expected 0.02703
        assert!((res.statistic - 0.7586).abs() < 1e-3, "z = {}", res.statistic);
        assert!((res.p_value - 0.2241).abs() < 1e-3, "p = {}", res.p_value);
    }

    #[test]
    fn empty_category_is_insufficient_sample() {
        let data = numbers_bets(1, 10);
        let seg = Segment::all(&data);
        let err = proportion_test(
            &seg,
            BetCategory::Dozen,
            &BetFilter::category(BetCategory::Dozen),
            "dozen",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InsufficientSample(_)));
    }

    #[test]
    fn degenerate_expected_is_rejected() {
        assert!(matches!(z_test(1, 2, 0.0), Err(AppError::DegenerateParameters(_))));
        assert!(matches!(z_test(1, 2, 1.0), Err(AppError::DegenerateParameters(_))));
    }

    #[test]
    fn volume_restricted_dozen_test_counts_only_matching_stakes() {
        let mut data = Vec::new();
        for i in 0..40 {
            data.push(bet(Outcome::Win, BetCategory::Dozen, i % 3, 0.1, 10));
        }
        for i in 0..60 {
            data.push(bet(Outcome::Loss, BetCategory::Dozen, i % 3, 0.5, 10));
        }
        let seg = Segment::all(&data);
        let small = BetFilter::category(BetCategory::Dozen).with_volume(VolumeRange::Below(0.25));
        let res = proportion_test(&seg, BetCategory::Dozen, &small, "dozen < 0.25").unwrap();
        assert_eq!(res.sample_size, 40);
        // every small-stake bet won: far above fair, tiny p
        assert!(res.p_value < 1e-6);

        let large = BetFilter::category(BetCategory::Dozen).with_volume(VolumeRange::AtLeast(0.25));
        let res = proportion_test(&seg, BetCategory::Dozen, &large, "dozen >= 0.25").unwrap();
        assert_eq!(res.sample_size, 60);
        assert!(res.statistic < 0.0);
        assert!(res.p_value > 0.99);
    }
}
