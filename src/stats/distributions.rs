//! Tail probabilities for the standard normal and chi-square distributions.

use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

use crate::error::{AppError, Result};

/// Probability that a standard normal variable exceeds `z`.
pub fn normal_sf(z: f64) -> Result<f64> {
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::DegenerateParameters(format!("standard normal: {e}")))?;
    Ok(normal.sf(z))
}

/// Probability that a chi-square variable with `dof` degrees of freedom exceeds `statistic`.
pub fn chi_square_sf(statistic: f64, dof: usize) -> Result<f64> {
    if dof == 0 {
        return Err(AppError::DegenerateParameters(
            "chi-square with zero degrees of freedom".to_string(),
        ));
    }
    if !statistic.is_finite() {
        return Err(AppError::DegenerateParameters(format!(
            "chi-square statistic is {statistic}"
        )));
    }
    if statistic <= 0.0 {
        return Ok(1.0);
    }
    let dist = ChiSquared::new(dof as f64)
        .map_err(|e| AppError::DegenerateParameters(format!("chi-square({dof}): {e}")))?;
    Ok(dist.sf(statistic))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn normal_sf_at_zero_is_half() {
        assert!(close(normal_sf(0.0).unwrap(), 0.5, 1e-15));
    }

    #[test]
    fn normal_sf_matches_tables() {
        assert!(close(normal_sf(1.959_963_985).unwrap(), 0.025, 1e-9));
        assert!(close(normal_sf(-1.959_963_985).unwrap(), 0.975, 1e-9));
        assert!(close(normal_sf(1.0).unwrap(), 0.158_655_253_931_457, 1e-10));
        assert!(close(normal_sf(2.326_347_874).unwrap(), 0.01, 1e-9));
    }

    #[test]
    fn normal_sf_keeps_relative_accuracy_in_tail() {
        let p = normal_sf(3.719_016_485).unwrap();
        assert!((p / 1e-4 - 1.0).abs() < 1e-6, "p = {p:e}");
        let p = normal_sf(8.0).unwrap();
        assert!((p / 6.220_960_574_271_784e-16 - 1.0).abs() < 1e-6, "p = {p:e}");
    }

    #[test]
    fn normal_sf_is_symmetric() {
        for z in [0.3, 1.1, 2.5, 4.0] {
            let sum = normal_sf(z).unwrap() + normal_sf(-z).unwrap();
            assert!(close(sum, 1.0, 1e-12));
        }
    }

    #[test]
    fn chi_square_sf_critical_values() {
        assert!(close(chi_square_sf(3.841_458_821, 1).unwrap(), 0.05, 1e-9));
        assert!(close(chi_square_sf(6.634_896_601, 1).unwrap(), 0.01, 1e-9));
        assert!(close(chi_square_sf(5.991_464_547, 2).unwrap(), 0.05, 1e-9));
        assert!(close(chi_square_sf(11.344_866_73, 3).unwrap(), 0.01, 1e-8));
    }

    #[test]
    fn chi_square_two_dof_is_exponential() {
        for x in [0.5, 2.0, 9.0, 30.0] {
            let expected = (-x / 2.0f64).exp();
            let p = chi_square_sf(x, 2).unwrap();
            assert!((p / expected - 1.0).abs() < 1e-8, "x={x} p={p:e}");
        }
    }

    #[test]
    fn chi_square_edge_inputs() {
        assert_eq!(chi_square_sf(0.0, 1).unwrap(), 1.0);
        assert!(matches!(
            chi_square_sf(1.0, 0),
            Err(AppError::DegenerateParameters(_))
        ));
        assert!(chi_square_sf(f64::NAN, 1).is_err());
    }
}
