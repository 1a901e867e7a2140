use serde::Serialize;

use crate::config::p_thresholds;
use crate::stats::DrawdownResult;
use crate::types::{Severity, TestResult};

/// A breached threshold, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub label: String,
    pub message: String,
}

/// Map a p-value to its tier. Breakpoints are strict: `p == 0.0001` is a WARNING.
pub fn classify_p(p: f64) -> Option<Severity> {
    if p < p_thresholds::CRITICAL {
        Some(Severity::Critical)
    } else if p < p_thresholds::WARNING {
        Some(Severity::Warning)
    } else if p < p_thresholds::ALERT {
        Some(Severity::Alert)
    } else {
        None
    }
}

pub fn test_alert(result: &TestResult) -> Option<Alert> {
    let severity = classify_p(result.p_value)?;
    let label = &result.label;
    let message = match severity {
        Severity::Critical => {
            format!("@channel CRITICAL: {label} below 0.0001 - betting should be halted")
        }
        Severity::Warning => format!("@channel WARNING: {label} below 0.001"),
        Severity::Alert => format!("@channel ALERT: {label} below 0.01"),
    };
    Some(Alert {
        severity,
        label: label.clone(),
        message,
    })
}

pub fn drawdown_alert(result: &DrawdownResult) -> Option<Alert> {
    let severity = result.severity?;
    let label = format!("{:.4} {}", result.house_profit, result.label);
    let message = match severity {
        Severity::Critical => {
            format!("@channel CRITICAL: {label} < 200 max bets - betting should be halted")
        }
        Severity::Warning => format!("@channel WARNING: {label} < 150 max bets"),
        Severity::Alert => format!("@channel ALERT: {label} < 100 max bets"),
    };
    Some(Alert {
        severity,
        label,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TestKind;

    fn result(p_value: f64) -> TestResult {
        TestResult {
            label: "color chi2 p last 1000".to_string(),
            kind: TestKind::Independence { dof: 1 },
            statistic: 0.0,
            p_value,
            sample_size: 1000,
        }
    }

    #[test]
    fn tier_boundaries_are_strict() {
        assert_eq!(classify_p(0.0001), Some(Severity::Warning));
        assert_eq!(classify_p(0.00009), Some(Severity::Critical));
        assert_eq!(classify_p(0.001), Some(Severity::Alert));
        assert_eq!(classify_p(0.0099), Some(Severity::Alert));
        assert_eq!(classify_p(0.01), None);
        assert_eq!(classify_p(0.58), None);
    }

    #[test]
    fn critical_message_names_the_check() {
        let alert = test_alert(&result(1e-6)).unwrap();
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(
            alert.message,
            "@channel CRITICAL: color chi2 p last 1000 below 0.0001 - betting should be halted"
        );
    }

    #[test]
    fn quiet_result_has_no_alert() {
        assert!(test_alert(&result(0.2)).is_none());
    }

    #[test]
    fn drawdown_message_carries_amount() {
        let dd = DrawdownResult {
            label: "last 100 bets".to_string(),
            house_profit: -113.25,
            max_bet: 0.75,
            severity: Some(Severity::Warning),
        };
        let alert = drawdown_alert(&dd).unwrap();
        assert_eq!(alert.message, "@channel WARNING: -113.2500 last 100 bets < 150 max bets");
    }
}
