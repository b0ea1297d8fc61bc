//! Intrinsic P/E, fade schedule and degree of overvaluation.
//!
//! The multiple is the stylized growth/return closed form
//!
//! `intrinsic_pe = cost_of_capital / (roce - high_growth_rate)`
//!
//! and the fade schedule interpolates linearly from the high-growth rate down to
//! the terminal rate over `fade_years` annual steps.

use tracing::warn;

use crate::domain::{ValuationInputs, ValuationOutputs, ValuationWarning};

use super::ValuationError;

/// Denominators smaller than this are treated as zero.
const SPREAD_EPSILON: f64 = 1e-9;

/// Intrinsic multiple plus the fade schedule that accompanies it.
#[derive(Debug, Clone, PartialEq)]
pub struct IntrinsicPe {
    pub intrinsic_pe: f64,
    pub fade_growth_rates: Vec<f64>,
    pub warnings: Vec<ValuationWarning>,
}

/// Compute the intrinsic P/E and the linear fade schedule.
///
/// `high_growth_years` does not enter the multiple.
pub fn compute_intrinsic_pe(inputs: &ValuationInputs) -> Result<IntrinsicPe, ValuationError> {
    let spread = inputs.roce - inputs.high_growth_rate;
    if !spread.is_finite() || spread.abs() < SPREAD_EPSILON {
        return Err(ValuationError::DegenerateSpread {
            roce: inputs.roce,
            high_growth_rate: inputs.high_growth_rate,
        });
    }

    let intrinsic_pe = inputs.cost_of_capital / spread;
    let fade_growth_rates = fade_schedule(
        inputs.high_growth_rate,
        inputs.terminal_growth_rate,
        inputs.fade_years,
    )?;

    let mut warnings = Vec::new();
    if spread < 0.0 {
        warn!(
            roce = inputs.roce,
            high_growth_rate = inputs.high_growth_rate,
            intrinsic_pe,
            "growth exceeds RoCE; intrinsic P/E is negative"
        );
        warnings.push(ValuationWarning::GrowthExceedsRoce {
            roce: inputs.roce,
            high_growth_rate: inputs.high_growth_rate,
        });
    }

    Ok(IntrinsicPe {
        intrinsic_pe,
        fade_growth_rates,
        warnings,
    })
}

/// Linear fade from `high` toward `terminal`; step `i` (1-based) is
/// `high - i * (high - terminal) / fade_years`.
pub fn fade_schedule(high: f64, terminal: f64, fade_years: u32) -> Result<Vec<f64>, ValuationError> {
    if fade_years == 0 {
        return Err(ValuationError::ZeroFadePeriod);
    }

    let n = fade_years as f64;
    let diff = high - terminal;
    let rates = (1..=fade_years)
        .map(|i| {
            if i == fade_years {
                // Pinned so float rounding cannot leave the last step a hair off.
                terminal
            } else {
                high - diff * i as f64 / n
            }
        })
        .collect();
    Ok(rates)
}

/// `observed_pe / intrinsic_pe - 1`, as a signed fraction.
pub fn compute_overvaluation(observed_pe: f64, intrinsic_pe: f64) -> Result<f64, ValuationError> {
    if !intrinsic_pe.is_finite() || intrinsic_pe.abs() < SPREAD_EPSILON {
        return Err(ValuationError::DegenerateIntrinsicPe(intrinsic_pe));
    }
    Ok(observed_pe / intrinsic_pe - 1.0)
}

/// Full valuation pass against an observed (trailing) P/E.
///
/// Inputs are checked against their bounds before anything is computed.
pub fn value(observed_pe: f64, inputs: &ValuationInputs) -> Result<ValuationOutputs, ValuationError> {
    inputs.validate()?;

    let intrinsic = compute_intrinsic_pe(inputs)?;
    let degree_of_overvaluation = compute_overvaluation(observed_pe, intrinsic.intrinsic_pe)?;

    Ok(ValuationOutputs {
        observed_pe,
        intrinsic_pe: intrinsic.intrinsic_pe,
        fade_growth_rates: intrinsic.fade_growth_rates,
        degree_of_overvaluation,
        horizon_years: inputs.high_growth_years + inputs.fade_years,
        warnings: intrinsic.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(roce: f64, high: f64, fade_years: u32, terminal: f64) -> ValuationInputs {
        ValuationInputs {
            cost_of_capital: 12.0,
            roce,
            high_growth_rate: high,
            high_growth_years: 15,
            fade_years,
            terminal_growth_rate: terminal,
        }
    }

    #[test]
    fn intrinsic_pe_default_inputs() {
        let out = compute_intrinsic_pe(&inputs(20.0, 12.0, 15, 5.0)).unwrap();
        assert!((out.intrinsic_pe - 1.5).abs() < 1e-12);
        assert_eq!(out.fade_growth_rates.len(), 15);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn fade_schedule_steps_linearly_to_terminal() {
        let rates = fade_schedule(12.0, 5.0, 5).unwrap();
        let expected = [10.6, 9.2, 7.8, 6.4, 5.0];
        assert_eq!(rates.len(), expected.len());
        for (got, want) in rates.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
        }
        assert_eq!(rates[4], 5.0);
    }

    #[test]
    fn fade_schedule_rejects_zero_years() {
        assert_eq!(fade_schedule(12.0, 5.0, 0), Err(ValuationError::ZeroFadePeriod));
    }

    #[test]
    fn equal_roce_and_growth_is_a_domain_error() {
        let err = compute_intrinsic_pe(&inputs(12.0, 12.0, 15, 5.0)).unwrap_err();
        assert!(matches!(err, ValuationError::DegenerateSpread { .. }));
    }

    #[test]
    fn growth_above_roce_is_negative_with_warning() {
        let out = compute_intrinsic_pe(&inputs(10.0, 12.0, 15, 5.0)).unwrap();
        assert!((out.intrinsic_pe + 6.0).abs() < 1e-12);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn overvaluation_fair_value_is_zero() {
        assert_eq!(compute_overvaluation(1.5, 1.5).unwrap(), 0.0);
        assert!((compute_overvaluation(3.0, 1.5).unwrap() - 1.0).abs() < 1e-12);
        assert!((compute_overvaluation(0.75, 1.5).unwrap() + 0.5).abs() < 1e-12);
    }

    #[test]
    fn overvaluation_rejects_zero_intrinsic() {
        assert_eq!(
            compute_overvaluation(10.0, 0.0),
            Err(ValuationError::DegenerateIntrinsicPe(0.0))
        );
    }

    #[test]
    fn value_is_deterministic() {
        let i = ValuationInputs::default();
        let a = value(45.3, &i).unwrap();
        let b = value(45.3, &i).unwrap();
        assert_eq!(a, b);
        assert!((a.intrinsic_pe - 1.5).abs() < 1e-12);
        assert!((a.degree_of_overvaluation - (45.3 / 1.5 - 1.0)).abs() < 1e-9);
        assert_eq!(a.horizon_years, 30);
    }

    #[test]
    fn value_checks_bounds_first() {
        let mut i = ValuationInputs::default();
        i.fade_years = 0;
        let err = value(20.0, &i).unwrap_err();
        assert!(matches!(err, ValuationError::OutOfRange { .. }));
    }
}
