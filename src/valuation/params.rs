//! Bounds, defaults and step sizes of the six valuation parameters.

use crate::domain::ValuationInputs;

use super::ValuationError;

/// One adjustable valuation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    CostOfCapital,
    Roce,
    HighGrowthRate,
    HighGrowthYears,
    FadeYears,
    TerminalGrowthRate,
}

/// Range and default of a parameter, as exposed by the slider panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    /// Increment for one slider nudge.
    pub step: f64,
    /// Whole years rather than a rate.
    pub integer: bool,
}

impl Param {
    pub const ALL: [Param; 6] = [
        Param::CostOfCapital,
        Param::Roce,
        Param::HighGrowthRate,
        Param::HighGrowthYears,
        Param::FadeYears,
        Param::TerminalGrowthRate,
    ];

    pub fn spec(self) -> ParamSpec {
        match self {
            Param::CostOfCapital => ParamSpec {
                label: "Cost of Capital (CoC) %",
                min: 8.0,
                max: 16.0,
                default: 12.0,
                step: 0.5,
                integer: false,
            },
            Param::Roce => ParamSpec {
                label: "Return on Capital Employed (RoCE) %",
                min: 10.0,
                max: 100.0,
                default: 20.0,
                step: 1.0,
                integer: false,
            },
            Param::HighGrowthRate => ParamSpec {
                label: "Growth during High Growth Period %",
                min: 8.0,
                max: 20.0,
                default: 12.0,
                step: 0.5,
                integer: false,
            },
            Param::HighGrowthYears => ParamSpec {
                label: "High Growth Period (years)",
                min: 10.0,
                max: 25.0,
                default: 15.0,
                step: 1.0,
                integer: true,
            },
            Param::FadeYears => ParamSpec {
                label: "Fade Period (years)",
                min: 5.0,
                max: 20.0,
                default: 15.0,
                step: 1.0,
                integer: true,
            },
            Param::TerminalGrowthRate => ParamSpec {
                label: "Terminal Growth Rate %",
                min: 0.0,
                max: 7.5,
                default: 5.0,
                step: 0.25,
                integer: false,
            },
        }
    }
}

impl ParamSpec {
    pub fn check(&self, value: f64) -> Result<(), ValuationError> {
        if value.is_finite() && value >= self.min && value <= self.max {
            Ok(())
        } else {
            Err(ValuationError::OutOfRange {
                label: self.label,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }

    pub fn format(&self, value: f64) -> String {
        if self.integer {
            format!("{value:.0}")
        } else {
            format!("{value:.2}")
        }
    }
}

impl Default for ValuationInputs {
    fn default() -> Self {
        Self {
            cost_of_capital: Param::CostOfCapital.spec().default,
            roce: Param::Roce.spec().default,
            high_growth_rate: Param::HighGrowthRate.spec().default,
            high_growth_years: Param::HighGrowthYears.spec().default as u32,
            fade_years: Param::FadeYears.spec().default as u32,
            terminal_growth_rate: Param::TerminalGrowthRate.spec().default,
        }
    }
}

impl ValuationInputs {
    pub fn get(&self, param: Param) -> f64 {
        match param {
            Param::CostOfCapital => self.cost_of_capital,
            Param::Roce => self.roce,
            Param::HighGrowthRate => self.high_growth_rate,
            Param::HighGrowthYears => self.high_growth_years as f64,
            Param::FadeYears => self.fade_years as f64,
            Param::TerminalGrowthRate => self.terminal_growth_rate,
        }
    }

    /// Set a parameter, clamped into its range (slider semantics).
    pub fn set_clamped(&mut self, param: Param, value: f64) {
        let spec = param.spec();
        let v = value.clamp(spec.min, spec.max);
        match param {
            Param::CostOfCapital => self.cost_of_capital = v,
            Param::Roce => self.roce = v,
            Param::HighGrowthRate => self.high_growth_rate = v,
            Param::HighGrowthYears => self.high_growth_years = v.round() as u32,
            Param::FadeYears => self.fade_years = v.round() as u32,
            Param::TerminalGrowthRate => self.terminal_growth_rate = v,
        }
    }

    /// Move a parameter by `steps` slider increments.
    pub fn nudge(&mut self, param: Param, steps: i32) {
        let spec = param.spec();
        let next = self.get(param) + spec.step * steps as f64;
        // Snap to the step grid so repeated nudges do not accumulate float drift.
        let snapped = ((next - spec.min) / spec.step).round() * spec.step + spec.min;
        self.set_clamped(param, snapped);
    }

    /// Check every parameter against its bounds.
    pub fn validate(&self) -> Result<(), ValuationError> {
        for param in Param::ALL {
            param.spec().check(self.get(param))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_parameter_table() {
        let i = ValuationInputs::default();
        assert_eq!(i.cost_of_capital, 12.0);
        assert_eq!(i.roce, 20.0);
        assert_eq!(i.high_growth_rate, 12.0);
        assert_eq!(i.high_growth_years, 15);
        assert_eq!(i.fade_years, 15);
        assert_eq!(i.terminal_growth_rate, 5.0);
        assert!(i.validate().is_ok());
    }

    #[test]
    fn bounds_are_inclusive() {
        let spec = Param::TerminalGrowthRate.spec();
        assert!(spec.check(0.0).is_ok());
        assert!(spec.check(7.5).is_ok());
        assert!(spec.check(7.51).is_err());
        assert!(spec.check(-0.01).is_err());
        assert!(spec.check(f64::NAN).is_err());
    }

    #[test]
    fn validate_reports_offending_parameter() {
        let mut i = ValuationInputs::default();
        i.cost_of_capital = 20.0;
        match i.validate() {
            Err(ValuationError::OutOfRange { label, value, .. }) => {
                assert_eq!(label, "Cost of Capital (CoC) %");
                assert_eq!(value, 20.0);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn nudge_clamps_at_the_edges() {
        let mut i = ValuationInputs::default();
        i.nudge(Param::FadeYears, 100);
        assert_eq!(i.fade_years, 20);
        i.nudge(Param::FadeYears, -100);
        assert_eq!(i.fade_years, 5);

        i.nudge(Param::CostOfCapital, 3);
        assert_eq!(i.cost_of_capital, 13.5);
        i.nudge(Param::TerminalGrowthRate, 1);
        assert_eq!(i.terminal_growth_rate, 5.25);
    }
}
