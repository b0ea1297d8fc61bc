//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by the extractor and consumed by the valuation calculator
//! - rendered by the CLI and TUI front-ends
//! - exported to JSON

use serde::{Deserialize, Serialize};

/// Number of yearly RoCE samples the median is taken over.
pub const ROCE_WINDOW: usize = 5;

/// Compounded-growth periods, in the fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPeriod {
    TenYears,
    FiveYears,
    ThreeYears,
    Ttm,
}

impl GrowthPeriod {
    pub const ALL: [GrowthPeriod; 4] = [
        GrowthPeriod::TenYears,
        GrowthPeriod::FiveYears,
        GrowthPeriod::ThreeYears,
        GrowthPeriod::Ttm,
    ];

    pub fn index(self) -> usize {
        match self {
            GrowthPeriod::TenYears => 0,
            GrowthPeriod::FiveYears => 1,
            GrowthPeriod::ThreeYears => 2,
            GrowthPeriod::Ttm => 3,
        }
    }

    /// Column label used in tables and charts.
    pub fn display_name(self) -> &'static str {
        match self {
            GrowthPeriod::TenYears => "10 YRS",
            GrowthPeriod::FiveYears => "5 YRS",
            GrowthPeriod::ThreeYears => "3 YRS",
            GrowthPeriod::Ttm => "TTM",
        }
    }

    /// Row label as it appears in the source page (without the trailing colon).
    pub fn source_label(self) -> &'static str {
        match self {
            GrowthPeriod::TenYears => "10 Years",
            GrowthPeriod::FiveYears => "5 Years",
            GrowthPeriod::ThreeYears => "3 Years",
            GrowthPeriod::Ttm => "TTM",
        }
    }
}

/// Four compounded-growth percentages, one per `GrowthPeriod`.
///
/// The fixed-size array makes the "exactly four, in order" rule a property of
/// the type rather than something callers have to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrowthSeries([i32; 4]);

impl GrowthSeries {
    pub fn new(values: [i32; 4]) -> Self {
        Self(values)
    }

    pub fn get(&self, period: GrowthPeriod) -> i32 {
        self.0[period.index()]
    }

    pub fn values(&self) -> [i32; 4] {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (GrowthPeriod, i32)> + '_ {
        GrowthPeriod::ALL.into_iter().map(|p| (p, self.get(p)))
    }
}

/// One yearly return-on-capital-employed observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoceSample {
    pub fiscal_year: i32,
    pub percent: f64,
}

/// Snapshot of one company, as extracted from its page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub symbol: String,
    pub name: String,
    /// Current traded price.
    pub price: f64,
    /// Market capitalization (crores); small caps show fractional crores.
    pub market_cap: f64,
    /// Net profit of the reference fiscal year (crores).
    pub net_profit: f64,
    /// `market_cap / net_profit`, rounded to 2 decimals.
    pub trailing_pe: f64,
    /// Median of the `ROCE_WINDOW` samples below.
    pub median_roce: f64,
    /// Oldest first.
    pub roce_samples: Vec<RoceSample>,
    pub sales_growth: GrowthSeries,
    pub profit_growth: GrowthSeries,
    /// e.g. `FY23`.
    pub fiscal_label: String,
}

/// Which fiscal year the "trailing" figures refer to.
///
/// Screener column headers look like `Mar 2023`; both parts are configurable so
/// the tool can be advanced as reporting periods roll forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub fiscal_year: i32,
    pub year_end_month: String,
}

impl Default for ReportingPeriod {
    fn default() -> Self {
        Self {
            fiscal_year: 2023,
            year_end_month: "Mar".to_string(),
        }
    }
}

impl ReportingPeriod {
    pub fn fiscal_label(&self) -> String {
        format!("FY{:02}", self.fiscal_year.rem_euclid(100))
    }

    pub fn column_header(&self, year: i32) -> String {
        format!("{} {}", self.year_end_month, year)
    }

    /// The `ROCE_WINDOW` fiscal years preceding the reference year, oldest first.
    pub fn roce_years(&self) -> Vec<i32> {
        let start = self.fiscal_year - ROCE_WINDOW as i32;
        (start..self.fiscal_year).collect()
    }
}

/// The six user-adjustable valuation parameters.
///
/// Rates are in percent. Bounds and defaults live in `valuation::params`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationInputs {
    pub cost_of_capital: f64,
    pub roce: f64,
    pub high_growth_rate: f64,
    pub high_growth_years: u32,
    pub fade_years: u32,
    pub terminal_growth_rate: f64,
}

/// Non-fatal observations about a valuation result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValuationWarning {
    /// Growth outpaces the return on capital; the multiple comes out negative.
    GrowthExceedsRoce { roce: f64, high_growth_rate: f64 },
}

impl std::fmt::Display for ValuationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValuationWarning::GrowthExceedsRoce {
                roce,
                high_growth_rate,
            } => write!(
                f,
                "RoCE {roce:.1}% is below the high-growth rate {high_growth_rate:.1}%; intrinsic P/E is negative and not economically meaningful"
            ),
        }
    }
}

/// Result of one valuation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationOutputs {
    /// The multiple compared against the intrinsic one (the trailing P/E).
    pub observed_pe: f64,
    pub intrinsic_pe: f64,
    /// One rate per fade year, ending at the terminal rate.
    pub fade_growth_rates: Vec<f64>,
    /// Signed fraction; `0.25` means 25% overvalued.
    pub degree_of_overvaluation: f64,
    /// High-growth length plus fade length.
    pub horizon_years: u32,
    pub warnings: Vec<ValuationWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_series_keeps_period_order() {
        let s = GrowthSeries::new([12, 9, 19, 3]);
        assert_eq!(s.get(GrowthPeriod::TenYears), 12);
        assert_eq!(s.get(GrowthPeriod::Ttm), 3);
        let labels: Vec<&str> = s.iter().map(|(p, _)| p.display_name()).collect();
        assert_eq!(labels, vec!["10 YRS", "5 YRS", "3 YRS", "TTM"]);
    }

    #[test]
    fn reporting_period_labels() {
        let period = ReportingPeriod::default();
        assert_eq!(period.fiscal_label(), "FY23");
        assert_eq!(period.column_header(2023), "Mar 2023");
        assert_eq!(period.roce_years(), vec![2018, 2019, 2020, 2021, 2022]);

        let rolled = ReportingPeriod {
            fiscal_year: 2030,
            year_end_month: "Dec".to_string(),
        };
        assert_eq!(rolled.fiscal_label(), "FY30");
        assert_eq!(rolled.column_header(2029), "Dec 2029");
    }

    #[test]
    fn growth_series_serializes_as_plain_array() {
        let s = GrowthSeries::new([1, -2, 3, 4]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "[1,-2,3,4]");
    }
}
