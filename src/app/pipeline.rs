//! Shared "snapshot pipeline" logic used by both CLI and TUI front-ends.
//!
//! symbol -> page fetch -> extraction -> valuation -> text report
//!
//! Re-valuing never fetches: `revalue` is a pure function of the record and
//! the inputs.

use tracing::info;

use crate::config::Settings;
use crate::data::{CompanyPage, Extractor, ScreenerClient};
use crate::domain::{StockRecord, ValuationInputs, ValuationOutputs};
use crate::error::AppError;
use crate::valuation::ValuationError;

/// One fetched company: the record and the page it came from.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub record: StockRecord,
    pub page: CompanyPage,
}

/// Fetch and extract one company snapshot.
pub fn fetch_snapshot(settings: &Settings, symbol: &str) -> Result<Fetched, AppError> {
    let extractor = Extractor::new(ScreenerClient::new(settings)?, settings.period.clone());
    let (record, page) = extractor.fetch_with_page(symbol)?;
    info!(symbol = %record.symbol, pe = record.trailing_pe, "snapshot extracted");
    Ok(Fetched { record, page })
}

/// Value a record against its trailing P/E.
pub fn revalue(record: &StockRecord, inputs: &ValuationInputs) -> Result<ValuationOutputs, ValuationError> {
    crate::valuation::value(record.trailing_pe, inputs)
}

/// Everything `sv show` prints for one record.
///
/// `chart_width` of `None` skips the bar charts.
pub fn render_report(
    record: &StockRecord,
    inputs: &ValuationInputs,
    outcome: &Result<ValuationOutputs, ValuationError>,
    chart_width: Option<usize>,
) -> String {
    let mut sections = vec![
        crate::report::format_stock_panel(record),
        crate::report::format_growth_table(record),
    ];
    if let Some(width) = chart_width {
        sections.push(crate::plot::render_growth_chart("Sales Growth %", &record.sales_growth, width));
        sections.push(crate::plot::render_growth_chart("Profit Growth %", &record.profit_growth, width));
    }
    sections.push(crate::report::format_valuation(inputs, outcome));
    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReportingPeriod;

    fn record() -> StockRecord {
        let html = include_str!("../data/fixtures/company_page.html");
        crate::data::parse_company_page("RELIANCE", html, &ReportingPeriod::default()).unwrap()
    }

    #[test]
    fn revalue_uses_trailing_pe() {
        let record = record();
        let out = revalue(&record, &ValuationInputs::default()).unwrap();
        assert_eq!(out.observed_pe, record.trailing_pe);
        assert_eq!(out.intrinsic_pe, 1.5);
        assert!((out.degree_of_overvaluation - (26.09 / 1.5 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn report_is_deterministic_and_keeps_record_on_valuation_error() {
        let record = record();
        let inputs = ValuationInputs {
            roce: 12.0,
            ..ValuationInputs::default()
        };
        let outcome = revalue(&record, &inputs);
        assert!(outcome.is_err());

        let a = render_report(&record, &inputs, &outcome, Some(30));
        let b = render_report(&record, &inputs, &outcome, Some(30));
        assert_eq!(a, b);
        assert!(a.contains("RELIANCE"));
        assert!(a.contains("Sales Growth %"));
        assert!(a.contains("Warning: valuation unavailable"));

        let no_chart = render_report(&record, &inputs, &outcome, None);
        assert!(!no_chart.contains("Sales Growth %"));
    }
}
