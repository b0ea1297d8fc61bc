//! Formatted terminal output for a company snapshot and its valuation.
//!
//! We keep formatting code in one place so:
//! - the extraction/valuation code stays clean and testable
//! - output changes are localized (the tests below are snapshot-style)

use crate::domain::{GrowthPeriod, StockRecord, ValuationInputs, ValuationOutputs};
use crate::valuation::{Param, ValuationError};

const LABEL_WIDTH: usize = 30;

/// Left panel: identity, price and the derived multiples.
pub fn format_stock_panel(record: &StockRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", record.name));
    push_field(&mut out, "Stock Symbol:", &record.symbol);
    push_field(&mut out, "Company Name:", &record.name);
    push_field(&mut out, "Price:", &format!("{:.2}", record.price));
    push_field(
        &mut out,
        &format!("{} PE:", record.fiscal_label),
        &format!("{:.2}", record.trailing_pe),
    );
    push_field(
        &mut out,
        "5-yr median pre-tax RoCE(%):",
        &fmt_number(record.median_roce),
    );

    let samples: Vec<String> = record
        .roce_samples
        .iter()
        .map(|s| format!("FY{:02} {}%", s.fiscal_year.rem_euclid(100), fmt_number(s.percent)))
        .collect();
    push_field(&mut out, "RoCE by year:", &samples.join(" | "));
    out
}

/// Right panel: sales and profit growth, transposed so periods are columns.
pub fn format_growth_table(record: &StockRecord) -> String {
    let mut out = String::new();

    let mut header = format!("{:<16}", "");
    for period in GrowthPeriod::ALL {
        header.push_str(&format!("{:>8}", period.display_name()));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for (label, series) in [
        ("Sales Growth", &record.sales_growth),
        ("Profit Growth", &record.profit_growth),
    ] {
        let mut line = format!("{label:<16}");
        for (_, value) in series.iter() {
            line.push_str(&format!("{:>8}", format!("{value}%")));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

/// Sidebar equivalent: parameters, intrinsic P/E and overvaluation.
///
/// A valuation error is rendered as a warning line; it never replaces the
/// parameter listing.
pub fn format_valuation(
    inputs: &ValuationInputs,
    outcome: &Result<ValuationOutputs, ValuationError>,
) -> String {
    let mut out = String::new();
    out.push_str("DCF Model and Overvaluation\n");

    for param in Param::ALL {
        let spec = param.spec();
        out.push_str(&format!(
            "  {:<38} {:>7}  [{} - {}]\n",
            spec.label,
            spec.format(inputs.get(param)),
            spec.format(spec.min),
            spec.format(spec.max),
        ));
    }
    out.push('\n');

    match outcome {
        Ok(v) => {
            push_field(&mut out, "Observed (trailing) PE:", &format!("{:.2}", v.observed_pe));
            push_field(&mut out, "Intrinsic PE:", &format!("{:.2}", v.intrinsic_pe));
            push_field(
                &mut out,
                "Degree of Overvaluation:",
                &format!("{:.2}%", v.degree_of_overvaluation * 100.0),
            );
            push_field(&mut out, "Horizon (years):", &v.horizon_years.to_string());
            let fade: Vec<String> = v.fade_growth_rates.iter().map(|r| format!("{r:.2}")).collect();
            push_field(&mut out, "Fade growth (%):", &fade.join(", "));
            for warning in &v.warnings {
                out.push_str(&format!("Warning: {warning}\n"));
            }
        }
        Err(err) => {
            out.push_str(&format!("Warning: valuation unavailable: {err}\n"));
        }
    }

    out
}

fn push_field(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("{label:<LABEL_WIDTH$}{value}\n"));
}

/// Whole numbers without a fraction, everything else with one decimal.
pub fn fmt_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}
