//! ASCII horizontal bar charts for terminal output.
//!
//! This is intentionally "dumb" (fixed-width grid), optimized for:
//! - quick visual comparison of growth across periods
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - zero axis: `|`
//! - bar body: `#` (drawn left of the axis for negative values)

use crate::domain::GrowthSeries;
use crate::report::fmt_number;

/// Render a horizontal bar chart for a growth series (period labels as rows).
pub fn render_growth_chart(title: &str, series: &GrowthSeries, width: usize) -> String {
    let bars: Vec<(&str, f64)> = series
        .iter()
        .map(|(period, value)| (period.display_name(), value as f64))
        .collect();
    render_hbar_chart(title, &bars, width)
}

/// Render labelled horizontal bars scaled into `width` columns.
pub fn render_hbar_chart(title: &str, bars: &[(&str, f64)], width: usize) -> String {
    let width = width.max(5);
    let label_width = bars.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

    let (v_min, v_max) = value_range(bars);
    let zero = map_x(0.0, v_min, v_max, width);

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    for &(label, value) in bars {
        let mut row = vec![' '; width];
        let x = map_x(value, v_min, v_max, width);
        if x > zero {
            for cell in &mut row[zero + 1..=x] {
                *cell = '#';
            }
        } else if x < zero {
            for cell in &mut row[x..zero] {
                *cell = '#';
            }
        }
        row[zero] = '|';

        let line = format!(
            "{label:>label_width$} {} {}%",
            row.into_iter().collect::<String>(),
            fmt_number(value)
        );
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Range covering every value and zero, never empty.
fn value_range(bars: &[(&str, f64)]) -> (f64, f64) {
    let mut min_v = 0.0_f64;
    let mut max_v = 0.0_f64;
    for &(_, v) in bars {
        if v.is_finite() {
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }
    }
    if max_v - min_v < 1e-12 {
        max_v = min_v + 1.0;
    }
    (min_v, max_v)
}

fn map_x(v: f64, v_min: f64, v_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((v - v_min) / (v_max - v_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}
