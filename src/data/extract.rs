//! Named extraction rules for screener company pages.
//!
//! Values are located by section id, row label and column header rather than
//! by position, so a layout change surfaces as a `ScrapeError` naming the
//! missing element instead of a silently shifted number.
//!
//! Layout assumptions (checked, see `LAYOUT_VERSION`):
//!
//! - `#top-ratios li` items carry a `.name` and a `.value` span
//! - `section#profit-loss` and `section#ratios` each hold a `table.data-table`
//!   whose header row is `["", "Mar 2013", ..., "TTM"]` and whose body rows
//!   start with a label cell
//! - compounded growth lives in `table.ranges-table` blocks whose first `th`
//!   names the series and whose rows are `["10 Years:", "12%"]`

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::domain::{
    GrowthPeriod, GrowthSeries, ROCE_WINDOW, ReportingPeriod, RoceSample, StockRecord,
};

use super::ScrapeError;
use super::text::{normalize_label, parse_decimal, parse_percent};

/// Page layout these rules were written against.
pub const LAYOUT_VERSION: &str = "screener.in company page, 2024";

/// Accepted range for any percentage read from the page.
const PERCENT_RANGE: (f64, f64) = (-100.0, 1000.0);

const MARKET_CAP_LABEL: &str = "market cap";
const PRICE_LABEL: &str = "current price";
const NET_PROFIT_LABEL: &str = "net profit";
const ROCE_LABEL: &str = "roce %";
const SALES_GROWTH_TITLE: &str = "compounded sales growth";
const PROFIT_GROWTH_TITLE: &str = "compounded profit growth";

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector parses")
}

static NAME: LazyLock<Selector> = LazyLock::new(|| sel("h1"));
static TOP_RATIO_ITEM: LazyLock<Selector> = LazyLock::new(|| sel("#top-ratios li"));
static RATIO_NAME: LazyLock<Selector> = LazyLock::new(|| sel(".name"));
static RATIO_VALUE: LazyLock<Selector> = LazyLock::new(|| sel(".value"));
static PROFIT_LOSS_TABLE: LazyLock<Selector> = LazyLock::new(|| sel("section#profit-loss table.data-table"));
static RATIOS_TABLE: LazyLock<Selector> = LazyLock::new(|| sel("section#ratios table.data-table"));
static RANGES_TABLE: LazyLock<Selector> = LazyLock::new(|| sel("table.ranges-table"));
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| sel("thead th"));
static BODY_ROW: LazyLock<Selector> = LazyLock::new(|| sel("tbody tr"));
static ROW: LazyLock<Selector> = LazyLock::new(|| sel("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| sel("td"));
static TH: LazyLock<Selector> = LazyLock::new(|| sel("th"));

/// Parse a company page into a `StockRecord`.
///
/// Either every field is found and passes its sanity check, or the call fails;
/// there is no partially populated record.
pub fn parse_company_page(
    symbol: &str,
    html: &str,
    period: &ReportingPeriod,
) -> Result<StockRecord, ScrapeError> {
    let doc = Html::parse_document(html);

    let name = doc
        .select(&NAME)
        .next()
        .map(|h1| collapse(&text_of(h1)))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing("company name heading"))?;

    let market_cap_text = top_ratio(&doc, MARKET_CAP_LABEL)?;
    let market_cap = parse_decimal(&market_cap_text).ok_or_else(|| ScrapeError::Conversion {
        field: "market cap",
        text: market_cap_text.clone(),
    })?;
    if market_cap <= 0.0 {
        return Err(ScrapeError::Implausible {
            field: "market cap",
            value: market_cap,
        });
    }

    let price_text = top_ratio(&doc, PRICE_LABEL)?;
    let price = parse_decimal(&price_text).ok_or_else(|| ScrapeError::Conversion {
        field: "current price",
        text: price_text.clone(),
    })?;
    if price <= 0.0 {
        return Err(ScrapeError::Implausible {
            field: "current price",
            value: price,
        });
    }

    let profit_loss = DataTable::find(&doc, &PROFIT_LOSS_TABLE, "profit & loss table")?;
    let fy_header = period.column_header(period.fiscal_year);
    let profit_text = profit_loss.cell(NET_PROFIT_LABEL, &fy_header)?;
    let net_profit = parse_decimal(profit_text).ok_or_else(|| ScrapeError::Conversion {
        field: "net profit",
        text: profit_text.to_string(),
    })?;
    if net_profit <= 0.0 {
        return Err(ScrapeError::Implausible {
            field: "net profit",
            value: net_profit,
        });
    }
    let trailing_pe = round2(market_cap / net_profit);

    let ratios = DataTable::find(&doc, &RATIOS_TABLE, "ratios table")?;
    let mut roce_samples = Vec::with_capacity(ROCE_WINDOW);
    for year in period.roce_years() {
        let text = ratios.cell(ROCE_LABEL, &period.column_header(year))?;
        let percent = parse_percent(text).ok_or_else(|| ScrapeError::Conversion {
            field: "RoCE",
            text: text.to_string(),
        })?;
        check_percent("RoCE", percent)?;
        roce_samples.push(RoceSample {
            fiscal_year: year,
            percent,
        });
    }
    let values: Vec<f64> = roce_samples.iter().map(|s| s.percent).collect();
    let median_roce = median(&values).ok_or_else(|| missing("RoCE samples"))?;

    let sales_growth = growth_series(&doc, SALES_GROWTH_TITLE)?;
    let profit_growth = growth_series(&doc, PROFIT_GROWTH_TITLE)?;

    debug!(
        symbol,
        market_cap,
        price,
        net_profit,
        trailing_pe,
        median_roce,
        sales = ?sales_growth.values(),
        profit = ?profit_growth.values(),
        "extracted company snapshot"
    );

    Ok(StockRecord {
        symbol: symbol.to_string(),
        name,
        price,
        market_cap,
        net_profit,
        trailing_pe,
        median_roce,
        roce_samples,
        sales_growth,
        profit_growth,
        fiscal_label: period.fiscal_label(),
    })
}

/// Standard median: the middle of the sorted values, or the mean of the two
/// middle values for an even count.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn missing(what: impl Into<String>) -> ScrapeError {
    ScrapeError::MissingElement { what: what.into() }
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn check_percent(field: &'static str, value: f64) -> Result<(), ScrapeError> {
    let (lo, hi) = PERCENT_RANGE;
    if value < lo || value > hi {
        return Err(ScrapeError::Implausible { field, value });
    }
    Ok(())
}

/// Value text of the `#top-ratios` item whose name matches `label`.
fn top_ratio(doc: &Html, label: &str) -> Result<String, ScrapeError> {
    for item in doc.select(&TOP_RATIO_ITEM) {
        let Some(name) = item.select(&RATIO_NAME).next() else {
            continue;
        };
        if normalize_label(&text_of(name)) != label {
            continue;
        }
        let value = item
            .select(&RATIO_VALUE)
            .next()
            .ok_or_else(|| missing(format!("value of top ratio '{label}'")))?;
        return Ok(collapse(&text_of(value)));
    }
    Err(missing(format!("top ratio '{label}'")))
}

/// A `table.data-table` flattened into header texts and labelled rows.
struct DataTable {
    what: &'static str,
    headers: Vec<String>,
    rows: Vec<(String, Vec<String>)>,
}

impl DataTable {
    fn find(doc: &Html, sel: &Selector, what: &'static str) -> Result<Self, ScrapeError> {
        let table = doc.select(sel).next().ok_or_else(|| missing(what))?;

        let headers = table
            .select(&HEADER_CELL)
            .map(|th| collapse(&text_of(th)))
            .collect::<Vec<_>>();
        if headers.is_empty() {
            return Err(missing(format!("header row of {what}")));
        }

        let rows = table
            .select(&BODY_ROW)
            .filter_map(|tr| {
                let cells: Vec<String> = tr.select(&CELL).map(text_of).collect();
                let label = normalize_label(cells.first()?);
                Some((label, cells))
            })
            .collect();

        Ok(Self {
            what,
            headers,
            rows,
        })
    }

    /// Text of the cell in the row labelled `row_label` under `column_header`.
    fn cell(&self, row_label: &str, column_header: &str) -> Result<&str, ScrapeError> {
        let col = self
            .headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(column_header))
            .ok_or_else(|| missing(format!("column '{column_header}' in {}", self.what)))?;

        let (_, cells) = self
            .rows
            .iter()
            .find(|(label, _)| label == row_label)
            .ok_or_else(|| missing(format!("row '{row_label}' in {}", self.what)))?;

        cells
            .get(col)
            .map(|s| s.trim())
            .ok_or_else(|| missing(format!("'{row_label}' value for '{column_header}' in {}", self.what)))
    }
}

/// The four compounded-growth figures from the ranges table titled `title`.
fn growth_series(doc: &Html, title: &str) -> Result<GrowthSeries, ScrapeError> {
    let table = doc
        .select(&RANGES_TABLE)
        .find(|t| {
            t.select(&TH)
                .next()
                .is_some_and(|th| normalize_label(&text_of(th)) == title)
        })
        .ok_or_else(|| missing(format!("'{title}' table")))?;

    let rows: Vec<(String, String)> = table
        .select(&ROW)
        .filter_map(|tr| {
            let mut cells = tr.select(&CELL);
            let label = normalize_label(&text_of(cells.next()?));
            let value = text_of(cells.next()?);
            Some((label, value))
        })
        .collect();

    let mut values = [0i32; 4];
    for period in GrowthPeriod::ALL {
        let wanted = period.source_label().to_lowercase();
        let (_, text) = rows
            .iter()
            .find(|(label, _)| *label == wanted)
            .ok_or_else(|| missing(format!("'{}' row in '{title}' table", period.source_label())))?;
        let percent = parse_percent(text).ok_or_else(|| ScrapeError::Conversion {
            field: "compounded growth",
            text: text.trim().to_string(),
        })?;
        check_percent("compounded growth", percent)?;
        values[period.index()] = percent.round() as i32;
    }

    Ok(GrowthSeries::new(values))
}
