//! Debug bundle writer for inspecting a fetched page against the extraction rules.
//!
//! The bundle is a markdown summary (source URL, layout assumption, what the
//! rules extracted or which element they missed) next to the raw HTML.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::data::{CompanyPage, LAYOUT_VERSION, parse_company_page};
use crate::domain::ReportingPeriod;
use crate::error::{AppError, ErrorKind};

pub const DEFAULT_DEBUG_DIR: &str = "debug";

/// Write `<dir>/sv_page_<symbol>_<ts>.md` and `.html`; returns the markdown path.
pub fn write_page_dump(dir: &Path, page: &CompanyPage, period: &ReportingPeriod) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| io_error("Failed to create debug dir", e))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let stem = format!("sv_page_{}_{ts}", sanitize(&page.symbol));
    let html_path = dir.join(format!("{stem}.html"));
    let md_path = dir.join(format!("{stem}.md"));

    std::fs::write(&html_path, &page.html).map_err(|e| io_error("Failed to write page HTML", e))?;

    let mut file = File::create(&md_path).map_err(|e| io_error("Failed to create debug file", e))?;
    let outcome = match parse_company_page(&page.symbol, &page.html, period) {
        Ok(record) => format!(
            "ok: price={:.2} market_cap={} net_profit={:.2} pe={:.2} median_roce={} sales={:?} profit={:?}",
            record.price,
            record.market_cap,
            record.net_profit,
            record.trailing_pe,
            record.median_roce,
            record.sales_growth.values(),
            record.profit_growth.values(),
        ),
        Err(err) => format!("failed: {err}"),
    };

    let body = format!(
        "# sv page dump\n\
         - generated: {}\n\
         - symbol: {}\n\
         - url: {}\n\
         - fetched_at: {}\n\
         - layout: {LAYOUT_VERSION}\n\
         - reporting period: {} ({})\n\
         - html: {} ({} bytes)\n\
         \n## extraction\n{outcome}\n",
        Local::now().to_rfc3339(),
        page.symbol,
        page.url,
        page.fetched_at.to_rfc3339(),
        period.fiscal_label(),
        period.column_header(period.fiscal_year),
        html_path.display(),
        page.html.len(),
    );
    file.write_all(body.as_bytes())
        .map_err(|e| io_error("Failed to write debug file", e))?;

    Ok(md_path)
}

fn io_error(what: &str, e: std::io::Error) -> AppError {
    AppError::new(ErrorKind::Io, format!("{what}: {e}"))
}

/// Keep symbols like `M&M` or `BAJAJ-AUTO` filesystem-friendly.
fn sanitize(symbol: &str) -> String {
    symbol
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
