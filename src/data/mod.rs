//! Company-page extraction.
//!
//! - `screener`: the HTTP side (one blocking GET per symbol)
//! - `extract`: named extraction rules over the parsed page
//! - `text`: number cleanup for display text
//!
//! `Extractor` glues a `PageSource` to the parser so the network can be swapped
//! out in tests.

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::domain::{ReportingPeriod, StockRecord};

pub mod extract;
pub mod screener;
pub mod text;

pub use extract::{LAYOUT_VERSION, median, parse_company_page};
pub use screener::ScreenerClient;

/// Why a company snapshot could not be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScrapeError {
    #[error("data unavailable for '{symbol}': {reason}")]
    Network { symbol: String, reason: String },

    #[error("data unavailable for '{symbol}': no response within {secs}s")]
    Timeout { symbol: String, secs: u64 },

    #[error("{}", status_message(symbol, *status))]
    Status { symbol: String, status: u16 },

    #[error("no data for this symbol: symbol is empty")]
    EmptySymbol,

    #[error("unexpected page format ({}): missing {what}", LAYOUT_VERSION)]
    MissingElement { what: String },

    #[error("unexpected page format: could not read {field} from {text:?}")]
    Conversion { field: &'static str, text: String },

    #[error("unexpected page format: implausible {field} value {value}")]
    Implausible { field: &'static str, value: f64 },
}

fn status_message(symbol: &str, status: u16) -> String {
    if status == 404 {
        format!("no data for symbol '{symbol}' (HTTP 404)")
    } else {
        format!("data unavailable for '{symbol}': HTTP {status}")
    }
}

impl ScrapeError {
    /// True for transport/status failures, false for page-content failures.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            ScrapeError::Network { .. } | ScrapeError::Timeout { .. } | ScrapeError::Status { .. }
        )
    }
}

/// Raw page as fetched, kept around for diagnostics.
#[derive(Debug, Clone)]
pub struct CompanyPage {
    pub symbol: String,
    pub url: String,
    pub html: String,
    pub fetched_at: DateTime<Local>,
}

/// Anything that can produce the page for a symbol.
pub trait PageSource {
    fn fetch_page(&self, symbol: &str) -> Result<CompanyPage, ScrapeError>;
}

/// `fetch(symbol) -> StockRecord`: one page fetch followed by extraction.
pub struct Extractor<S> {
    source: S,
    period: ReportingPeriod,
}

impl<S: PageSource> Extractor<S> {
    pub fn new(source: S, period: ReportingPeriod) -> Self {
        Self { source, period }
    }

    pub fn period(&self) -> &ReportingPeriod {
        &self.period
    }

    pub fn fetch(&self, symbol: &str) -> Result<StockRecord, ScrapeError> {
        self.fetch_with_page(symbol).map(|(record, _)| record)
    }

    /// Like `fetch`, also returning the raw page.
    pub fn fetch_with_page(&self, symbol: &str) -> Result<(StockRecord, CompanyPage), ScrapeError> {
        let page = self.fetch_page(symbol)?;
        let record = self.parse(&page)?;
        Ok((record, page))
    }

    /// Fetch only; the page outlives a later parse failure so it can be dumped.
    pub fn fetch_page(&self, symbol: &str) -> Result<CompanyPage, ScrapeError> {
        if symbol.trim().is_empty() {
            return Err(ScrapeError::EmptySymbol);
        }
        self.source.fetch_page(symbol)
    }

    pub fn parse(&self, page: &CompanyPage) -> Result<StockRecord, ScrapeError> {
        parse_company_page(&page.symbol, &page.html, &self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPage(Result<String, ScrapeError>);

    impl PageSource for FixedPage {
        fn fetch_page(&self, symbol: &str) -> Result<CompanyPage, ScrapeError> {
            let html = self.0.clone()?;
            Ok(CompanyPage {
                symbol: symbol.to_string(),
                url: format!("https://example.test/company/{symbol}/"),
                html,
                fetched_at: Local::now(),
            })
        }
    }

    #[test]
    fn fetch_returns_full_record() {
        let html = include_str!("fixtures/company_page.html").to_string();
        let extractor = Extractor::new(FixedPage(Ok(html)), ReportingPeriod::default());
        let record = extractor.fetch("RELIANCE").unwrap();
        assert_eq!(record.trailing_pe, 26.09);
    }

    #[test]
    fn not_found_is_a_fetch_error() {
        let source = FixedPage(Err(ScrapeError::Status {
            symbol: "NOPE".to_string(),
            status: 404,
        }));
        let err = Extractor::new(source, ReportingPeriod::default())
            .fetch("NOPE")
            .unwrap_err();
        assert!(err.is_fetch());
        assert_eq!(err.to_string(), "no data for symbol 'NOPE' (HTTP 404)");
    }

    #[test]
    fn page_survives_a_parse_failure() {
        let source = FixedPage(Ok("<html><h1>Redesigned</h1></html>".to_string()));
        let extractor = Extractor::new(source, ReportingPeriod::default());
        let page = extractor.fetch_page("RELIANCE").unwrap();
        let err = extractor.parse(&page).unwrap_err();
        assert!(matches!(err, ScrapeError::MissingElement { .. }));
        assert!(page.html.contains("Redesigned"));
    }

    #[test]
    fn empty_symbol_never_reaches_the_source() {
        let source = FixedPage(Err(ScrapeError::Network {
            symbol: String::new(),
            reason: "should not be called".to_string(),
        }));
        let err = Extractor::new(source, ReportingPeriod::default())
            .fetch("  ")
            .unwrap_err();
        assert_eq!(err, ScrapeError::EmptySymbol);
    }
}
