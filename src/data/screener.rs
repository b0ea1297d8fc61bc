//! screener.in company pages over blocking HTTP.

use chrono::Local;
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{AppError, ErrorKind};

use super::{CompanyPage, PageSource, ScrapeError};

pub struct ScreenerClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl ScreenerClient {
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| AppError::new(ErrorKind::Config, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout_secs: settings.timeout.as_secs(),
        })
    }

    /// Canonical page URL; the symbol is used verbatim.
    pub fn company_url(&self, symbol: &str) -> String {
        format!("{}/company/{}/", self.base_url, symbol)
    }

    fn transport_error(&self, symbol: &str, err: reqwest::Error) -> ScrapeError {
        if err.is_timeout() {
            ScrapeError::Timeout {
                symbol: symbol.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            ScrapeError::Network {
                symbol: symbol.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

impl PageSource for ScreenerClient {
    fn fetch_page(&self, symbol: &str) -> Result<CompanyPage, ScrapeError> {
        let url = self.company_url(symbol);
        info!(symbol, %url, "fetching company page");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.transport_error(symbol, e))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(symbol, status = status.as_u16(), "company page request failed");
            return Err(ScrapeError::Status {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let html = resp.text().map_err(|e| self.transport_error(symbol, e))?;
        debug!(symbol, bytes = html.len(), "company page received");

        Ok(CompanyPage {
            symbol: symbol.to_string(),
            url,
            html,
            fetched_at: Local::now(),
        })
    }
}
