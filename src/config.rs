//! Runtime settings.
//!
//! Loaded from the environment (a `.env` file is honored via `dotenvy`), then
//! selectively overridden by CLI flags.

use std::time::Duration;

use crate::domain::ReportingPeriod;
use crate::error::{AppError, ErrorKind};

pub const DEFAULT_BASE_URL: &str = "https://www.screener.in";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub period: ReportingPeriod,
    /// `tracing` filter directives; logging stays quiet in the TUI when unset.
    pub log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            period: ReportingPeriod::default(),
            log_filter: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (the environment in practice).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut settings = Settings::default();

        if let Some(url) = non_empty(lookup("SV_BASE_URL")) {
            settings.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = non_empty(lookup("SV_TIMEOUT_SECS")) {
            let secs: u64 = raw
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| config_error("SV_TIMEOUT_SECS", &raw, "a positive number of seconds"))?;
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(ua) = non_empty(lookup("SV_USER_AGENT")) {
            settings.user_agent = ua;
        }
        if let Some(raw) = non_empty(lookup("SV_FISCAL_YEAR")) {
            settings.period.fiscal_year = parse_fiscal_year(&raw)
                .ok_or_else(|| config_error("SV_FISCAL_YEAR", &raw, "a year such as 2023"))?;
        }
        if let Some(month) = non_empty(lookup("SV_YEAR_END_MONTH")) {
            settings.period.year_end_month = month;
        }
        settings.log_filter = non_empty(lookup("SV_LOG")).or_else(|| non_empty(lookup("RUST_LOG")));

        Ok(settings)
    }
}

/// Accepts `2023`, `FY23` and `fy2023`.
pub fn parse_fiscal_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("FY")
        .or_else(|| trimmed.strip_prefix("fy"))
        .unwrap_or(trimmed);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = digits.parse().ok()?;
    match digits.len() {
        2 => Some(2000 + year),
        4 if (1990..=2100).contains(&year) => Some(year),
        _ => None,
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn config_error(key: &str, raw: &str, expected: &str) -> AppError {
    AppError::new(
        ErrorKind::Config,
        format!("Invalid {key}='{raw}': expected {expected}."),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let s = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(s.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.timeout, Duration::from_secs(10));
        assert_eq!(s.period.fiscal_label(), "FY23");
        assert!(s.log_filter.is_none());
    }

    #[test]
    fn environment_overrides() {
        let s = Settings::from_lookup(lookup(&[
            ("SV_BASE_URL", "http://127.0.0.1:9000/"),
            ("SV_TIMEOUT_SECS", "3"),
            ("SV_FISCAL_YEAR", "FY24"),
            ("SV_YEAR_END_MONTH", "Dec"),
            ("SV_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(s.base_url, "http://127.0.0.1:9000");
        assert_eq!(s.timeout, Duration::from_secs(3));
        assert_eq!(s.period.fiscal_year, 2024);
        assert_eq!(s.period.column_header(2024), "Dec 2024");
        assert_eq!(s.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn bad_values_are_config_errors() {
        let err = Settings::from_lookup(lookup(&[("SV_TIMEOUT_SECS", "0")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = Settings::from_lookup(lookup(&[("SV_FISCAL_YEAR", "next")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn fiscal_year_forms() {
        assert_eq!(parse_fiscal_year("2023"), Some(2023));
        assert_eq!(parse_fiscal_year("FY23"), Some(2023));
        assert_eq!(parse_fiscal_year("fy2025"), Some(2025));
        assert_eq!(parse_fiscal_year("23x"), None);
        assert_eq!(parse_fiscal_year("123"), None);
    }
}
