//! Application-level error.
//!
//! Component errors (`ScrapeError`, `ValuationError`, config problems) are
//! converted into an `AppError` at the boundary. The binary prints the message
//! and exits with the code derived from the error kind.

use crate::data::ScrapeError;
use crate::valuation::ValuationError;

/// Broad error category; decides the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Config,
    Fetch,
    Parse,
    Domain,
    Io,
    Terminal,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage | ErrorKind::Config => 2,
            ErrorKind::Fetch => 3,
            ErrorKind::Parse => 4,
            ErrorKind::Domain => 5,
            ErrorKind::Io | ErrorKind::Terminal => 6,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ScrapeError> for AppError {
    fn from(err: ScrapeError) -> Self {
        let kind = if err.is_fetch() {
            ErrorKind::Fetch
        } else {
            ErrorKind::Parse
        };
        AppError::new(kind, err.to_string())
    }
}

impl From<ValuationError> for AppError {
    fn from(err: ValuationError) -> Self {
        AppError::new(ErrorKind::Domain, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrape_errors_map_to_fetch_or_parse() {
        let fetch: AppError = ScrapeError::Status {
            symbol: "XYZ".to_string(),
            status: 404,
        }
        .into();
        assert_eq!(fetch.kind(), ErrorKind::Fetch);
        assert_eq!(fetch.exit_code(), 3);

        let conversion: AppError = ScrapeError::Conversion {
            field: "market cap",
            text: "n/a".to_string(),
        }
        .into();
        assert_eq!(conversion.kind(), ErrorKind::Parse);
        assert_eq!(conversion.exit_code(), 4);
    }

    #[test]
    fn valuation_errors_are_domain_errors() {
        let err: AppError = ValuationError::ZeroFadePeriod.into();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(err.exit_code(), 5);
    }
}
