//! `tracing` subscriber setup.
//!
//! The CLI logs to stderr. The TUI owns the terminal, so it logs to a file and
//! only when a filter was asked for (`SV_LOG` / `RUST_LOG`).

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::error::{AppError, ErrorKind};

/// HTTP plumbing that would drown out the application's own events.
pub const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls", "html5ever", "selectors"];

/// Default level when no filter is configured in CLI mode.
const DEFAULT_LEVEL: &str = "warn";

pub const TUI_LOG_FILE: &str = "sv.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to `TUI_LOG_FILE`; disabled entirely without an explicit filter.
    File,
}

/// Base directives with the noisy modules pinned to `warn`.
pub fn build_directives(base: &str) -> String {
    let mut directives = String::from(base);
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{module}=warn"));
    }
    directives
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(filter: Option<&str>, target: LogTarget) -> Result<(), AppError> {
    match target {
        LogTarget::Stderr => {
            let directives = build_directives(filter.unwrap_or(DEFAULT_LEVEL));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true);
            let _ = tracing_subscriber::registry()
                .with(EnvFilter::new(directives))
                .with(layer)
                .try_init();
        }
        LogTarget::File => {
            let Some(filter) = filter else {
                return Ok(());
            };
            let path = Path::new(TUI_LOG_FILE);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to open log file '{}': {e}", path.display())))?;
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true);
            let _ = tracing_subscriber::registry()
                .with(EnvFilter::new(build_directives(filter)))
                .with(layer)
                .try_init();
        }
    }

    tracing::debug!(?target, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noisy_modules_are_pinned_to_warn() {
        let d = build_directives("debug");
        assert!(d.starts_with("debug,"));
        assert!(d.contains("reqwest=warn"));
        assert!(d.contains("html5ever=warn"));
    }

    #[test]
    fn file_target_without_filter_is_a_no_op() {
        assert!(init(None, LogTarget::File).is_ok());
    }
}
