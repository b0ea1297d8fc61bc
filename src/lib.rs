//! `screener-value` library crate.
//!
//! The binary (`sv`) is a thin wrapper around this library so that:
//!
//! - extraction and valuation are testable without spawning processes
//! - the CLI and the TUI share one pipeline

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
pub mod valuation;
