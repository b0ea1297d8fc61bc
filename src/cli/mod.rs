//! Command-line parsing for the screener valuation tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from extraction and valuation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::ValuationInputs;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sv", version, about = "Screener snapshot + intrinsic P/E calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one company, print its snapshot, growth charts and valuation.
    Show(ShowArgs),
    /// Value an observed P/E without fetching anything.
    Value(ValueArgs),
    /// Re-render a snapshot JSON written by `sv show --export-json`.
    Replay(ReplayArgs),
    /// Launch the interactive TUI.
    ///
    /// The same extraction and valuation code as `sv show`, rendered with
    /// Ratatui; valuation parameters are adjusted live.
    Tui(TuiArgs),
}

/// The six valuation parameters; each defaults to the slider default.
#[derive(Debug, Args, Clone)]
pub struct ValuationArgs {
    /// Cost of capital, % [8, 16].
    #[arg(long, default_value_t = 12.0)]
    pub coc: f64,

    /// Assumed return on capital employed, % [10, 100].
    #[arg(long, default_value_t = 20.0)]
    pub roce: f64,

    /// Growth during the high-growth period, % [8, 20].
    #[arg(long, default_value_t = 12.0)]
    pub growth: f64,

    /// Length of the high-growth period, years [10, 25].
    #[arg(long, default_value_t = 15)]
    pub high_years: u32,

    /// Length of the fade period, years [5, 20].
    #[arg(long, default_value_t = 15)]
    pub fade_years: u32,

    /// Terminal growth rate, % [0, 7.5].
    #[arg(long, default_value_t = 5.0)]
    pub terminal: f64,
}

impl ValuationArgs {
    /// Unchecked; bounds are enforced by `valuation::value`.
    pub fn to_inputs(&self) -> ValuationInputs {
        ValuationInputs {
            cost_of_capital: self.coc,
            roce: self.roce,
            high_growth_rate: self.growth,
            high_growth_years: self.high_years,
            fade_years: self.fade_years,
            terminal_growth_rate: self.terminal,
        }
    }
}

impl Default for ValuationArgs {
    fn default() -> Self {
        let d = ValuationInputs::default();
        Self {
            coc: d.cost_of_capital,
            roce: d.roce,
            growth: d.high_growth_rate,
            high_years: d.high_growth_years,
            fade_years: d.fade_years,
            terminal: d.terminal_growth_rate,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Company symbol as used by screener.in (e.g. RELIANCE, TCS).
    pub symbol: String,

    #[command(flatten)]
    pub valuation: ValuationArgs,

    /// Reference fiscal year (`2023` or `FY23`); overrides SV_FISCAL_YEAR.
    #[arg(long)]
    pub fiscal_year: Option<String>,

    /// Skip the growth bar charts.
    #[arg(long)]
    pub no_chart: bool,

    /// Bar chart width (columns).
    #[arg(long, default_value_t = 40)]
    pub width: usize,

    /// Export record + valuation to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ValueArgs {
    /// Observed (trailing) P/E to compare against the intrinsic multiple.
    #[arg(long)]
    pub pe: f64,

    #[command(flatten)]
    pub valuation: ValuationArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ReplayArgs {
    /// Snapshot JSON produced by `sv show --export-json`.
    #[arg(value_name = "JSON")]
    pub snapshot: PathBuf,

    /// Recompute with new parameters instead of the stored ones.
    #[arg(long)]
    pub revalue: bool,

    #[command(flatten)]
    pub valuation: ValuationArgs,

    /// Bar chart width (columns).
    #[arg(long, default_value_t = 40)]
    pub width: usize,
}

#[derive(Debug, Args, Clone, Default)]
pub struct TuiArgs {
    /// Symbol to load on start.
    #[arg(short = 's', long)]
    pub symbol: Option<String>,

    /// Reference fiscal year (`2023` or `FY23`); overrides SV_FISCAL_YEAR.
    #[arg(long)]
    pub fiscal_year: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_parses_valuation_flags() {
        let cli = Cli::parse_from(["sv", "show", "TCS", "--coc", "10", "--fade-years", "8", "--no-chart"]);
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.symbol, "TCS");
        assert!(args.no_chart);
        let inputs = args.valuation.to_inputs();
        assert_eq!(inputs.cost_of_capital, 10.0);
        assert_eq!(inputs.fade_years, 8);
        assert_eq!(inputs.roce, 20.0);
    }

    #[test]
    fn flag_defaults_match_slider_defaults() {
        let cli = Cli::parse_from(["sv", "value", "--pe", "30"]);
        let Command::Value(args) = cli.command else {
            panic!("expected value");
        };
        assert_eq!(args.valuation.to_inputs(), ValuationInputs::default());
        assert_eq!(ValuationArgs::default().to_inputs(), ValuationInputs::default());
    }
}
