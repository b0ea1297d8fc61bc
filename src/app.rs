//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and loads settings
//! - initializes logging
//! - fetches and extracts the company snapshot
//! - values it and prints reports/charts
//! - writes optional exports

use std::path::Path;

use clap::Parser;
use tracing::debug;

use crate::cli::{Command, ReplayArgs, ShowArgs, TuiArgs, ValuationArgs, ValueArgs};
use crate::config::{Settings, parse_fiscal_year};
use crate::domain::ValuationInputs;
use crate::error::{AppError, ErrorKind};
use crate::logging::LogTarget;

pub mod pipeline;

/// Entry point for the `sv` binary.
pub fn run() -> Result<(), AppError> {
    // `sv`, `sv -s TCS` and `sv TCS` have no subcommand; clap needs one, so
    // argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let mut settings = Settings::from_env()?;
    let target = match cli.command {
        Command::Tui(_) => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    crate::logging::init(settings.log_filter.as_deref(), target)?;
    debug!(base_url = %settings.base_url, period = %settings.period.fiscal_label(), "settings loaded");

    match cli.command {
        Command::Show(args) => {
            apply_fiscal_year(&mut settings, args.fiscal_year.as_deref())?;
            handle_show(&settings, args)
        }
        Command::Value(args) => handle_value(args),
        Command::Replay(args) => handle_replay(args),
        Command::Tui(args) => {
            apply_fiscal_year(&mut settings, args.fiscal_year.as_deref())?;
            handle_tui(&settings, args)
        }
    }
}

fn apply_fiscal_year(settings: &mut Settings, raw: Option<&str>) -> Result<(), AppError> {
    if let Some(raw) = raw {
        settings.period.fiscal_year = parse_fiscal_year(raw).ok_or_else(|| {
            AppError::new(ErrorKind::Usage, format!("Invalid --fiscal-year '{raw}': expected e.g. 2023 or FY23"))
        })?;
    }
    Ok(())
}

/// Out-of-range flags are rejected before any work is done.
fn checked_inputs(args: &ValuationArgs) -> Result<ValuationInputs, AppError> {
    let inputs = args.to_inputs();
    inputs
        .validate()
        .map_err(|e| AppError::new(ErrorKind::Usage, e.to_string()))?;
    Ok(inputs)
}

fn handle_show(settings: &Settings, args: ShowArgs) -> Result<(), AppError> {
    let inputs = checked_inputs(&args.valuation)?;
    let fetched = pipeline::fetch_snapshot(settings, &args.symbol)?;

    let outcome = pipeline::revalue(&fetched.record, &inputs);
    let chart_width = (!args.no_chart).then_some(args.width);
    println!("{}", pipeline::render_report(&fetched.record, &inputs, &outcome, chart_width));

    if let Some(path) = &args.export_json {
        let snapshot = crate::io::SnapshotFile::new(
            fetched.page.fetched_at,
            fetched.page.url.clone(),
            fetched.record,
            inputs,
            &outcome,
        );
        crate::io::write_snapshot_json(path, &snapshot)?;
        eprintln!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_value(args: ValueArgs) -> Result<(), AppError> {
    let inputs = checked_inputs(&args.valuation)?;
    let outputs = crate::valuation::value(args.pe, &inputs)?;
    println!("{}", crate::report::format_valuation(&inputs, &Ok(outputs)));
    Ok(())
}

fn handle_replay(args: ReplayArgs) -> Result<(), AppError> {
    let snapshot = crate::io::read_snapshot_json(Path::new(&args.snapshot))?;
    let inputs = if args.revalue {
        checked_inputs(&args.valuation)?
    } else {
        snapshot.inputs
    };

    let outcome = pipeline::revalue(&snapshot.record, &inputs);
    println!(
        "Snapshot of {} fetched {}",
        snapshot.source_url,
        snapshot.fetched_at.format("%Y-%m-%d %H:%M")
    );
    println!("{}", pipeline::render_report(&snapshot.record, &inputs, &outcome, Some(args.width)));
    Ok(())
}

fn handle_tui(settings: &Settings, args: TuiArgs) -> Result<(), AppError> {
    crate::tui::run(settings, args.symbol.as_deref())
}

/// Rewrite argv so `sv` defaults to `sv tui` and `sv SYMBOL` to `sv show SYMBOL`.
///
/// Rules:
/// - `sv`                      -> `sv tui`
/// - `sv -s TCS ...`           -> `sv tui -s TCS ...`
/// - `sv TCS ...`              -> `sv show TCS ...`
/// - `sv --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "show" | "value" | "replay" | "tui");
    if is_subcommand {
        return argv;
    }

    // A leading flag is a TUI flag.
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Anything else is a symbol.
    argv.insert(1, "show".to_string());
    argv
}
