//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the extracted company snapshot (`StockRecord`, `GrowthSeries`, `RoceSample`)
//! - the reporting-period configuration (`ReportingPeriod`)
//! - valuation inputs and outputs (`ValuationInputs`, `ValuationOutputs`)

pub mod types;

pub use types::*;
