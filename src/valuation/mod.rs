//! Valuation calculator.
//!
//! Everything here is a pure function of its inputs: re-running with changed
//! parameters never touches the network and always yields the same result for
//! the same inputs.

use thiserror::Error;

pub mod intrinsic;
pub mod params;

pub use intrinsic::*;
pub use params::*;

/// Inputs that make the valuation formula undefined or out of bounds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    #[error("intrinsic P/E is undefined: RoCE ({roce}%) equals the high-growth rate ({high_growth_rate}%)")]
    DegenerateSpread { roce: f64, high_growth_rate: f64 },

    #[error("fade period must be at least one year")]
    ZeroFadePeriod,

    #[error("overvaluation is undefined for an intrinsic P/E of {0}")]
    DegenerateIntrinsicPe(f64),

    #[error("{label} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        label: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
