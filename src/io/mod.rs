//! Input/output helpers.
//!
//! - snapshot JSON read/write (`export`)

pub mod export;

pub use export::*;
