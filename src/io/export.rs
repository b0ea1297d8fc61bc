//! Read/write snapshot JSON files.
//!
//! A snapshot is the "portable" form of one `sv show` run:
//! - the extracted `StockRecord`
//! - the valuation inputs used and the outputs (or the valuation error)
//! - when the page was fetched
//!
//! `sv replay` reads it back to re-render or re-value without a fetch.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::{StockRecord, ValuationInputs, ValuationOutputs};
use crate::error::{AppError, ErrorKind};
use crate::valuation::ValuationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub tool: String,
    pub fetched_at: DateTime<Local>,
    pub source_url: String,
    pub record: StockRecord,
    pub inputs: ValuationInputs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation: Option<ValuationOutputs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation_error: Option<String>,
}

impl SnapshotFile {
    pub fn new(
        fetched_at: DateTime<Local>,
        source_url: impl Into<String>,
        record: StockRecord,
        inputs: ValuationInputs,
        outcome: &Result<ValuationOutputs, ValuationError>,
    ) -> Self {
        let (valuation, valuation_error) = match outcome {
            Ok(v) => (Some(v.clone()), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            tool: "sv".to_string(),
            fetched_at,
            source_url: source_url.into(),
            record,
            inputs,
            valuation,
            valuation_error,
        }
    }
}

/// Write a snapshot JSON file.
pub fn write_snapshot_json(path: &Path, snapshot: &SnapshotFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(ErrorKind::Io, format!("Failed to create snapshot JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, snapshot)
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write snapshot JSON: {e}")))?;

    Ok(())
}

/// Read a snapshot JSON file.
pub fn read_snapshot_json(path: &Path) -> Result<SnapshotFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(ErrorKind::Io, format!("Failed to open snapshot JSON '{}': {e}", path.display()))
    })?;
    let snapshot: SnapshotFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Invalid snapshot JSON: {e}")))?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GrowthSeries, RoceSample};

    fn record() -> StockRecord {
        StockRecord {
            symbol: "TCS".to_string(),
            name: "Tata Consultancy Services Ltd".to_string(),
            price: 3890.5,
            market_cap: 1_407_000.0,
            net_profit: 42147.0,
            trailing_pe: 33.38,
            median_roce: 52.0,
            roce_samples: vec![RoceSample { fiscal_year: 2022, percent: 52.0 }],
            sales_growth: GrowthSeries::new([11, 11, 13, 7]),
            profit_growth: GrowthSeries::new([10, 9, 10, 8]),
            fiscal_label: "FY23".to_string(),
        }
    }

    #[test]
    fn snapshot_json_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tcs.json");

        let inputs = ValuationInputs::default();
        let outcome = crate::valuation::value(33.38, &inputs);
        let snapshot = SnapshotFile::new(
            Local::now(),
            "https://www.screener.in/company/TCS/",
            record(),
            inputs,
            &outcome,
        );
        write_snapshot_json(&path, &snapshot).unwrap();

        let back = read_snapshot_json(&path).unwrap();
        assert_eq!(back.record, snapshot.record);
        let (got, want) = (back.valuation.unwrap(), snapshot.valuation.unwrap());
        assert_eq!(got.intrinsic_pe, 1.5);
        assert_eq!(got.fade_growth_rates.len(), want.fade_growth_rates.len());
        assert!((got.degree_of_overvaluation - want.degree_of_overvaluation).abs() < 1e-9);
        assert!(back.valuation_error.is_none());

        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["record"]["sales_growth"], serde_json::json!([11, 11, 13, 7]));
        assert!(raw.get("valuation_error").is_none());
    }

    #[test]
    fn valuation_error_is_kept_as_text() {
        let snapshot = SnapshotFile::new(
            Local::now(),
            "u",
            record(),
            ValuationInputs::default(),
            &Err(ValuationError::ZeroFadePeriod),
        );
        assert!(snapshot.valuation.is_none());
        assert_eq!(
            snapshot.valuation_error.as_deref(),
            Some("fade period must be at least one year")
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_snapshot_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
