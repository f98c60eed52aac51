//! CSV file price data adapter.
//!
//! One file per instrument at `<base_path>/<CODE>.csv` with a header row.
//! The first column holds ISO dates; prices come from the column named
//! `close`, `adj close` or the instrument code, else the second column.

use crate::domain::error::RiskawareError;
use crate::domain::price_series::{PricePoint, PriceSeries};
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

const PRICE_COLUMNS: [&str; 2] = ["close", "adj close"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// `<base>/<code>.csv`, falling back to a file whose stem matches the
    /// code ignoring ASCII case.
    fn csv_path(&self, code: &str) -> PathBuf {
        let exact = self.base_path.join(format!("{}.csv", code));
        if exact.is_file() {
            return exact;
        }

        let Ok(entries) = fs::read_dir(&self.base_path) else {
            return exact;
        };
        entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .find(|path| {
                Self::is_csv(path)
                    && path
                        .file_stem()
                        .is_some_and(|stem| stem.to_string_lossy().eq_ignore_ascii_case(code))
            })
            .unwrap_or(exact)
    }

    fn is_csv(path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    }

    fn price_column(headers: &csv::StringRecord, code: &str) -> usize {
        headers
            .iter()
            .position(|h| {
                let h = h.trim();
                PRICE_COLUMNS.iter().any(|c| h.eq_ignore_ascii_case(c))
                    || h.eq_ignore_ascii_case(code)
            })
            .unwrap_or(1)
    }
}

impl PriceDataPort for CsvAdapter {
    fn fetch_prices(&self, code: &str) -> Result<PriceSeries, RiskawareError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| RiskawareError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let column = Self::price_column(rdr.headers()?, code);
        let malformed = |row: usize, reason: String| RiskawareError::MalformedSeries {
            name: code.to_string(),
            row,
            reason,
        };

        let mut points = Vec::new();
        // CSV record index of each kept point.
        let mut record_rows = Vec::new();
        let mut skipped = 0usize;

        for (row, result) in rdr.records().enumerate() {
            let record = result?;

            let date_str = record
                .get(0)
                .ok_or_else(|| malformed(row, "missing date column".into()))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| malformed(row, format!("invalid date {:?}: {}", date_str, e)))?;

            let price_str = record.get(column).map(str::trim).unwrap_or_default();
            if price_str.is_empty() {
                skipped += 1;
                continue;
            }
            let price: f64 = price_str
                .parse()
                .map_err(|e| malformed(row, format!("invalid price {:?}: {}", price_str, e)))?;

            points.push(PricePoint { date, price });
            record_rows.push(row);
        }

        if skipped > 0 {
            tracing::warn!(code, skipped, "rows without a price skipped");
        }
        tracing::debug!(code, rows = points.len(), path = %path.display(), "prices loaded");

        PriceSeries::new(code, points).map_err(|e| match e {
            RiskawareError::MalformedSeries { name, row, reason } => {
                RiskawareError::MalformedSeries {
                    name,
                    row: record_rows.get(row).copied().unwrap_or(row),
                    reason,
                }
            }
            other => other,
        })
    }

    fn list_symbols(&self) -> Result<Vec<String>, RiskawareError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| RiskawareError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| RiskawareError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            if let (true, Some(stem)) = (Self::is_csv(&path), path.file_stem()) {
                symbols.push(stem.to_string_lossy().into_owned());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
