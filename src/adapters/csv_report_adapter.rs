//! CSV table writer.
//!
//! Undefined indicator cells are written as empty fields.

use crate::domain::dataset::FeatureTable;
use crate::domain::error::RiskawareError;
use crate::domain::indicator::IndicatorValue;
use crate::ports::report_port::{IndicatorTable, ReportPort};
use std::io::Write;
use std::path::Path;

pub const INDICATOR_COLUMNS: [&str; 10] = [
    "date",
    "price",
    "rsi",
    "macd",
    "macd_signal",
    "macd_histogram",
    "bb_middle",
    "bb_upper",
    "bb_lower",
    "bb_width",
];

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Indicator table as CSV into any writer.
    pub fn write_indicators_to<W: Write>(
        &self,
        table: &IndicatorTable<'_>,
        writer: W,
    ) -> Result<(), RiskawareError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(INDICATOR_COLUMNS)?;

        for (i, point) in table.prices.points().iter().enumerate() {
            let mut record = vec![point.date.to_string(), point.price.to_string()];

            let rsi = table.rsi.values.get(i).and_then(|p| p.simple());
            record.push(cell(rsi));

            match table.macd.values.get(i).and_then(|p| p.value) {
                Some(IndicatorValue::Macd {
                    line,
                    signal,
                    histogram,
                }) => record.extend([line, signal, histogram].map(|v| v.to_string())),
                _ => record.extend(std::iter::repeat_n(String::new(), 3)),
            }

            match table.bollinger.values.get(i).and_then(|p| p.value) {
                Some(value @ IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                }) => {
                    record.extend([middle, upper, lower].map(|v| v.to_string()));
                    record.push(cell(value.band_width()));
                }
                _ => record.extend(std::iter::repeat_n(String::new(), 4)),
            }

            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Feature table as CSV into any writer.
    pub fn write_features_to<W: Write>(
        &self,
        table: &FeatureTable,
        writer: W,
    ) -> Result<(), RiskawareError> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec!["date".to_string()];
        header.extend(table.columns.iter().cloned());
        wtr.write_record(&header)?;

        for row in &table.rows {
            let mut record = Vec::with_capacity(row.values.len() + 2);
            record.push(row.date.to_string());
            record.extend(row.values.iter().map(|v| v.to_string()));
            record.push(row.target.to_string());
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn create(output_path: &Path) -> Result<std::fs::File, RiskawareError> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(std::fs::File::create(output_path)?)
}

impl ReportPort for CsvReportAdapter {
    fn write_indicators(
        &self,
        table: &IndicatorTable<'_>,
        output_path: &Path,
    ) -> Result<(), RiskawareError> {
        self.write_indicators_to(table, create(output_path)?)
    }

    fn write_features(
        &self,
        table: &FeatureTable,
        output_path: &Path,
    ) -> Result<(), RiskawareError> {
        self.write_features_to(table, create(output_path)?)
    }
}
