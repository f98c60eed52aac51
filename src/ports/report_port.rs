//! Table output port trait.

use crate::domain::dataset::FeatureTable;
use crate::domain::error::RiskawareError;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::price_series::PriceSeries;
use std::path::Path;

/// Indicator columns written next to a price series.
pub struct IndicatorTable<'a> {
    pub prices: &'a PriceSeries,
    pub rsi: &'a IndicatorSeries,
    pub macd: &'a IndicatorSeries,
    pub bollinger: &'a IndicatorSeries,
}

/// Port for writing computed tables.
pub trait ReportPort {
    fn write_indicators(
        &self,
        table: &IndicatorTable<'_>,
        output_path: &Path,
    ) -> Result<(), RiskawareError>;

    fn write_features(&self, table: &FeatureTable, output_path: &Path)
        -> Result<(), RiskawareError>;
}
