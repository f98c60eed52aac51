//! Price data access port trait.

use crate::domain::error::RiskawareError;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub trait PriceDataPort {
    /// Full validated price history for one instrument.
    fn fetch_prices(&self, code: &str) -> Result<PriceSeries, RiskawareError>;

    fn list_symbols(&self) -> Result<Vec<String>, RiskawareError>;

    /// First date, last date and observation count, if any data exists.
    fn get_data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, RiskawareError> {
        let series = self.fetch_prices(code)?;
        Ok(match (series.first_date(), series.last_date()) {
            (Some(first), Some(last)) => Some((first, last, series.len())),
            _ => None,
        })
    }
}
