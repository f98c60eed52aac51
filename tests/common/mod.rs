#![allow(dead_code)]

use chrono::NaiveDate;
use riskaware::domain::error::RiskawareError;
use riskaware::domain::price_series::PriceSeries;
use riskaware::ports::data_port::PriceDataPort;
use std::collections::HashMap;

pub struct MockPriceDataPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockPriceDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.data.insert(series.name().to_string(), series);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockPriceDataPort {
    fn fetch_prices(&self, code: &str) -> Result<PriceSeries, RiskawareError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(RiskawareError::DataSource {
                reason: reason.clone(),
            });
        }
        self.data
            .get(code)
            .cloned()
            .ok_or_else(|| RiskawareError::DataSource {
                reason: format!("no file for {}", code),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, RiskawareError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Daily series starting at `start`, one point per price.
pub fn make_series(code: &str, start: &str, prices: &[f64]) -> PriceSeries {
    let start = date(start);
    let pairs: Vec<_> = prices
        .iter()
        .enumerate()
        .map(|(i, &p)| (start + chrono::Duration::days(i as i64), p))
        .collect();
    PriceSeries::from_pairs(code, &pairs).unwrap()
}

/// A gently trending price path with a repeating wiggle, long enough for
/// default indicator windows.
pub fn wavy_prices(n: usize, base: f64, drift: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let wiggle = [0.0, 1.5, -0.8, 2.1, -1.7, 0.6, -0.3][i % 7];
            base + drift * i as f64 + wiggle
        })
        .collect()
}

pub const SCENARIO_PRICES: [f64; 20] = [
    100.0, 102.0, 101.0, 105.0, 107.0, 106.0, 110.0, 108.0, 111.0, 115.0, 114.0, 117.0, 116.0,
    120.0, 118.0, 121.0, 125.0, 123.0, 126.0, 130.0,
];

pub const SCENARIO_RETURNS: [f64; 5] = [0.01, -0.02, 0.015, -0.005, 0.02];
