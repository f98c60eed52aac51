//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(short) - EMA(long)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! All EMAs are seeded from their first input, so every point is defined.
//! Default parameters: short=12, long=26, signal=9

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price_series::PriceSeries;

pub const DEFAULT_SHORT: usize = 12;
pub const DEFAULT_LONG: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdConfig {
    pub short: usize,
    pub long: usize,
    pub signal: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            short: DEFAULT_SHORT,
            long: DEFAULT_LONG,
            signal: DEFAULT_SIGNAL,
        }
    }
}

impl MacdConfig {
    pub fn indicator_type(&self) -> IndicatorType {
        IndicatorType::Macd {
            short: self.short,
            long: self.long,
            signal: self.signal,
        }
    }
}

pub fn calculate_macd(series: &PriceSeries, config: &MacdConfig) -> IndicatorSeries {
    if config.short == 0 || config.long == 0 || config.signal == 0 {
        return IndicatorSeries::undefined(config.indicator_type(), &series.dates());
    }

    let prices = series.prices();
    let ema_short = ema_values(&prices, config.short);
    let ema_long = ema_values(&prices, config.long);

    let macd_line: Vec<f64> = ema_short
        .iter()
        .zip(&ema_long)
        .map(|(s, l)| s - l)
        .collect();
    let signal_line = ema_values(&macd_line, config.signal);

    let values = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| IndicatorPoint {
            date: p.date,
            value: Some(IndicatorValue::Macd {
                line: macd_line[i],
                signal: signal_line[i],
                histogram: macd_line[i] - signal_line[i],
            }),
        })
        .collect();

    IndicatorSeries {
        indicator_type: config.indicator_type(),
        values,
    }
}

/// MACD line values alone, `None` where undefined.
pub fn macd_line(series: &IndicatorSeries) -> Vec<Option<f64>> {
    series
        .values
        .iter()
        .map(|p| match p.value {
            Some(IndicatorValue::Macd { line, .. }) => Some(line),
            _ => None,
        })
        .collect()
}
