//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series; `value` is
//!   `None` where the indicator is undefined (warmup or degenerate window)
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values aligned to its source

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use bollinger::{calculate_bollinger, BollingerConfig};
pub use ema::{calculate_ema, ema_values};
pub use macd::{calculate_macd, MacdConfig};
pub use rsi::{calculate_rsi, RsiConfig};
pub use sma::calculate_sma;
pub use stddev::calculate_stddev;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<IndicatorValue>,
}

impl IndicatorPoint {
    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }

    /// The value of a single-line indicator, if defined.
    pub fn simple(&self) -> Option<f64> {
        match self.value {
            Some(IndicatorValue::Simple(v)) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

impl IndicatorValue {
    /// Distance between the Bollinger bands; `None` for other shapes.
    pub fn band_width(&self) -> Option<f64> {
        match *self {
            IndicatorValue::Bollinger { upper, lower, .. } => Some(upper - lower),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Stddev(usize),
    Macd {
        short: usize,
        long: usize,
        signal: usize,
    },
    Bollinger {
        window: usize,
        num_std_x100: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// A series with every point undefined, aligned to `dates`.
    pub(crate) fn undefined(indicator_type: IndicatorType, dates: &[NaiveDate]) -> Self {
        Self {
            indicator_type,
            values: dates
                .iter()
                .map(|&date| IndicatorPoint { date, value: None })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|p| p.is_defined()).count()
    }

    /// Single-line values, `None` where undefined.
    pub fn simple_values(&self) -> Vec<Option<f64>> {
        self.values.iter().map(IndicatorPoint::simple).collect()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(window) => write!(f, "SMA({})", window),
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Stddev(window) => write!(f, "STDDEV({})", window),
            IndicatorType::Macd {
                short,
                long,
                signal,
            } => write!(f, "MACD({},{},{})", short, long, signal),
            IndicatorType::Bollinger {
                window,
                num_std_x100,
            } => {
                let mult = *num_std_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", window, mult)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_type_display_rsi() {
        assert_eq!(IndicatorType::Rsi(14).to_string(), "RSI(14)");
    }

    #[test]
    fn indicator_type_display_macd() {
        let macd = IndicatorType::Macd {
            short: 12,
            long: 26,
            signal: 9,
        };
        assert_eq!(macd.to_string(), "MACD(12,26,9)");
    }

    #[test]
    fn indicator_type_display_bollinger() {
        let boll = IndicatorType::Bollinger {
            window: 20,
            num_std_x100: 250,
        };
        assert_eq!(boll.to_string(), "BOLLINGER(20,2.5)");
    }

    #[test]
    fn band_width_only_for_bollinger() {
        let boll = IndicatorValue::Bollinger {
            upper: 12.0,
            middle: 10.0,
            lower: 8.0,
        };
        assert_eq!(boll.band_width(), Some(4.0));
        assert_eq!(IndicatorValue::Simple(1.0).band_width(), None);
    }

    #[test]
    fn undefined_series_aligns_to_dates() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        ];
        let series = IndicatorSeries::undefined(IndicatorType::Rsi(0), &dates);
        assert_eq!(series.len(), 2);
        assert_eq!(series.defined_count(), 0);
        assert_eq!(series.values[1].date, dates[1]);
    }

    #[test]
    fn indicator_type_hash_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        let rsi14 = IndicatorType::Rsi(14);
        let rsi7 = IndicatorType::Rsi(7);
        let macd = IndicatorType::Macd {
            short: 12,
            long: 26,
            signal: 9,
        };

        map.insert(rsi14.clone(), "rsi14_series".to_string());
        map.insert(rsi7.clone(), "rsi7_series".to_string());
        map.insert(macd.clone(), "macd_series".to_string());

        assert_eq!(map.get(&rsi7), Some(&"rsi7_series".to_string()));
        assert_eq!(map.get(&macd), Some(&"macd_series".to_string()));
        assert_eq!(
            map.get(&IndicatorType::Rsi(14)),
            Some(&"rsi14_series".to_string())
        );
    }
}
