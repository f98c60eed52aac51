//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (num_std × StdDev)
//! - Lower: Middle - (num_std × StdDev)
//!
//! Where StdDev is the sample standard deviation (divides by n-1).
//!
//! Default parameters: window=20, num_std=2.0
//! Warmup: first (window-1) points are undefined.

use crate::domain::indicator::sma::rolling_mean;
use crate::domain::indicator::stddev::rolling_std;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price_series::PriceSeries;

pub const DEFAULT_WINDOW: usize = 20;
pub const DEFAULT_NUM_STD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerConfig {
    pub window: usize,
    /// Band distance in standard deviations; the sign is ignored.
    pub num_std: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            num_std: DEFAULT_NUM_STD,
        }
    }
}

impl BollingerConfig {
    pub fn indicator_type(&self) -> IndicatorType {
        IndicatorType::Bollinger {
            window: self.window,
            num_std_x100: (self.num_std.abs() * 100.0).round() as u32,
        }
    }
}

pub fn calculate_bollinger(series: &PriceSeries, config: &BollingerConfig) -> IndicatorSeries {
    let prices = series.prices();
    let means = rolling_mean(&prices, config.window);
    let stds = rolling_std(&prices, config.window);
    let mult = config.num_std.abs();

    let values = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let value = match (means[i], stds[i]) {
                (Some(middle), Some(std)) => Some(IndicatorValue::Bollinger {
                    upper: middle + mult * std,
                    middle,
                    lower: middle - mult * std,
                }),
                _ => None,
            };
            IndicatorPoint {
                date: p.date,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: config.indicator_type(),
        values,
    }
}

/// Upper minus lower band per point, `None` where undefined.
pub fn band_widths(series: &IndicatorSeries) -> Vec<Option<f64>> {
    series
        .values
        .iter()
        .map(|p| p.value.as_ref().and_then(IndicatorValue::band_width))
        .collect()
}
