//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(x[i-n+1..=i]). Warmup: first (n-1) points are undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price_series::PriceSeries;

pub fn calculate_sma(series: &PriceSeries, window: usize) -> IndicatorSeries {
    if window == 0 {
        return IndicatorSeries::undefined(IndicatorType::Sma(window), &series.dates());
    }

    let values = rolling_mean(&series.prices(), window)
        .into_iter()
        .zip(series.points())
        .map(|(v, p)| IndicatorPoint {
            date: p.date,
            value: v.map(IndicatorValue::Simple),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(window),
        values,
    }
}

/// Trailing mean over `window` values; `None` until the window is full.
pub(crate) fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let warmup = window.saturating_sub(1);
    (0..values.len())
        .map(|i| {
            if window == 0 || i < warmup {
                return None;
            }
            let start = i + 1 - window;
            Some(values[start..=i].iter().sum::<f64>() / window as f64)
        })
        .collect()
}
