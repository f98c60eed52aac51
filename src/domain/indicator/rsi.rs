//! RSI (Relative Strength Index) indicator.
//!
//! Averages gains and losses with a trailing simple mean over `period` steps:
//! - delta[i] = x[i] - x[i-1]; the first point has no predecessor and counts as 0
//! - avg_gain, avg_loss = SMA(period) of max(delta, 0) and max(-delta, 0)
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100.
//! If both are 0 (flat window): undefined.
//!
//! Warmup: first (period-1) points are undefined.

use crate::domain::indicator::sma::rolling_mean;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price_series::PriceSeries;

pub const DEFAULT_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsiConfig {
    pub period: usize,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
        }
    }
}

pub fn calculate_rsi(series: &PriceSeries, config: &RsiConfig) -> IndicatorSeries {
    let period = config.period;
    if period == 0 {
        return IndicatorSeries::undefined(IndicatorType::Rsi(period), &series.dates());
    }

    let prices = series.prices();
    let mut gains = Vec::with_capacity(prices.len());
    let mut losses = Vec::with_capacity(prices.len());

    for i in 0..prices.len() {
        let change = if i == 0 { 0.0 } else { prices[i] - prices[i - 1] };
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let avg_gains = rolling_mean(&gains, period);
    let avg_losses = rolling_mean(&losses, period);

    let values = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let rsi = match (avg_gains[i], avg_losses[i]) {
                (Some(gain), Some(loss)) => rsi_from_averages(gain, loss),
                _ => None,
            };
            IndicatorPoint {
                date: p.date,
                value: rsi.map(IndicatorValue::Simple),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { None } else { Some(100.0) };
    }
    let rsi = 100.0 - (100.0 / (1.0 + avg_gain / avg_loss));
    Some(rsi.clamp(0.0, 100.0))
}
