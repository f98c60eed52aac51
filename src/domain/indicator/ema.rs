//! Exponential Moving Average indicator.
//!
//! α = 2/(span+1), seeded with the first observation (no SMA warmup), then
//! EMA[i] = x[i]*α + EMA[i-1]*(1-α). Defined from the first point; early
//! values lean heavily on the seed.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price_series::PriceSeries;

pub fn calculate_ema(series: &PriceSeries, span: usize) -> IndicatorSeries {
    if span == 0 {
        return IndicatorSeries::undefined(IndicatorType::Ema(span), &series.dates());
    }

    let ema = ema_values(&series.prices(), span);
    let values = series
        .points()
        .iter()
        .zip(ema)
        .map(|(p, v)| IndicatorPoint {
            date: p.date,
            value: Some(IndicatorValue::Simple(v)),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(span),
        values,
    }
}

/// Raw EMA over plain values. `span` must be non-zero.
pub fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = 0.0;

    for (i, &x) in values.iter().enumerate() {
        ema = if i == 0 {
            x
        } else {
            x * alpha + ema * (1.0 - alpha)
        };
        out.push(ema);
    }

    out
}
