//! Shared helpers for evaluating indicators by type.

use crate::domain::indicator::{
    calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi, calculate_sma,
    calculate_stddev, BollingerConfig, IndicatorSeries, IndicatorType, MacdConfig, RsiConfig,
};
use crate::domain::price_series::PriceSeries;
use std::collections::HashMap;

/// Evaluate one indicator type over a price series.
pub fn compute_indicator(series: &PriceSeries, indicator_type: &IndicatorType) -> IndicatorSeries {
    match *indicator_type {
        IndicatorType::Sma(window) => calculate_sma(series, window),
        IndicatorType::Ema(span) => calculate_ema(series, span),
        IndicatorType::Rsi(period) => calculate_rsi(series, &RsiConfig { period }),
        IndicatorType::Stddev(window) => calculate_stddev(series, window),
        IndicatorType::Macd {
            short,
            long,
            signal,
        } => calculate_macd(
            series,
            &MacdConfig {
                short,
                long,
                signal,
            },
        ),
        IndicatorType::Bollinger {
            window,
            num_std_x100,
        } => calculate_bollinger(
            series,
            &BollingerConfig {
                window,
                num_std: num_std_x100 as f64 / 100.0,
            },
        ),
    }
}

/// Evaluate each distinct indicator type once.
pub fn compute_indicators(
    series: &PriceSeries,
    indicator_types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::with_capacity(indicator_types.len());
    for indicator_type in indicator_types {
        if out.contains_key(indicator_type) {
            continue;
        }
        tracing::debug!(series = series.name(), indicator = %indicator_type, "computing indicator");
        out.insert(
            indicator_type.clone(),
            compute_indicator(series, indicator_type),
        );
    }
    out
}
