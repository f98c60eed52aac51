//! Rolling standard deviation indicator.
//!
//! Sample standard deviation (divides by n-1) over a trailing window.
//! STDDEV(n)[i] = sqrt(sum((x[i-j] - SMA(n)[i])^2 for j in 0..n) / (n-1))
//! Warmup: first (n-1) points are undefined; a window below 2 is never defined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price_series::PriceSeries;

pub fn calculate_stddev(series: &PriceSeries, window: usize) -> IndicatorSeries {
    let values = rolling_std(&series.prices(), window)
        .into_iter()
        .zip(series.points())
        .map(|(v, p)| IndicatorPoint {
            date: p.date,
            value: v.map(IndicatorValue::Simple),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(window),
        values,
    }
}

/// Trailing sample standard deviation; `None` until the window is full.
pub(crate) fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if window < 2 || i + 1 < window {
                return None;
            }
            sample_std(&values[i + 1 - window..=i])
        })
        .collect()
}

/// Sample standard deviation of a slice; `None` below two observations.
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let pairs: Vec<_> = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| (start + chrono::Duration::days(i as i64), p))
            .collect();
        PriceSeries::from_pairs("TEST", &pairs).unwrap()
    }

    #[test]
    fn stddev_warmup() {
        let series = calculate_stddev(&make_series(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3);

        assert!(!series.values[0].is_defined());
        assert!(!series.values[1].is_defined());
        assert!(series.values[2].is_defined());
        assert!(series.values[3].is_defined());
        assert!(series.values[4].is_defined());
    }

    #[test]
    fn stddev_constant_values() {
        let series = calculate_stddev(&make_series(&[100.0; 5]), 3);
        assert!((series.values[2].simple().unwrap() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stddev_basic_calculation() {
        let series = calculate_stddev(&make_series(&[10.0, 20.0, 30.0]), 3);
        // mean 20, squared deviations 100 + 0 + 100, n-1 = 2
        let expected = (200.0_f64 / 2.0).sqrt();
        assert!((series.values[2].simple().unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn stddev_known_values() {
        let series = calculate_stddev(&make_series(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 8);
        // population deviation is 2; sample deviation is sqrt(32 / 7)
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((series.values[7].simple().unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn stddev_window_1_never_defined() {
        let series = calculate_stddev(&make_series(&[1.0, 2.0, 3.0]), 1);
        assert_eq!(series.defined_count(), 0);
    }

    #[test]
    fn sample_std_needs_two_points() {
        assert_eq!(sample_std(&[]), None);
        assert_eq!(sample_std(&[1.0]), None);
        assert!(sample_std(&[1.0, 3.0]).is_some());
    }

    #[test]
    fn stddev_indicator_type() {
        let series = calculate_stddev(&make_series(&[10.0]), 5);
        assert_eq!(series.indicator_type, IndicatorType::Stddev(5));
    }
}
