//! Supervised feature dataset assembly.
//!
//! Each instrument contributes MACD line, RSI, Bollinger band width and a
//! whole-series Sharpe ratio. Instruments are inner-joined on date, the
//! target column is 1 when the target instrument's MACD line on the next
//! joined date is positive, and rows with any undefined cell are dropped.

use crate::domain::error::RiskawareError;
use crate::domain::indicator::bollinger::band_widths;
use crate::domain::indicator::macd::macd_line;
use crate::domain::indicator::{
    calculate_bollinger, calculate_macd, calculate_rsi, BollingerConfig, MacdConfig, RsiConfig,
};
use crate::domain::price_series::PriceSeries;
use crate::domain::risk::{sharpe_ratio, RiskConfig};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

pub const FEATURES_PER_INSTRUMENT: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    pub rsi: RsiConfig,
    pub macd: MacdConfig,
    pub bollinger: BollingerConfig,
    /// Risk settings for the per-instrument Sharpe feature.
    pub risk: RiskConfig,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            rsi: RsiConfig::default(),
            macd: MacdConfig::default(),
            bollinger: BollingerConfig::default(),
            risk: RiskConfig {
                risk_free_rate: 0.0,
                ..RiskConfig::default()
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstrumentFeatures {
    pub code: String,
    pub dates: Vec<NaiveDate>,
    pub macd: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub bollinger_width: Vec<Option<f64>>,
    pub sharpe: Option<f64>,
    pub date_index: HashMap<NaiveDate, usize>,
}

impl InstrumentFeatures {
    pub fn compute(series: &PriceSeries, config: &FeatureConfig) -> Self {
        let code = series.name().to_string();
        let dates = series.dates();

        let macd = macd_line(&calculate_macd(series, &config.macd));
        let rsi = calculate_rsi(series, &config.rsi).simple_values();
        let bollinger_width = band_widths(&calculate_bollinger(series, &config.bollinger));

        let sharpe = match sharpe_ratio(&series.returns().values(), &config.risk) {
            Ok(v) => Some(v),
            Err(reason) => {
                tracing::warn!(code = %code, %reason, "Sharpe feature undefined");
                None
            }
        };

        let date_index = dates.iter().enumerate().map(|(i, &d)| (d, i)).collect();

        Self {
            code,
            dates,
            macd,
            rsi,
            bollinger_width,
            sharpe,
            date_index,
        }
    }

    pub fn column_names(&self) -> [String; FEATURES_PER_INSTRUMENT] {
        [
            format!("{}_MACD", self.code),
            format!("{}_RSI", self.code),
            format!("{}_Bollinger_Width", self.code),
            format!("{}_Sharpe", self.code),
        ]
    }

    /// Feature cells at `date`, `None` when any of them is undefined.
    pub fn row(&self, date: NaiveDate) -> Option<[f64; FEATURES_PER_INSTRUMENT]> {
        let i = *self.date_index.get(&date)?;
        Some([self.macd[i]?, self.rsi[i]?, self.bollinger_width[i]?, self.sharpe?])
    }

    fn macd_at(&self, date: NaiveDate) -> Option<f64> {
        self.date_index.get(&date).and_then(|&i| self.macd[i])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub values: Vec<f64>,
    pub target: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    pub columns: Vec<String>,
    pub rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Dates shared by every instrument, ascending.
pub fn shared_timeline(instruments: &[InstrumentFeatures]) -> Vec<NaiveDate> {
    let Some((first, rest)) = instruments.split_first() else {
        return Vec::new();
    };
    let mut shared: BTreeSet<NaiveDate> = first.dates.iter().copied().collect();
    for inst in rest {
        shared.retain(|d| inst.date_index.contains_key(d));
    }
    shared.into_iter().collect()
}

pub fn build_feature_table(
    instruments: &[InstrumentFeatures],
    target_code: &str,
) -> Result<FeatureTable, RiskawareError> {
    let target = instruments
        .iter()
        .find(|inst| inst.code == target_code)
        .ok_or_else(|| RiskawareError::NoData {
            code: target_code.to_string(),
        })?;

    let mut columns: Vec<String> = instruments
        .iter()
        .flat_map(|inst| inst.column_names())
        .collect();
    columns.push("Target".to_string());

    let timeline = shared_timeline(instruments);
    let mut rows = Vec::with_capacity(timeline.len());

    for (i, &date) in timeline.iter().enumerate() {
        let Some(next_macd) = timeline.get(i + 1).and_then(|&next| target.macd_at(next)) else {
            continue;
        };

        let mut values = Vec::with_capacity(instruments.len() * FEATURES_PER_INSTRUMENT);
        let mut complete = true;
        for inst in instruments {
            match inst.row(date) {
                Some(cells) => values.extend_from_slice(&cells),
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            continue;
        }

        rows.push(FeatureRow {
            date,
            values,
            target: u8::from(next_macd > 0.0),
        });
    }

    tracing::info!(
        instruments = instruments.len(),
        shared_dates = timeline.len(),
        rows = rows.len(),
        "feature table assembled"
    );

    Ok(FeatureTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_series(code: &str, start: &str, prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
        let pairs: Vec<_> = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| (start + chrono::Duration::days(i as i64), p))
            .collect();
        PriceSeries::from_pairs(code, &pairs).unwrap()
    }

    fn small_config() -> FeatureConfig {
        FeatureConfig {
            rsi: RsiConfig { period: 3 },
            macd: MacdConfig {
                short: 2,
                long: 4,
                signal: 2,
            },
            bollinger: BollingerConfig {
                window: 3,
                num_std: 2.0,
            },
            risk: RiskConfig {
                risk_free_rate: 0.0,
                periods_per_year: 252,
            },
        }
    }

    fn zigzag(n: usize, base: f64) -> Vec<f64> {
        (0..n)
            .map(|i| base + i as f64 + if i % 2 == 0 { 0.0 } else { -1.5 })
            .collect()
    }

    #[test]
    fn instrument_features_align_with_prices() {
        let series = make_series("QQQ", "2024-01-01", &zigzag(10, 100.0));
        let features = InstrumentFeatures::compute(&series, &small_config());

        assert_eq!(features.dates.len(), 10);
        assert_eq!(features.macd.len(), 10);
        assert_eq!(features.rsi.len(), 10);
        assert_eq!(features.bollinger_width.len(), 10);
        assert!(features.sharpe.is_some());
        assert!(features.row(features.dates[0]).is_none());
        assert!(features.row(features.dates[5]).is_some());
    }

    #[test]
    fn column_names_follow_code() {
        let series = make_series("GLD", "2024-01-01", &[1.0, 2.0]);
        let features = InstrumentFeatures::compute(&series, &small_config());
        assert_eq!(
            features.column_names(),
            [
                "GLD_MACD".to_string(),
                "GLD_RSI".to_string(),
                "GLD_Bollinger_Width".to_string(),
                "GLD_Sharpe".to_string()
            ]
        );
    }

    #[test]
    fn shared_timeline_is_intersection() {
        let config = small_config();
        let a = InstrumentFeatures::compute(&make_series("A", "2024-01-01", &zigzag(6, 10.0)), &config);
        let b = InstrumentFeatures::compute(&make_series("B", "2024-01-03", &zigzag(6, 20.0)), &config);

        let timeline = shared_timeline(&[a, b]);
        assert_eq!(timeline.len(), 4);
        assert_eq!(timeline[0], NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(timeline[3], NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
    }

    #[test]
    fn shared_timeline_empty() {
        assert!(shared_timeline(&[]).is_empty());
    }

    #[test]
    fn table_drops_warmup_and_last_row() {
        let config = small_config();
        let qqq = InstrumentFeatures::compute(&make_series("QQQ", "2024-01-01", &zigzag(12, 100.0)), &config);
        let spy = InstrumentFeatures::compute(&make_series("SPY", "2024-01-01", &zigzag(12, 50.0)), &config);

        let table = build_feature_table(&[qqq.clone(), spy], "QQQ").unwrap();

        assert_eq!(table.columns.len(), 2 * FEATURES_PER_INSTRUMENT + 1);
        assert_eq!(table.columns.last().map(String::as_str), Some("Target"));

        // Window 3 leaves the first two dates undefined; the last date has no successor.
        assert_eq!(table.len(), 12 - 2 - 1);
        assert_eq!(table.rows[0].date, qqq.dates[2]);
        assert_eq!(table.rows.last().unwrap().date, qqq.dates[10]);

        for row in &table.rows {
            assert_eq!(row.values.len(), 2 * FEATURES_PER_INSTRUMENT);
            assert!(row.values.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn target_reads_next_macd() {
        let config = small_config();
        let qqq = InstrumentFeatures::compute(&make_series("QQQ", "2024-01-01", &zigzag(12, 100.0)), &config);
        let table = build_feature_table(std::slice::from_ref(&qqq), "QQQ").unwrap();

        for row in &table.rows {
            let i = qqq.date_index[&row.date];
            let next = qqq.macd[i + 1].unwrap();
            assert_eq!(row.target, u8::from(next > 0.0));
        }
    }

    #[test]
    fn undefined_sharpe_drops_every_row() {
        let config = small_config();
        let flat = InstrumentFeatures::compute(&make_series("FLAT", "2024-01-01", &[10.0; 8]), &config);
        assert!(flat.sharpe.is_none());

        let table = build_feature_table(&[flat], "FLAT").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn unknown_target_is_an_error() {
        let config = small_config();
        let qqq = InstrumentFeatures::compute(&make_series("QQQ", "2024-01-01", &zigzag(5, 1.0)), &config);
        let err = build_feature_table(&[qqq], "SPY").unwrap_err();
        assert!(matches!(err, RiskawareError::NoData { code } if code == "SPY"));
    }
}
