//! Configuration validation.
//!
//! Checks every config field a command reads before any data is loaded.
//! Missing numeric keys fall back to the documented defaults.

use crate::domain::error::RiskawareError;
use crate::domain::indicator::{bollinger, macd, rsi};
use crate::domain::risk::{DEFAULT_RISK_FREE_RATE, TRADING_DAYS_PER_YEAR};
use crate::ports::config_port::ConfigPort;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), RiskawareError> {
    match config.get_string("data", "dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(RiskawareError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        }),
    }
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), RiskawareError> {
    validate_rsi_period(config)?;
    validate_macd_spans(config)?;
    validate_bollinger(config)?;
    Ok(())
}

pub fn validate_risk_config(config: &dyn ConfigPort) -> Result<(), RiskawareError> {
    validate_risk_free_rate(config, "risk", DEFAULT_RISK_FREE_RATE)?;
    validate_periods_per_year(config)?;
    Ok(())
}

pub fn validate_dataset_config(config: &dyn ConfigPort) -> Result<(), RiskawareError> {
    let codes = parse_codes(config.get_string("dataset", "codes").as_deref());
    if codes.is_empty() {
        return Err(RiskawareError::ConfigMissing {
            section: "dataset".to_string(),
            key: "codes".to_string(),
        });
    }

    let target = config
        .get_string("dataset", "target")
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty());
    if let Some(target) = target {
        if !codes.contains(&target) {
            return Err(RiskawareError::ConfigInvalid {
                section: "dataset".to_string(),
                key: "target".to_string(),
                reason: format!("target {} is not listed in codes", target),
            });
        }
    }

    validate_risk_free_rate(config, "dataset", 0.0)?;
    Ok(())
}

/// Split a comma-separated code list, upper-cased, blanks and repeats removed.
pub fn parse_codes(value: Option<&str>) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for code in value.unwrap_or_default().split(',') {
        let code = code.trim().to_uppercase();
        if !code.is_empty() && !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

/// The configured integer, or `default` when the key is absent or blank.
fn read_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, RiskawareError> {
    read_value(config, section, key, "an integer").map(|v| v.unwrap_or(default))
}

/// The configured number, or `default` when the key is absent or blank.
fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, RiskawareError> {
    read_value(config, section, key, "a number").map(|v| v.unwrap_or(default))
}

fn read_value<T: std::str::FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    expected: &str,
) -> Result<Option<T>, RiskawareError> {
    if !config.has_key(section, key) {
        return Ok(None);
    }
    let raw = config.get_string(section, key).unwrap_or_default();
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| RiskawareError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("expected {}, got {:?}", expected, raw.trim()),
        })
}

fn validate_rsi_period(config: &dyn ConfigPort) -> Result<(), RiskawareError> {
    let value = read_int(config, "indicators", "rsi_period", rsi::DEFAULT_PERIOD as i64)?;
    if value < 1 {
        return Err(RiskawareError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "rsi_period".to_string(),
            reason: "rsi_period must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_macd_spans(config: &dyn ConfigPort) -> Result<(), RiskawareError> {
    let short = read_int(config, "indicators", "macd_short", macd::DEFAULT_SHORT as i64)?;
    let long = read_int(config, "indicators", "macd_long", macd::DEFAULT_LONG as i64)?;
    let signal = read_int(config, "indicators", "macd_signal", macd::DEFAULT_SIGNAL as i64)?;

    for (key, value) in [("macd_short", short), ("macd_long", long), ("macd_signal", signal)] {
        if value < 1 {
            return Err(RiskawareError::ConfigInvalid {
                section: "indicators".to_string(),
                key: key.to_string(),
                reason: format!("{} must be at least 1", key),
            });
        }
    }

    if short >= long {
        return Err(RiskawareError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "macd_short".to_string(),
            reason: "macd_short must be less than macd_long".to_string(),
        });
    }
    Ok(())
}

fn validate_bollinger(config: &dyn ConfigPort) -> Result<(), RiskawareError> {
    let window = read_int(
        config,
        "indicators",
        "bollinger_window",
        bollinger::DEFAULT_WINDOW as i64,
    )?;
    if window < 2 {
        return Err(RiskawareError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "bollinger_window".to_string(),
            reason: "bollinger_window must be at least 2".to_string(),
        });
    }

    let num_std = read_double(
        config,
        "indicators",
        "bollinger_num_std",
        bollinger::DEFAULT_NUM_STD,
    )?;
    if !num_std.is_finite() || num_std < 0.0 {
        return Err(RiskawareError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "bollinger_num_std".to_string(),
            reason: "bollinger_num_std must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_free_rate(
    config: &dyn ConfigPort,
    section: &str,
    default: f64,
) -> Result<(), RiskawareError> {
    let value = read_double(config, section, "risk_free_rate", default)?;
    if !(0.0..1.0).contains(&value) {
        return Err(RiskawareError::ConfigInvalid {
            section: section.to_string(),
            key: "risk_free_rate".to_string(),
            reason: "risk_free_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_periods_per_year(config: &dyn ConfigPort) -> Result<(), RiskawareError> {
    let value = read_int(config, "risk", "periods_per_year", TRADING_DAYS_PER_YEAR as i64)?;
    if value < 1 || value > u32::MAX as i64 {
        return Err(RiskawareError::ConfigInvalid {
            section: "risk".to_string(),
            key: "periods_per_year".to_string(),
            reason: "periods_per_year must be a positive integer".to_string(),
        });
    }
    Ok(())
}
