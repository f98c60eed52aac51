//! Risk metrics over a returns series.
//!
//! Every metric is a scalar over the full series, annualized with
//! `periods_per_year` (252 trading days by default). A metric whose
//! denominator vanishes reports [`Undefined`] rather than NaN or infinity.

use crate::domain::error::Undefined;
use crate::domain::indicator::stddev::sample_std;
use crate::domain::price_series::ReturnsSeries;

pub const TRADING_DAYS_PER_YEAR: u32 = 252;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;

pub type RiskValue = Result<f64, Undefined>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskConfig {
    /// Annual risk-free rate as a fraction (0.01 = 1%).
    pub risk_free_rate: f64,
    pub periods_per_year: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl RiskConfig {
    pub fn per_period_risk_free(&self) -> f64 {
        self.risk_free_rate / self.periods_per_year as f64
    }

    fn annualization(&self) -> f64 {
        (self.periods_per_year as f64).sqrt()
    }
}

/// mean(r - rf/P) / std(r) * sqrt(P)
pub fn sharpe_ratio(returns: &[f64], config: &RiskConfig) -> RiskValue {
    let std = dispersion(returns)?;
    let rf = config.per_period_risk_free();
    let excess_mean = returns.iter().map(|r| r - rf).sum::<f64>() / returns.len() as f64;
    Ok(excess_mean / std * config.annualization())
}

/// (mean(r) - rf/P) / std(r where r < 0) * sqrt(P)
pub fn sortino_ratio(returns: &[f64], config: &RiskConfig) -> RiskValue {
    if returns.is_empty() {
        return Err(Undefined::InsufficientData { have: 0, need: 1 });
    }
    let downside: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
    if downside.is_empty() {
        return Err(Undefined::NoDownside);
    }
    let downside_std = dispersion(&downside)?;
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    Ok((mean - config.per_period_risk_free()) / downside_std * config.annualization())
}

/// Worst peak-to-trough decline of cumulative return, as a fraction <= 0.
pub fn max_drawdown(returns: &[f64]) -> RiskValue {
    if returns.is_empty() {
        return Err(Undefined::InsufficientData { have: 0, need: 1 });
    }

    let mut cumulative = 1.0_f64;
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;

    for r in returns {
        cumulative *= 1.0 + r;
        if cumulative > peak {
            peak = cumulative;
        }
        if peak > 0.0 {
            let drawdown = (cumulative - peak) / peak;
            if drawdown < worst {
                worst = drawdown;
            }
        }
    }

    Ok(worst)
}

/// std(r) * sqrt(P)
pub fn annualized_volatility(returns: &[f64], config: &RiskConfig) -> RiskValue {
    Ok(dispersion(returns)? * config.annualization())
}

/// Sample standard deviation usable as a denominator.
fn dispersion(values: &[f64]) -> RiskValue {
    let std = sample_std(values).ok_or(Undefined::InsufficientData {
        have: values.len(),
        need: 2,
    })?;
    let constant = values.iter().all(|&v| v == values[0]);
    if constant || std == 0.0 || !std.is_finite() {
        return Err(Undefined::ZeroVariance);
    }
    Ok(std)
}

/// All risk metrics for one returns series.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskSummary {
    pub observations: usize,
    pub sharpe_ratio: RiskValue,
    pub sortino_ratio: RiskValue,
    pub max_drawdown: RiskValue,
    pub annualized_volatility: RiskValue,
}

impl RiskSummary {
    pub fn compute(returns: &ReturnsSeries, config: &RiskConfig) -> Self {
        let values = returns.values();
        Self {
            observations: values.len(),
            sharpe_ratio: sharpe_ratio(&values, config),
            sortino_ratio: sortino_ratio(&values, config),
            max_drawdown: max_drawdown(&values),
            annualized_volatility: annualized_volatility(&values, config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [f64; 5] = [0.01, -0.02, 0.015, -0.005, 0.02];

    #[test]
    fn default_config() {
        let config = RiskConfig::default();
        assert!((config.risk_free_rate - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.periods_per_year, 252);
        assert!((config.per_period_risk_free() - 0.01 / 252.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sharpe_matches_formula() {
        let config = RiskConfig::default();
        let n = SAMPLE.len() as f64;
        let mean = SAMPLE.iter().sum::<f64>() / n;
        let var = SAMPLE.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let expected = (mean - 0.01 / 252.0) / var.sqrt() * 252.0_f64.sqrt();

        let sharpe = sharpe_ratio(&SAMPLE, &config).unwrap();
        assert!((sharpe - expected).abs() < 1e-9);
    }

    #[test]
    fn sharpe_zero_variance_is_undefined() {
        let config = RiskConfig::default();
        assert_eq!(
            sharpe_ratio(&[0.0, 0.0, 0.0], &config),
            Err(Undefined::ZeroVariance)
        );
        assert_eq!(
            sharpe_ratio(&[0.1, 0.1, 0.1], &config),
            Err(Undefined::ZeroVariance)
        );
    }

    #[test]
    fn sharpe_single_observation_is_undefined() {
        assert_eq!(
            sharpe_ratio(&[0.01], &RiskConfig::default()),
            Err(Undefined::InsufficientData { have: 1, need: 2 })
        );
        assert_eq!(
            sharpe_ratio(&[], &RiskConfig::default()),
            Err(Undefined::InsufficientData { have: 0, need: 2 })
        );
    }

    #[test]
    fn sortino_uses_downside_deviation() {
        let config = RiskConfig::default();
        let mean = SAMPLE.iter().sum::<f64>() / 5.0;
        let downside = [-0.02, -0.005];
        let d_mean = (-0.02 + -0.005) / 2.0;
        let d_std = downside
            .iter()
            .map(|r: &f64| (r - d_mean).powi(2))
            .sum::<f64>()
            .sqrt();
        let expected = (mean - 0.01 / 252.0) / d_std * 252.0_f64.sqrt();

        let sortino = sortino_ratio(&SAMPLE, &config).unwrap();
        assert!((sortino - expected).abs() < 1e-9);
    }

    #[test]
    fn sortino_without_losses_is_undefined() {
        assert_eq!(
            sortino_ratio(&[0.01, 0.02, 0.0], &RiskConfig::default()),
            Err(Undefined::NoDownside)
        );
    }

    #[test]
    fn sortino_single_loss_is_undefined() {
        assert_eq!(
            sortino_ratio(&[0.01, -0.02, 0.03], &RiskConfig::default()),
            Err(Undefined::InsufficientData { have: 1, need: 2 })
        );
    }

    #[test]
    fn sortino_identical_losses_is_undefined() {
        assert_eq!(
            sortino_ratio(&[-0.01, 0.02, -0.01], &RiskConfig::default()),
            Err(Undefined::ZeroVariance)
        );
    }

    #[test]
    fn max_drawdown_peak_to_trough() {
        // cumulative: 1.1, 0.88, 0.924, 0.7392 -> worst (0.7392 - 1.1) / 1.1
        let returns = [0.10, -0.20, 0.05, -0.20];
        let expected = (1.1 * 0.8 * 1.05 * 0.8 - 1.1) / 1.1;
        let dd = max_drawdown(&returns).unwrap();
        assert!((dd - expected).abs() < 1e-12);
    }

    #[test]
    fn max_drawdown_first_loss_measured_from_start() {
        let dd = max_drawdown(&[-0.5, 0.1]).unwrap();
        assert!((dd - 0.0).abs() < f64::EPSILON);

        // The first cumulative value is the first peak, as with a running max.
        let dd = max_drawdown(&[0.0, -0.5]).unwrap();
        assert!((dd - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn max_drawdown_non_negative_returns_is_zero() {
        assert_eq!(max_drawdown(&[0.01, 0.0, 0.02, 0.03]), Ok(0.0));
    }

    #[test]
    fn max_drawdown_empty_is_undefined() {
        assert_eq!(
            max_drawdown(&[]),
            Err(Undefined::InsufficientData { have: 0, need: 1 })
        );
    }

    #[test]
    fn annualized_volatility_scales_std() {
        let vol = annualized_volatility(&[0.01, -0.01], &RiskConfig::default()).unwrap();
        let expected = (0.0002_f64 / 1.0).sqrt() * 252.0_f64.sqrt();
        assert!((vol - expected).abs() < 1e-12);
    }

    #[test]
    fn summary_collects_all_metrics() {
        let returns = ReturnsSeries::from_values(&SAMPLE);
        let summary = RiskSummary::compute(&returns, &RiskConfig::default());

        assert_eq!(summary.observations, 5);
        assert!(summary.sharpe_ratio.is_ok());
        assert!(summary.sortino_ratio.is_ok());
        assert!(summary.max_drawdown.unwrap() < 0.0);
        assert!(summary.annualized_volatility.unwrap() > 0.0);
    }

    #[test]
    fn custom_periods_per_year() {
        let weekly = RiskConfig {
            risk_free_rate: 0.0,
            periods_per_year: 52,
        };
        let daily = RiskConfig {
            risk_free_rate: 0.0,
            periods_per_year: 252,
        };
        let w = sharpe_ratio(&SAMPLE, &weekly).unwrap();
        let d = sharpe_ratio(&SAMPLE, &daily).unwrap();
        assert!((w / d - (52.0_f64 / 252.0).sqrt()).abs() < 1e-12);
    }
}
