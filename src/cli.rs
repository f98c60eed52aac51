//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    parse_codes, validate_data_config, validate_dataset_config, validate_indicator_config,
    validate_risk_config,
};
use crate::domain::dataset::{build_feature_table, FeatureConfig, FeatureTable, InstrumentFeatures};
use crate::domain::error::RiskawareError;
use crate::domain::indicator::{
    bollinger, calculate_bollinger, calculate_macd, calculate_rsi, macd, rsi, BollingerConfig,
    IndicatorSeries, MacdConfig, RsiConfig,
};
use crate::domain::price_series::PriceSeries;
use crate::domain::risk::{
    RiskConfig, RiskSummary, RiskValue, DEFAULT_RISK_FREE_RATE, TRADING_DAYS_PER_YEAR,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::report_port::{IndicatorTable, ReportPort};

#[derive(Parser, Debug)]
#[command(
    name = "riskaware",
    about = "Technical indicators, risk metrics and feature datasets for daily prices"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute RSI, MACD and Bollinger Bands for one instrument
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: String,
        /// Write CSV here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print Sharpe, Sortino and max drawdown per instrument
    Risk {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
    },
    /// Build the supervised feature dataset
    Features {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List instruments available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for instrument(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
    },
}

/// Indicator parameters read from the `[indicators]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSettings {
    pub rsi: RsiConfig,
    pub macd: MacdConfig,
    pub bollinger: BollingerConfig,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Indicators {
            config,
            code,
            output,
        } => run_indicators(&config, &code, output.as_deref()),
        Command::Risk { config, code } => run_risk(&config, code.as_deref()),
        Command::Features { config, output } => run_features(&config, output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, code } => run_info(&config, code.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, RiskawareError> {
    tracing::info!("Loading config from {}", path.display());
    Ok(FileConfigAdapter::from_file(path)?.with_env_overrides())
}

pub fn build_indicator_settings(
    adapter: &dyn ConfigPort,
) -> Result<IndicatorSettings, RiskawareError> {
    validate_indicator_config(adapter)?;

    let int = |key: &str, default: usize| {
        adapter.get_int("indicators", key, default as i64) as usize
    };

    Ok(IndicatorSettings {
        rsi: RsiConfig {
            period: int("rsi_period", rsi::DEFAULT_PERIOD),
        },
        macd: MacdConfig {
            short: int("macd_short", macd::DEFAULT_SHORT),
            long: int("macd_long", macd::DEFAULT_LONG),
            signal: int("macd_signal", macd::DEFAULT_SIGNAL),
        },
        bollinger: BollingerConfig {
            window: int("bollinger_window", bollinger::DEFAULT_WINDOW),
            num_std: adapter.get_double(
                "indicators",
                "bollinger_num_std",
                bollinger::DEFAULT_NUM_STD,
            ),
        },
    })
}

pub fn build_risk_config(adapter: &dyn ConfigPort) -> Result<RiskConfig, RiskawareError> {
    validate_risk_config(adapter)?;
    Ok(RiskConfig {
        risk_free_rate: adapter.get_double("risk", "risk_free_rate", DEFAULT_RISK_FREE_RATE),
        periods_per_year: adapter.get_int(
            "risk",
            "periods_per_year",
            TRADING_DAYS_PER_YEAR as i64,
        ) as u32,
    })
}

pub fn build_feature_config(adapter: &dyn ConfigPort) -> Result<FeatureConfig, RiskawareError> {
    let indicators = build_indicator_settings(adapter)?;
    let risk = build_risk_config(adapter)?;
    validate_dataset_config(adapter)?;

    Ok(FeatureConfig {
        rsi: indicators.rsi,
        macd: indicators.macd,
        bollinger: indicators.bollinger,
        risk: RiskConfig {
            risk_free_rate: adapter.get_double("dataset", "risk_free_rate", 0.0),
            periods_per_year: risk.periods_per_year,
        },
    })
}

pub fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, RiskawareError> {
    validate_data_config(config)?;
    let dir = config.get_string("data", "dir").unwrap_or_default();
    Ok(CsvAdapter::new(PathBuf::from(dir.trim())))
}

/// `--code` wins, then `[dataset] codes`.
pub fn resolve_codes(code_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    match code_override {
        Some(c) => parse_codes(Some(c)),
        None => parse_codes(config.get_string("dataset", "codes").as_deref()),
    }
}

/// `[dataset] target`, defaulting to the first configured code.
pub fn resolve_target(config: &dyn ConfigPort, codes: &[String]) -> Option<String> {
    config
        .get_string("dataset", "target")
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .or_else(|| codes.first().cloned())
}

pub fn format_metric(value: &RiskValue, as_percent: bool) -> String {
    match value {
        Ok(v) if as_percent => format!("{:.2}%", v * 100.0),
        Ok(v) => format!("{:.4}", v),
        Err(reason) => format!("undefined ({})", reason),
    }
}

fn run_indicators(
    config_path: &Path,
    code: &str,
    output: Option<&Path>,
) -> Result<(), RiskawareError> {
    let adapter = load_config(config_path)?;
    let settings = build_indicator_settings(&adapter)?;
    let data_port = data_adapter(&adapter)?;
    let code = code.trim().to_uppercase();

    match output {
        Some(path) => {
            run_indicators_pipeline(&data_port, &CsvReportAdapter::new(), &settings, &code, path)?;
            tracing::info!("Indicators written to: {}", path.display());
            Ok(())
        }
        None => {
            let prices = data_port.fetch_prices(&code)?;
            if prices.is_empty() {
                return Err(RiskawareError::NoData { code });
            }
            let (rsi, macd, bollinger) = compute_indicator_columns(&prices, &settings);
            let table = IndicatorTable {
                prices: &prices,
                rsi: &rsi,
                macd: &macd,
                bollinger: &bollinger,
            };
            CsvReportAdapter::new().write_indicators_to(&table, io::stdout().lock())
        }
    }
}

fn compute_indicator_columns(
    prices: &PriceSeries,
    settings: &IndicatorSettings,
) -> (IndicatorSeries, IndicatorSeries, IndicatorSeries) {
    (
        calculate_rsi(prices, &settings.rsi),
        calculate_macd(prices, &settings.macd),
        calculate_bollinger(prices, &settings.bollinger),
    )
}

pub fn run_indicators_pipeline(
    data_port: &dyn PriceDataPort,
    report_port: &dyn ReportPort,
    settings: &IndicatorSettings,
    code: &str,
    output_path: &Path,
) -> Result<(), RiskawareError> {
    let prices = data_port.fetch_prices(code)?;
    if prices.is_empty() {
        return Err(RiskawareError::NoData {
            code: code.to_string(),
        });
    }
    tracing::info!(code, rows = prices.len(), "computing indicators");

    let (rsi, macd, bollinger) = compute_indicator_columns(&prices, settings);
    let table = IndicatorTable {
        prices: &prices,
        rsi: &rsi,
        macd: &macd,
        bollinger: &bollinger,
    };
    report_port.write_indicators(&table, output_path)
}

fn run_risk(config_path: &Path, code: Option<&str>) -> Result<(), RiskawareError> {
    let adapter = load_config(config_path)?;
    let risk_config = build_risk_config(&adapter)?;
    let data_port = data_adapter(&adapter)?;

    let mut codes = resolve_codes(code, &adapter);
    if codes.is_empty() {
        codes = data_port.list_symbols()?;
    }
    if codes.is_empty() {
        return Err(RiskawareError::ConfigMissing {
            section: "dataset".into(),
            key: "codes".into(),
        });
    }

    run_risk_pipeline(&data_port, &codes, &risk_config, &mut io::stdout().lock())
}

/// Risk summary per code. Instruments that fail to load are logged and skipped.
pub fn run_risk_pipeline(
    data_port: &dyn PriceDataPort,
    codes: &[String],
    risk_config: &RiskConfig,
    out: &mut dyn Write,
) -> Result<(), RiskawareError> {
    let mut reported = 0usize;

    for code in codes {
        let prices = match data_port.fetch_prices(code) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("skipping {} ({})", code, e);
                continue;
            }
        };

        let summary = RiskSummary::compute(&prices.returns(), risk_config);
        writeln!(out, "=== {} ===", code)?;
        writeln!(out, "Observations:     {}", summary.observations)?;
        writeln!(out, "Sharpe Ratio:     {}", format_metric(&summary.sharpe_ratio, false))?;
        writeln!(out, "Sortino Ratio:    {}", format_metric(&summary.sortino_ratio, false))?;
        writeln!(out, "Max Drawdown:     {}", format_metric(&summary.max_drawdown, true))?;
        writeln!(
            out,
            "Volatility (ann): {}",
            format_metric(&summary.annualized_volatility, true)
        )?;
        reported += 1;
    }

    if reported == 0 {
        return Err(RiskawareError::NoData {
            code: codes.join(","),
        });
    }
    Ok(())
}

fn run_features(config_path: &Path, output: Option<&Path>) -> Result<(), RiskawareError> {
    let adapter = load_config(config_path)?;
    let feature_config = build_feature_config(&adapter)?;
    let data_port = data_adapter(&adapter)?;

    let codes = resolve_codes(None, &adapter);
    let target = resolve_target(&adapter, &codes).ok_or_else(|| RiskawareError::ConfigMissing {
        section: "dataset".into(),
        key: "target".into(),
    })?;

    let output = output
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_string("dataset", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(format!("{}_supervised.csv", target.to_lowercase())));

    let table = build_features_pipeline(&data_port, &codes, &target, &feature_config)?;
    CsvReportAdapter::new().write_features(&table, &output)?;
    tracing::info!(rows = table.len(), "Features written to: {}", output.display());
    Ok(())
}

/// Load every code, compute its features, and join them into one table.
pub fn build_features_pipeline(
    data_port: &dyn PriceDataPort,
    codes: &[String],
    target: &str,
    config: &FeatureConfig,
) -> Result<FeatureTable, RiskawareError> {
    let need = config.rsi.period.max(config.bollinger.window) + 1;
    let mut instruments = Vec::with_capacity(codes.len());

    for code in codes {
        let prices = data_port.fetch_prices(code)?;
        if prices.is_empty() {
            return Err(RiskawareError::NoData { code: code.clone() });
        }
        if prices.len() < need {
            return Err(RiskawareError::InsufficientData {
                code: code.clone(),
                have: prices.len(),
                need,
            });
        }
        tracing::info!(code = %code, rows = prices.len(), "computing features");
        instruments.push(InstrumentFeatures::compute(&prices, config));
    }

    let table = build_feature_table(&instruments, target)?;
    if table.is_empty() {
        tracing::warn!("feature table is empty: no shared dates with every feature defined");
    }
    Ok(table)
}

fn run_validate(config_path: &Path) -> Result<(), RiskawareError> {
    let adapter = load_config(config_path)?;

    validate_data_config(&adapter)?;
    let settings = build_indicator_settings(&adapter)?;
    let risk = build_risk_config(&adapter)?;

    println!("Data directory:   {}", adapter.get_string("data", "dir").unwrap_or_default());
    println!("RSI period:       {}", settings.rsi.period);
    println!(
        "MACD:             {},{},{}",
        settings.macd.short, settings.macd.long, settings.macd.signal
    );
    println!(
        "Bollinger:        {} x {}",
        settings.bollinger.window, settings.bollinger.num_std
    );
    println!(
        "Risk-free rate:   {} ({} periods/year)",
        risk.risk_free_rate, risk.periods_per_year
    );

    if adapter.has_key("dataset", "codes") {
        validate_dataset_config(&adapter)?;
        let codes = resolve_codes(None, &adapter);
        println!("Dataset codes:    {}", codes.join(", "));
        if let Some(target) = resolve_target(&adapter, &codes) {
            println!("Dataset target:   {}", target);
        }
    }

    tracing::info!("Configuration is valid");
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), RiskawareError> {
    let adapter = load_config(config_path)?;
    let data_port = data_adapter(&adapter)?;

    let symbols = data_port.list_symbols()?;
    if symbols.is_empty() {
        tracing::warn!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        tracing::info!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn run_info(config_path: &Path, code: Option<&str>) -> Result<(), RiskawareError> {
    let adapter = load_config(config_path)?;
    let data_port = data_adapter(&adapter)?;

    let mut codes = resolve_codes(code, &adapter);
    if codes.is_empty() {
        codes = data_port.list_symbols()?;
    }

    run_info_pipeline(&data_port, &codes, &mut io::stdout().lock())
}

/// Data range per code. Fails with `NoData` when no code has any rows.
pub fn run_info_pipeline(
    data_port: &dyn PriceDataPort,
    codes: &[String],
    out: &mut dyn Write,
) -> Result<(), RiskawareError> {
    let mut reported = 0usize;

    for c in codes {
        match data_port.get_data_range(c) {
            Ok(Some((first, last, count))) => {
                writeln!(out, "{}: {} rows, {} to {}", c, count, first, last)?;
                reported += 1;
            }
            Ok(None) => tracing::warn!("{}: no data found", c),
            Err(e) => tracing::error!("error reading {}: {}", c, e),
        }
    }

    if reported == 0 {
        return Err(RiskawareError::NoData {
            code: codes.join(","),
        });
    }
    Ok(())
}
