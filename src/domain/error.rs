//! Domain error types.

/// Why a risk metric has no value for a given returns series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Undefined {
    #[error("insufficient data: have {have} observations, need {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("zero variance in denominator")]
    ZeroVariance,

    #[error("no negative returns to measure downside deviation")]
    NoDownside,
}

/// Top-level error type for riskaware.
#[derive(Debug, thiserror::Error)]
pub enum RiskawareError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("malformed series {name} at row {row}: {reason}")]
    MalformedSeries {
        name: String,
        row: usize,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error("insufficient data for {code}: have {have} rows, need {need}")]
    InsufficientData {
        code: String,
        have: usize,
        need: usize,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RiskawareError {
    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            RiskawareError::Io(_) | RiskawareError::Csv(_) => 1,
            RiskawareError::ConfigParse { .. }
            | RiskawareError::ConfigMissing { .. }
            | RiskawareError::ConfigInvalid { .. } => 2,
            RiskawareError::DataSource { .. } => 3,
            RiskawareError::MalformedSeries { .. } => 4,
            RiskawareError::NoData { .. } | RiskawareError::InsufficientData { .. } => 5,
        }
    }
}

impl From<&RiskawareError> for std::process::ExitCode {
    fn from(err: &RiskawareError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
