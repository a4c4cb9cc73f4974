//! Domain error types.

/// Why an indicator could not be computed for a given input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndicatorError {
    #[error("insufficient data for {indicator}: have {bars} bars, need {minimum}")]
    InsufficientData {
        indicator: String,
        bars: usize,
        minimum: usize,
    },

    #[error("invalid parameter for {indicator}: {reason}")]
    InvalidParameter { indicator: String, reason: String },
}

/// Top-level error type for stockdash.
#[derive(Debug, thiserror::Error)]
pub enum StockdashError {
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

    #[error("data source error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol} ({interval})")]
    NoData { symbol: String, interval: String },

    #[error("malformed input for {symbol}: {reason}")]
    MalformedInput { symbol: String, reason: String },

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StockdashError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            StockdashError::Io(_) => 1,
            StockdashError::ConfigParse { .. }
            | StockdashError::ConfigMissing { .. }
            | StockdashError::ConfigInvalid { .. } => 2,
            StockdashError::Data { .. } => 3,
            StockdashError::MalformedInput { .. } => 4,
            StockdashError::NoData { .. } | StockdashError::Indicator(_) => 5,
        }
    }
}

impl From<&StockdashError> for std::process::ExitCode {
    fn from(err: &StockdashError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}
