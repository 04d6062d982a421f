use thiserror::Error;

/// Validation and contract errors exposed by `tickerboard-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or digit: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid period '{value}', expected one of 1M, 3M, 6M, 1Y, 2Y, 5Y")]
    InvalidPeriod { value: String },
    #[error("invalid chart style '{value}', expected one of line, area, candlestick")]
    InvalidChartStyle { value: String },
    #[error("invalid source '{value}', expected one of live, snapshot, synthetic")]
    InvalidSource { value: String },

    #[error("invalid value '{value}' for {key}")]
    InvalidConfig { key: String, value: String },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be positive")]
    NonPositiveValue { field: &'static str },

    #[error("column length {len} does not match index length {expected}")]
    ColumnLengthMismatch { len: usize, expected: usize },
    #[error("series must contain at least one point")]
    EmptySeries,

    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
