//! User-facing degradation signals.
//!
//! The pipeline never returns an error to its caller. Every failure along the
//! way is captured as a [`Diagnostic`] next to a (possibly empty) result.

use serde::Serialize;
use thiserror::Error;

use crate::{join_symbols, Period, SourceKind, Symbol};

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No ticker survived parsing; nothing was fetched.
    #[error("no tickers given")]
    EmptyInput,

    /// The data source failed; results are empty.
    #[error("{adapter} source failed: {message}")]
    AdapterFailure {
        #[serde(rename = "source")]
        adapter: SourceKind,
        message: String,
    },

    /// Every requested ticker was dropped during normalization.
    #[error("no valid data for {}", join_symbols(.requested))]
    NoValidData { requested: Vec<Symbol> },

    /// The period label was not recognised and the fallback was used.
    #[error("unknown period '{label}', using {fallback}")]
    InvalidPeriod { label: String, fallback: Period },
}

impl Diagnostic {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "pipeline.empty_input",
            Self::AdapterFailure { .. } => "pipeline.adapter_failure",
            Self::NoValidData { .. } => "pipeline.no_valid_data",
            Self::InvalidPeriod { .. } => "pipeline.invalid_period",
        }
    }

    /// Whether this diagnostic means the results are empty.
    pub const fn is_blocking(&self) -> bool {
        !matches!(self, Self::InvalidPeriod { .. })
    }
}
