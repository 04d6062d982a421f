//! Data source trait and request/response types.
//!
//! This module defines the acquisition contract (`DataSource`) implemented by
//! the three price strategies, along with the request and batch types they
//! exchange with the pipeline.
//!
//! | Strategy | Type | Backend |
//! |----------|------|---------|
//! | live | [`LiveSource`](crate::LiveSource) | remote chart API, one call per ticker |
//! | snapshot | [`SnapshotSource`](crate::SnapshotSource) | pre-generated JSON documents |
//! | synthetic | [`SyntheticSource`](crate::SyntheticSource) | seeded random walk |
//!
//! # Example
//!
//! ```rust,ignore
//! use tickerboard_core::{DataSource, Period, PriceRequest, SourceError, SyntheticSource, Symbol};
//!
//! async fn fetch(source: &SyntheticSource, as_of: time::Date) -> Result<(), SourceError> {
//!     let request = PriceRequest::new(vec![Symbol::parse("AAPL")?], Period::OneMonth, as_of)?;
//!     let batch = source.fetch(&request).await?;
//!     println!("empty frame: {}", batch.frame.is_empty());
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{MarketOverview, Period, RawFrame, SourceKind, Symbol, ValidationError};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    InvalidRequest,
    NotFound,
    Decode,
    Internal,
}

/// Structured source error; converted into a diagnostic by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Decode,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Decode => "source.decode",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(value: ValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

/// Request payload for a price fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub symbols: Vec<Symbol>,
    pub period: Period,
    pub as_of: Date,
}

impl PriceRequest {
    pub fn new(symbols: Vec<Symbol>, period: Period, as_of: Date) -> Result<Self, SourceError> {
        if symbols.is_empty() {
            return Err(SourceError::invalid_request(
                "price request must include at least one symbol",
            ));
        }
        Ok(Self {
            symbols,
            period,
            as_of,
        })
    }

    /// Inclusive date window covered by this request.
    pub fn window(&self) -> (Date, Date) {
        self.period.window(self.as_of)
    }
}

/// Provenance of a snapshot, as published in `last_updated.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_date: Option<String>,
    /// Writers emit either a number or preformatted text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_data_ratio: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DataInfo {
    /// `Last updated: … | Market date: … | Real data: …`, with `Unknown` for
    /// missing fields.
    pub fn provenance_line(&self) -> String {
        let ratio = match &self.real_data_ratio {
            Some(serde_json::Value::String(text)) => text.clone(),
            Some(serde_json::Value::Null) | None => String::from("Unknown"),
            Some(other) => other.to_string(),
        };
        format!(
            "Last updated: {} | Market date: {} | Real data: {}",
            self.last_updated.as_deref().unwrap_or("Unknown"),
            self.market_date.as_deref().unwrap_or("Unknown"),
            ratio
        )
    }
}

/// Raw adapter output plus whatever provenance the backend supplies.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBatch {
    pub frame: RawFrame,
    pub info: Option<DataInfo>,
    pub warnings: Vec<String>,
}

impl SourceBatch {
    pub fn new(frame: RawFrame) -> Self {
        Self {
            frame,
            info: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_info(mut self, info: DataInfo) -> Self {
        self.info = Some(info);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Price acquisition contract.
///
/// | Method | Description |
/// |--------|-------------|
/// | [`id`](DataSource::id) | Strategy identifier |
/// | [`fetch`](DataSource::fetch) | Daily prices for the requested tickers |
/// | [`market_overview`](DataSource::market_overview) | Broad index summary |
///
/// Implementations must be `Send + Sync` and must not retry internally.
pub trait DataSource: Send + Sync {
    fn id(&self) -> SourceKind;

    /// Fetches daily prices for every symbol in the request.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when no requested ticker could be loaded.
    /// Partial failures are reported through [`SourceBatch::warnings`].
    fn fetch<'a>(
        &'a self,
        req: &'a PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SourceBatch, SourceError>> + Send + 'a>>;

    fn market_overview<'a>(
        &'a self,
        as_of: Date,
    ) -> Pin<Box<dyn Future<Output = Result<MarketOverview, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn request_requires_symbols() {
        let err = PriceRequest::new(Vec::new(), Period::OneMonth, date!(2024 - 03 - 01))
            .expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
        assert_eq!(err.code(), "source.invalid_request");
    }

    #[test]
    fn provenance_accepts_numeric_or_text_ratio() {
        let numeric: DataInfo = serde_json::from_str(
            r#"{"last_updated":"2024-03-01 21:00","market_date":"2024-03-01","real_data_ratio":0.8}"#,
        )
        .expect("decodes");
        assert_eq!(
            numeric.provenance_line(),
            "Last updated: 2024-03-01 21:00 | Market date: 2024-03-01 | Real data: 0.8"
        );

        let text: DataInfo =
            serde_json::from_str(r#"{"real_data_ratio":"5/7"}"#).expect("decodes");
        assert_eq!(
            text.provenance_line(),
            "Last updated: Unknown | Market date: Unknown | Real data: 5/7"
        );
    }

    #[test]
    fn display_includes_code() {
        let err = SourceError::not_found("no data available for requested tickers");
        assert_eq!(
            err.to_string(),
            "no data available for requested tickers (source.not_found)"
        );
    }
}
