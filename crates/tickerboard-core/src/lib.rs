//! # Tickerboard Core
//!
//! Price acquisition, normalization, statistics and chart specifications for
//! the `tickerboard` stock dashboard.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Live, snapshot and synthetic price strategies |
//! | [`chart`] | Vega-Lite chart specifications |
//! | [`data_source`] | Data source trait and request/batch types |
//! | [`diagnostics`] | User-facing degradation signals |
//! | [`domain`] | Symbols, periods, price points, canonical table |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`frame`] | Raw adapter frames |
//! | [`http_client`] | HTTP client abstraction |
//! | [`metrics`] | Per-ticker descriptive statistics |
//! | [`normalize`] | Raw frames to canonical table |
//! | [`overview`] | Broad market index summary |
//! | [`pipeline`] | End-to-end request orchestration |
//! | [`source`] | Strategy identifiers |
//! | [`source_config`] | Environment-driven strategy selection |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tickerboard_core::{Pipeline, RequestContext, SourceBuilder, SourceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = SourceBuilder::new(SourceConfig::from_env()?).build()?;
//!     let pipeline = Pipeline::new(source);
//!
//!     let today = tickerboard_core::domain::date::today_utc();
//!     let ctx = RequestContext::new("AAPL, MSFT", "3M", today);
//!     let report = pipeline.run(&ctx).await;
//!     println!("{}", report.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  CLI / caller    │
//! └────────┬─────────┘
//!          │ RequestContext
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │    Pipeline      │────▶│   Data Source    │──▶ live | snapshot | synthetic
//! └────────┬─────────┘     └──────────────────┘
//!          │ RawFrame
//!          ▼
//! ┌──────────────────┐
//! │   Normalizer     │──▶ CanonicalTable ──▶ metrics, chart
//! └──────────────────┘
//! ```

pub mod adapters;
pub mod chart;
pub mod data_source;
pub mod diagnostics;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod http_client;
pub mod metrics;
pub mod normalize;
pub mod overview;
pub mod pipeline;
pub mod source;
pub mod source_config;

// Strategies
pub use adapters::{
    DirSnapshotLoader, HttpSnapshotLoader, LiveSource, SnapshotLoader, SnapshotSource,
    SyntheticConfig, SyntheticSource,
};

// Charts
pub use chart::{build_chart, build_overview_chart, ChartSpec, ChartStyle};

// Data source trait and types
pub use data_source::{
    DataInfo, DataSource, PriceRequest, SourceBatch, SourceError, SourceErrorKind,
};

pub use diagnostics::Diagnostic;

// Domain models
pub use domain::{
    join_symbols, parse_tickers, parse_tickers_lenient, CanonicalTable, ParsedTickers, Period,
    PricePoint, RejectedTicker, Symbol,
};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

// Error types
pub use error::{CoreError, ValidationError};

pub use frame::{
    ColumnKey, ColumnLayout, Field, RawFrame, RawRecord, SeriesRow, TickerSeries, WideFrame,
};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

pub use metrics::{compute_metrics, MetricsDisplay, MetricsRow};
pub use normalize::{normalize, Normalized};
pub use overview::{MarketOverview, OverviewPoint, Trend};
pub use pipeline::{DashboardReport, OverviewReport, Pipeline, RequestContext};
pub use source::SourceKind;
pub use source_config::{SourceBuilder, SourceConfig};
