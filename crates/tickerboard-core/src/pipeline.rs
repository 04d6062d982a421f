//! End-to-end request orchestration.
//!
//! `parse tickers -> resolve period -> fetch -> normalize -> metrics -> chart`
//!
//! [`Pipeline::run`] never returns an error: every failure becomes a
//! [`Diagnostic`] next to empty results, so a caller can always render
//! something.

use std::sync::Arc;

use serde::Serialize;
use time::Date;
use tracing::{info, warn};

use crate::chart::{build_chart, build_overview_chart, ChartSpec, ChartStyle};
use crate::data_source::{DataInfo, DataSource, PriceRequest};
use crate::metrics::{compute_metrics, MetricsRow};
use crate::normalize::normalize;
use crate::overview::MarketOverview;
use crate::{
    join_symbols, parse_tickers_lenient, CanonicalTable, Diagnostic, Period, SourceKind, Symbol,
};

pub const NO_DATA_MESSAGE: &str =
    "No data available. Please check your ticker symbols and try again.";

/// Everything one dashboard refresh needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Raw, comma-separated ticker text.
    pub tickers: String,
    /// Raw period label; unknown labels fall back to the default period.
    pub period: String,
    pub style: ChartStyle,
    /// Date treated as today.
    pub as_of: Date,
}

impl RequestContext {
    pub fn new(tickers: impl Into<String>, period: impl Into<String>, as_of: Date) -> Self {
        Self {
            tickers: tickers.into(),
            period: period.into(),
            style: ChartStyle::default(),
            as_of,
        }
    }

    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    /// Parsed tickers, in request order.
    pub tickers: Vec<Symbol>,
    pub period: Period,
    pub style: ChartStyle,
    pub source: SourceKind,
    pub table: CanonicalTable,
    pub metrics: Vec<MetricsRow>,
    pub chart: Option<ChartSpec>,
    pub info: Option<DataInfo>,
    pub status: String,
    pub diagnostics: Vec<Diagnostic>,
    pub warnings: Vec<String>,
}

impl DashboardReport {
    fn empty(source: SourceKind, style: ChartStyle) -> Self {
        Self {
            tickers: Vec::new(),
            period: Period::DEFAULT,
            style,
            source,
            table: CanonicalTable::empty(),
            metrics: Vec::new(),
            chart: None,
            info: None,
            status: String::from(NO_DATA_MESSAGE),
            diagnostics: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Tickers that made it into the table, in request order.
    pub fn loaded_tickers(&self) -> Vec<Symbol> {
        self.tickers
            .iter()
            .filter(|ticker| self.table.contains_ticker(ticker))
            .cloned()
            .collect()
    }

    pub fn is_degraded(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_blocking)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewReport {
    pub source: SourceKind,
    pub overview: Option<MarketOverview>,
    pub chart: Option<ChartSpec>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs requests against one data source.
#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn DataSource>,
}

impl Pipeline {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source.id()
    }

    pub async fn run(&self, ctx: &RequestContext) -> DashboardReport {
        let mut report = DashboardReport::empty(self.source.id(), ctx.style);

        let parsed = parse_tickers_lenient(&ctx.tickers);
        for rejected in &parsed.rejected {
            report
                .warnings
                .push(format!("skipped ticker '{}': {}", rejected.input, rejected.reason));
        }

        let (period, period_diagnostic) = Period::resolve(&ctx.period);
        report.period = period;
        if let Some(diagnostic) = period_diagnostic {
            warn!(label = %ctx.period, "unknown period label");
            report.diagnostics.push(diagnostic);
        }

        if parsed.is_empty() {
            report.diagnostics.push(Diagnostic::EmptyInput);
            return report;
        }
        report.tickers = parsed.symbols;

        let batch = match PriceRequest::new(report.tickers.clone(), period, ctx.as_of) {
            Ok(request) => self.source.fetch(&request).await,
            Err(error) => Err(error),
        };
        let batch = match batch {
            Ok(batch) => batch,
            Err(error) => {
                warn!(source = %report.source, %error, "fetch failed");
                report.status = format!("Error: {}", error.message());
                report.diagnostics.push(Diagnostic::AdapterFailure {
                    adapter: report.source,
                    message: error.message().to_owned(),
                });
                return report;
            }
        };
        report.warnings.extend(batch.warnings);
        report.info = batch.info;

        let normalized = normalize(batch.frame, &report.tickers);
        report.warnings.extend(normalized.warnings);
        for missing in &normalized.missing {
            report.warnings.push(format!("no data for {missing}"));
        }
        if let Some(diagnostic) = normalized.diagnostic {
            report.diagnostics.push(diagnostic);
        }
        report.table = normalized.table;

        let loaded = report.loaded_tickers();
        report.metrics = compute_metrics(&report.table, &loaded);
        report.chart = build_chart(&report.table, &loaded, ctx.style);
        report.status = status_line(&loaded, report.info.as_ref());

        info!(
            source = %report.source,
            period = %report.period,
            tickers = loaded.len(),
            points = report.table.len(),
            dropped = normalized.dropped,
            "pipeline run complete"
        );
        report
    }

    pub async fn overview(&self, as_of: Date) -> OverviewReport {
        let source = self.source.id();
        match self.source.market_overview(as_of).await {
            Ok(overview) => OverviewReport {
                source,
                chart: build_overview_chart(&overview),
                overview: Some(overview),
                diagnostics: Vec::new(),
            },
            Err(error) => {
                warn!(%source, %error, "market overview failed");
                OverviewReport {
                    source,
                    overview: None,
                    chart: None,
                    diagnostics: vec![Diagnostic::AdapterFailure {
                        adapter: source,
                        message: error.message().to_owned(),
                    }],
                }
            }
        }
    }
}

fn status_line(loaded: &[Symbol], info: Option<&DataInfo>) -> String {
    if loaded.is_empty() {
        return match info.and_then(|info| info.error.as_deref()) {
            Some(error) => format!("Error: {error}"),
            None => String::from(NO_DATA_MESSAGE),
        };
    }

    let mut status = format!("Loaded data for: {}", join_symbols(loaded));
    if let Some(info) = info {
        status.push('\n');
        status.push_str(&info.provenance_line());
    }
    status
}
