//! Behavior-driven tests for the dashboard pipeline.
//!
//! These tests verify WHAT a caller sees for typical and degraded requests:
//! parsed tickers, the canonical table, metrics, chart and diagnostics.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use time::macros::date;
use time::{Date, Weekday};

use tickerboard_core::{
    ChartStyle, DataSource, Diagnostic, MarketOverview, Period, Pipeline, PriceRequest, RawFrame,
    RawRecord, RequestContext, SourceBatch, SourceError, SourceKind, SyntheticConfig,
    SyntheticSource,
};
use tickerboard_tests::{symbol, AS_OF};

fn synthetic_pipeline() -> Pipeline {
    let source = SyntheticSource::new(SyntheticConfig::default()).expect("default config");
    Pipeline::new(Arc::new(source))
}

/// Returns a fixed outcome and counts how often it was asked.
struct StubSource {
    outcome: Result<Vec<RawRecord>, SourceError>,
    fetches: AtomicUsize,
}

impl StubSource {
    fn returning(records: Vec<RawRecord>) -> Self {
        Self {
            outcome: Ok(records),
            fetches: AtomicUsize::new(0),
        }
    }

    fn failing(error: SourceError) -> Self {
        Self {
            outcome: Err(error),
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DataSource for StubSource {
    fn id(&self) -> SourceKind {
        SourceKind::Snapshot
    }

    fn fetch<'a>(
        &'a self,
        _req: &'a PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SourceBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.outcome
                .clone()
                .map(|records| SourceBatch::new(RawFrame::Records(records)))
        })
    }

    fn market_overview<'a>(
        &'a self,
        _as_of: Date,
    ) -> Pin<Box<dyn Future<Output = Result<MarketOverview, SourceError>> + Send + 'a>> {
        Box::pin(async move { Err(SourceError::unavailable("overview not stubbed")) })
    }
}

// =============================================================================
// Pipeline: Happy Path
// =============================================================================

#[tokio::test]
async fn messy_ticker_text_is_normalized_and_deduplicated() {
    // Given: Ticker text with mixed case, padding and a duplicate
    let ctx = RequestContext::new("aapl, AAPL , msft", "3M", AS_OF);

    // When: The pipeline runs against the synthetic source
    let report = synthetic_pipeline().run(&ctx).await;

    // Then: Exactly AAPL and MSFT are requested and loaded, in order
    assert_eq!(report.tickers, vec![symbol("AAPL"), symbol("MSFT")]);
    assert_eq!(report.loaded_tickers(), report.tickers);
    assert_eq!(report.table.tickers(), report.tickers);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    assert_eq!(report.status, "Loaded data for: AAPL, MSFT");
}

#[tokio::test]
async fn synthetic_series_starts_at_the_ticker_base_price() {
    // Given: A known ticker with a fixed base price
    let ctx = RequestContext::new("AAPL", "3M", AS_OF);

    // When: The pipeline runs
    let report = synthetic_pipeline().run(&ctx).await;

    // Then: The first observation is exactly the base price on the first weekday
    let series = report.table.series(&symbol("AAPL"));
    let first = series.first().expect("series is not empty");
    assert_eq!(first.price, 180.0);
    assert_eq!(first.date, date!(2023 - 12 - 18));
    assert_eq!(report.metrics[0].first_price, 180.0);
}

#[tokio::test]
async fn synthetic_runs_are_reproducible() {
    // Given: The same context run twice on independent pipelines
    let ctx = RequestContext::new("AAPL, GOOGL, NEWCO", "6M", AS_OF);

    // When: Both pipelines run
    let first = synthetic_pipeline().run(&ctx).await;
    let second = synthetic_pipeline().run(&ctx).await;

    // Then: Tables and metrics are identical
    assert_eq!(first.table, second.table);
    assert_eq!(first.metrics, second.metrics);
}

#[tokio::test]
async fn table_holds_canonical_invariants() {
    // Given: A multi-ticker, one-year request
    let ctx = RequestContext::new("MSFT, AAPL", "1Y", AS_OF);

    // When: The pipeline runs
    let report = synthetic_pipeline().run(&ctx).await;

    // Then: Points are sorted by (ticker, date), unique, positive and on weekdays
    let points = report.table.points();
    assert!(!points.is_empty());
    for pair in points.windows(2) {
        let key = |index: usize| (pair[index].ticker.clone(), pair[index].date);
        assert!(key(0) < key(1), "table must be strictly ordered");
    }
    for point in points {
        assert!(point.price.is_finite() && point.price > 0.0);
        assert!(!matches!(point.date.weekday(), Weekday::Saturday | Weekday::Sunday));
        assert!(point.date <= AS_OF);
    }
}

#[tokio::test]
async fn each_style_produces_a_chart_for_loaded_tickers() {
    for style in ChartStyle::ALL {
        // Given: A request with an explicit chart style
        let ctx = RequestContext::new("AAPL, GOOGL", "1M", AS_OF).with_style(style);

        // When: The pipeline runs
        let report = synthetic_pipeline().run(&ctx).await;

        // Then: The chart carries every table row
        let chart = report.chart.expect("chart for non-empty table");
        assert_eq!(chart.data.values.len(), report.table.len());
        assert_eq!(report.style, style);
    }
}

// =============================================================================
// Pipeline: Degraded Inputs
// =============================================================================

#[tokio::test]
async fn empty_ticker_text_short_circuits_without_fetching() {
    // Given: A counting source and blank ticker text
    let source = Arc::new(StubSource::returning(Vec::new()));
    let pipeline = Pipeline::new(source.clone());
    let ctx = RequestContext::new(" , ,", "3M", AS_OF);

    // When: The pipeline runs
    let report = pipeline.run(&ctx).await;

    // Then: Nothing is fetched and EmptyInput is reported
    assert_eq!(source.fetch_count(), 0);
    assert_eq!(report.diagnostics, vec![Diagnostic::EmptyInput]);
    assert!(report.table.is_empty());
    assert!(report.metrics.is_empty());
    assert!(report.chart.is_none());
}

#[tokio::test]
async fn invalid_entries_are_skipped_with_a_warning() {
    // Given: One malformed entry between valid tickers
    let ctx = RequestContext::new("AAPL, $$$, MSFT", "1M", AS_OF);

    // When: The pipeline runs
    let report = synthetic_pipeline().run(&ctx).await;

    // Then: Valid tickers load and the bad entry is mentioned
    assert_eq!(report.tickers, vec![symbol("AAPL"), symbol("MSFT")]);
    assert!(report
        .warnings
        .iter()
        .any(|warning| warning.starts_with("skipped ticker '$$$'")));
}

#[tokio::test]
async fn digit_leading_exchange_tickers_are_fetched() {
    // Given: Only exchange codes that start with a digit
    let ctx = RequestContext::new("9988.hk, 0700.HK", "1M", AS_OF);

    // When: The pipeline runs
    let report = synthetic_pipeline().run(&ctx).await;

    // Then: Both are requested and loaded; nothing is rejected
    assert_eq!(report.tickers, vec![symbol("9988.HK"), symbol("0700.HK")]);
    assert_eq!(report.table.tickers(), vec![symbol("0700.HK"), symbol("9988.HK")]);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[tokio::test]
async fn unknown_period_falls_back_to_three_months() {
    // Given: An unsupported period label
    let ctx = RequestContext::new("AAPL", "10Y", AS_OF);

    // When: The pipeline runs
    let report = synthetic_pipeline().run(&ctx).await;

    // Then: The default window is used and the fallback is reported
    assert_eq!(report.period, Period::ThreeMonths);
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::InvalidPeriod {
            label: String::from("10Y"),
            fallback: Period::ThreeMonths,
        }]
    );
    assert!(!report.is_degraded());
    assert!(!report.table.is_empty());
}

#[tokio::test]
async fn empty_adapter_result_yields_empty_metrics() {
    // Given: A source that succeeds with no records
    let pipeline = Pipeline::new(Arc::new(StubSource::returning(Vec::new())));
    let ctx = RequestContext::new("AAPL", "3M", AS_OF);

    // When: The pipeline runs
    let report = pipeline.run(&ctx).await;

    // Then: Results are empty and NoValidData is reported
    assert!(report.table.is_empty());
    assert!(report.metrics.is_empty());
    assert!(report.chart.is_none());
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::NoValidData {
            requested: vec![symbol("AAPL")],
        }]
    );
    assert_eq!(
        report.status,
        "No data available. Please check your ticker symbols and try again."
    );
}

#[tokio::test]
async fn adapter_failure_degrades_to_diagnostic() {
    // Given: A source whose fetch fails
    let pipeline = Pipeline::new(Arc::new(StubSource::failing(SourceError::unavailable(
        "upstream is down",
    ))));
    let ctx = RequestContext::new("AAPL, MSFT", "3M", AS_OF);

    // When: The pipeline runs
    let report = pipeline.run(&ctx).await;

    // Then: The failure is a diagnostic, never a panic or error
    assert!(report.is_degraded());
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::AdapterFailure {
            adapter: SourceKind::Snapshot,
            message: String::from("upstream is down"),
        }]
    );
    assert_eq!(report.status, "Error: upstream is down");
    assert!(report.table.is_empty());
}

#[tokio::test]
async fn partially_missing_tickers_are_warned_about() {
    // Given: A source with rows for AAPL only
    let records = vec![
        RawRecord {
            date: date!(2024 - 03 - 13),
            ticker: String::from("AAPL"),
            price: Some(170.0),
            volume: Some(1_000.0),
        },
        RawRecord {
            date: date!(2024 - 03 - 14),
            ticker: String::from("AAPL"),
            price: Some(171.7),
            volume: None,
        },
    ];
    let pipeline = Pipeline::new(Arc::new(StubSource::returning(records)));
    let ctx = RequestContext::new("AAPL, ZZZZ", "1M", AS_OF);

    // When: The pipeline runs
    let report = pipeline.run(&ctx).await;

    // Then: AAPL loads and ZZZZ is only a warning
    assert_eq!(report.loaded_tickers(), vec![symbol("AAPL")]);
    assert!(report.warnings.contains(&String::from("no data for ZZZZ")));
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.metrics.len(), 1);
}

// =============================================================================
// Market Overview
// =============================================================================

#[tokio::test]
async fn synthetic_overview_has_summary_and_chart() {
    // Given: The synthetic source
    let pipeline = synthetic_pipeline();

    // When: The overview is requested
    let report = pipeline.overview(AS_OF).await;

    // Then: Level, change and chart are consistent
    let overview = report.overview.expect("synthetic overview");
    let first = overview.data.first().expect("points").price;
    assert_eq!(first, 4500.0);
    assert!(overview.summary().starts_with("Current Level: "));
    assert!(report.chart.is_some());
    assert!(report.diagnostics.is_empty());
}

#[tokio::test]
async fn failing_overview_reports_adapter_failure() {
    // Given: A source without overview support
    let pipeline = Pipeline::new(Arc::new(StubSource::returning(Vec::new())));

    // When: The overview is requested
    let report = pipeline.overview(AS_OF).await;

    // Then: The report is empty with one diagnostic
    assert!(report.overview.is_none());
    assert!(report.chart.is_none());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].code(), "pipeline.adapter_failure");
}
