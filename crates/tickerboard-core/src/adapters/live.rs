use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::Date;
use tracing::{debug, warn};

use crate::data_source::{DataSource, PriceRequest, SourceBatch, SourceError};
use crate::domain::date::date_from_unix_seconds;
use crate::frame::{ColumnLayout, RawFrame, SeriesRow, TickerSeries, WideFrame};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::overview::{MarketOverview, OverviewPoint, MARKET_INDEX};
use crate::{Period, SourceKind};

pub const DEFAULT_CHART_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Remote chart API strategy.
///
/// Issues exactly one request per ticker per fetch, with no retry. Tickers
/// that fail are reported as warnings; the fetch fails only if all do.
#[derive(Clone)]
pub struct LiveSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for LiveSource {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::default()))
    }
}

impl LiveSource {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_CHART_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn chart_endpoint(&self, symbol: &str, range: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url,
            urlencoding::encode(symbol),
            range
        )
    }

    async fn fetch_chart(&self, symbol: &str, range: &str) -> Result<Vec<SeriesRow>, SourceError> {
        let endpoint = self.chart_endpoint(symbol, range);
        debug!(%endpoint, "requesting daily chart");

        let request = HttpRequest::get(&endpoint)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("chart transport error for {symbol}: {}", e.message()))
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "chart API returned status {} for {symbol}",
                response.status
            )));
        }

        parse_chart_rows(symbol, &response.body)
    }
}

fn parse_chart_rows(symbol: &str, body: &str) -> Result<Vec<SeriesRow>, SourceError> {
    let chart_response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::decode(format!("failed to parse chart for {symbol}: {e}")))?;

    if let Some(error) = chart_response.chart.error.filter(|e| !e.is_null()) {
        return Err(SourceError::not_found(format!(
            "chart API error for {symbol}: {error}"
        )));
    }

    let result = chart_response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::not_found(format!("no chart data for {symbol}")))?;

    // Timestamps mark the session open; shift into exchange-local time so
    // markets that open before midnight UTC keep their trading date.
    let gmt_offset = result.meta.and_then(|meta| meta.gmtoffset).unwrap_or(0);
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut rows = Vec::with_capacity(timestamps.len());
    for (i, &seconds) in timestamps.iter().enumerate() {
        let date = date_from_unix_seconds(seconds.saturating_add(gmt_offset))
            .map_err(|e| SourceError::decode(format!("invalid timestamp for {symbol}: {e}")))?;
        rows.push(SeriesRow {
            date,
            close: quote.close.get(i).copied().flatten(),
            volume: quote
                .volume
                .get(i)
                .copied()
                .flatten()
                .map(|volume| volume as f64),
        });
    }

    if rows.is_empty() {
        return Err(SourceError::not_found(format!("no chart data for {symbol}")));
    }
    Ok(rows)
}

fn clip_to_window(
    symbol: &str,
    rows: Vec<SeriesRow>,
    start: Date,
    end: Date,
) -> Result<Vec<SeriesRow>, SourceError> {
    let total = rows.len();
    let rows = rows
        .into_iter()
        .filter(|row| row.date >= start && row.date <= end)
        .collect::<Vec<_>>();

    if rows.is_empty() {
        return Err(SourceError::not_found(format!(
            "no chart data for {symbol} between {start} and {end}"
        )));
    }
    if rows.len() < total {
        debug!(
            symbol,
            clipped = total - rows.len(),
            "dropped rows outside the request window"
        );
    }
    Ok(rows)
}

impl DataSource for LiveSource {
    fn id(&self) -> SourceKind {
        SourceKind::Live
    }

    fn fetch<'a>(
        &'a self,
        req: &'a PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SourceBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let range = req.period.vendor_range();
            let (start, end) = req.window();
            let mut series = Vec::with_capacity(req.symbols.len());
            let mut warnings = Vec::new();

            for symbol in &req.symbols {
                // Vendor ranges are calendar based and ignore `as_of`.
                let fetched = self
                    .fetch_chart(symbol.as_str(), range)
                    .await
                    .and_then(|rows| clip_to_window(symbol.as_str(), rows, start, end));
                match fetched {
                    Ok(rows) => series.push(TickerSeries {
                        ticker: symbol.clone(),
                        rows,
                    }),
                    Err(error) => {
                        warn!(ticker = %symbol, %error, "live fetch failed");
                        warnings.push(error.message().to_owned());
                    }
                }
            }

            if series.is_empty() {
                return Err(SourceError::unavailable(format!(
                    "failed to fetch any requested ticker: {}",
                    warnings.join("; ")
                )));
            }

            let frame = WideFrame::from_series(
                series,
                ColumnLayout::for_request(req.symbols.len()),
            );
            Ok(SourceBatch::new(RawFrame::Wide(frame)).with_warnings(warnings))
        })
    }

    fn market_overview<'a>(
        &'a self,
        as_of: Date,
    ) -> Pin<Box<dyn Future<Output = Result<MarketOverview, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let (start, _) = Period::OneMonth.window(as_of);
            let rows = self
                .fetch_chart(MARKET_INDEX, Period::OneMonth.vendor_range())
                .await?;
            let points = rows
                .into_iter()
                .filter(|row| row.date >= start && row.date <= as_of)
                .filter_map(|row| {
                    row.close
                        .filter(|price| price.is_finite() && *price > 0.0)
                        .map(|price| OverviewPoint {
                            date: row.date,
                            price,
                        })
                })
                .collect::<Vec<_>>();

            MarketOverview::from_points(points).map_err(|e| {
                SourceError::not_found(format!("market overview unavailable: {e}"))
            })
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}
