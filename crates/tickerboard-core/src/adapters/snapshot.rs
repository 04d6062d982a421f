use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::Date;
use tracing::{debug, warn};

use crate::data_source::{DataInfo, DataSource, PriceRequest, SourceBatch, SourceError};
use crate::domain::date::iso_date;
use crate::frame::{RawFrame, RawRecord};
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::overview::MarketOverview;
use crate::SourceKind;

pub const STOCK_DATA_DOCUMENT: &str = "stock_data.json";
pub const LAST_UPDATED_DOCUMENT: &str = "last_updated.json";
pub const MARKET_OVERVIEW_DOCUMENT: &str = "market_overview.json";

/// One way of reading a named snapshot document.
pub trait SnapshotLoader: Send + Sync {
    /// Short label used in logs and failure reports.
    fn describe(&self) -> String;

    fn load<'a>(
        &'a self,
        document: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, SourceError>> + Send + 'a>>;
}

/// Reads documents relative to a base URL.
pub struct HttpSnapshotLoader {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl HttpSnapshotLoader {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl SnapshotLoader for HttpSnapshotLoader {
    fn describe(&self) -> String {
        format!("http {}", self.base_url)
    }

    fn load<'a>(
        &'a self,
        document: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{}/{document}", self.base_url);
            let request = HttpRequest::get(&url).with_timeout_ms(self.timeout_ms);
            let response = self
                .http_client
                .execute(request)
                .await
                .map_err(|e| SourceError::unavailable(e.message().to_owned()))?;
            if !response.is_success() {
                return Err(SourceError::unavailable(format!(
                    "HTTP {} for {url}",
                    response.status
                )));
            }
            Ok(response.body)
        })
    }
}

/// Reads documents from a local directory.
pub struct DirSnapshotLoader {
    dir: PathBuf,
}

impl DirSnapshotLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SnapshotLoader for DirSnapshotLoader {
    fn describe(&self) -> String {
        format!("dir {}", self.dir.display())
    }

    fn load<'a>(
        &'a self,
        document: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let path = self.dir.join(document);
            tokio::fs::read_to_string(&path).await.map_err(|e| {
                SourceError::unavailable(format!("cannot read {}: {e}", path.display()))
            })
        })
    }
}

/// Pre-generated JSON snapshot strategy.
///
/// Each document is read through the loaders in order; the first success
/// wins and later loaders are only consulted after a failure.
#[derive(Clone, Default)]
pub struct SnapshotSource {
    loaders: Vec<Arc<dyn SnapshotLoader>>,
}

impl SnapshotSource {
    pub fn new(loaders: Vec<Arc<dyn SnapshotLoader>>) -> Self {
        Self { loaders }
    }

    pub fn with_loader(mut self, loader: Arc<dyn SnapshotLoader>) -> Self {
        self.loaders.push(loader);
        self
    }

    pub fn loaders(&self) -> &[Arc<dyn SnapshotLoader>] {
        &self.loaders
    }

    async fn load_document(&self, document: &str) -> Result<String, SourceError> {
        let mut errors = Vec::new();

        for loader in &self.loaders {
            let label = loader.describe();
            debug!(loader = %label, document, "loading snapshot document");
            match loader.load(document).await {
                Ok(body) => return Ok(body),
                Err(error) => {
                    debug!(loader = %label, %error, "snapshot loader failed");
                    errors.push(format!("{label}: {}", error.message()));
                }
            }
        }

        if errors.is_empty() {
            return Err(SourceError::internal("no snapshot loaders configured"));
        }
        Err(SourceError::unavailable(format!(
            "all snapshot loaders failed for {document}: {}",
            errors.join("; ")
        )))
    }

    async fn load_info(&self) -> Result<DataInfo, SourceError> {
        let body = self.load_document(LAST_UPDATED_DOCUMENT).await?;
        serde_json::from_str(&body)
            .map_err(|e| SourceError::decode(format!("invalid {LAST_UPDATED_DOCUMENT}: {e}")))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SnapshotRecord {
    #[serde(rename = "Date", with = "iso_date")]
    date: Date,
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "Price", default)]
    price: Option<f64>,
    #[serde(rename = "Volume", default)]
    volume: Option<f64>,
}

fn parse_records(body: &str) -> Result<Vec<SnapshotRecord>, SourceError> {
    serde_json::from_str(body)
        .map_err(|e| SourceError::decode(format!("invalid {STOCK_DATA_DOCUMENT}: {e}")))
}

impl DataSource for SnapshotSource {
    fn id(&self) -> SourceKind {
        SourceKind::Snapshot
    }

    fn fetch<'a>(
        &'a self,
        req: &'a PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SourceBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let records = parse_records(&self.load_document(STOCK_DATA_DOCUMENT).await?)?;

            let present = records
                .iter()
                .map(|record| record.ticker.trim().to_ascii_uppercase())
                .collect::<HashSet<_>>();
            let available = req
                .symbols
                .iter()
                .filter(|symbol| present.contains(symbol.as_str()))
                .map(|symbol| symbol.as_str().to_owned())
                .collect::<HashSet<_>>();
            if available.is_empty() {
                return Err(SourceError::not_found(
                    "no data available for requested tickers",
                ));
            }

            let (start, end) = req.window();
            let filtered = records
                .into_iter()
                .filter(|record| record.date >= start && record.date <= end)
                .filter_map(|record| {
                    let ticker = record.ticker.trim().to_ascii_uppercase();
                    available.contains(&ticker).then_some(RawRecord {
                        date: record.date,
                        ticker,
                        price: record.price,
                        volume: record.volume,
                    })
                })
                .collect::<Vec<_>>();

            let mut warnings = Vec::new();
            let info = match self.load_info().await {
                Ok(info) => {
                    if let Some(error) = &info.error {
                        warnings.push(format!("snapshot reports an error: {error}"));
                    }
                    Some(info)
                }
                Err(error) => {
                    warn!(%error, "snapshot provenance unavailable");
                    warnings.push(format!("snapshot provenance unavailable: {}", error.message()));
                    None
                }
            };

            let mut batch = SourceBatch::new(RawFrame::Records(filtered)).with_warnings(warnings);
            if let Some(info) = info {
                batch = batch.with_info(info);
            }
            Ok(batch)
        })
    }

    fn market_overview<'a>(
        &'a self,
        _as_of: Date,
    ) -> Pin<Box<dyn Future<Output = Result<MarketOverview, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let body = self.load_document(MARKET_OVERVIEW_DOCUMENT).await?;
            serde_json::from_str(&body).map_err(|e| {
                SourceError::decode(format!("invalid {MARKET_OVERVIEW_DOCUMENT}: {e}"))
            })
        })
    }
}
