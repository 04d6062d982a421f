use std::future::Future;
use std::pin::Pin;

use rand::distributions::OpenClosed01;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use time::{Date, Duration};

use crate::data_source::{DataSource, PriceRequest, SourceBatch, SourceError};
use crate::domain::date::is_trading_day;
use crate::frame::{RawFrame, RawRecord};
use crate::overview::{MarketOverview, OverviewPoint, MARKET_INDEX};
use crate::{Period, SourceKind, ValidationError};

pub const DEFAULT_VOLATILITY: f64 = 0.02;
pub const DEFAULT_PRICE_FLOOR: f64 = 0.01;
const INDEX_BASE_PRICE: f64 = 4_500.0;
const VOLUME_MIN: u64 = 1_000_000;
const VOLUME_SPAN: u64 = 49_000_000;

/// Parameters of the seeded random walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticConfig {
    /// Standard deviation of the daily multiplicative shock.
    pub volatility: f64,
    /// XOR-ed into every per-ticker seed.
    pub base_seed: u64,
    pub price_floor: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            volatility: DEFAULT_VOLATILITY,
            base_seed: 0,
            price_floor: DEFAULT_PRICE_FLOOR,
        }
    }
}

impl SyntheticConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.volatility.is_finite() {
            return Err(ValidationError::NonFiniteValue {
                field: "volatility",
            });
        }
        if self.volatility < 0.0 {
            return Err(ValidationError::NonPositiveValue {
                field: "volatility",
            });
        }
        if !self.price_floor.is_finite() {
            return Err(ValidationError::NonFiniteValue {
                field: "price_floor",
            });
        }
        if self.price_floor <= 0.0 {
            return Err(ValidationError::NonPositiveValue {
                field: "price_floor",
            });
        }
        Ok(())
    }
}

/// Portable string hash: `h = h * 33 + byte` over the UTF-8 bytes, wrapping.
pub fn symbol_seed(symbol: &str) -> u64 {
    symbol
        .bytes()
        .fold(0_u64, |acc, byte| acc.wrapping_mul(33).wrapping_add(u64::from(byte)))
}

/// Starting price for a ticker's series.
pub fn base_price(symbol: &str) -> f64 {
    match symbol {
        "AAPL" => 180.0,
        "GOOGL" => 140.0,
        "MSFT" => 380.0,
        "AMZN" => 150.0,
        "TSLA" => 250.0,
        "NVDA" => 450.0,
        "META" => 320.0,
        other => 50.0 + (symbol_seed(other) % 450) as f64,
    }
}

/// One `Normal(0, sigma)` draw by Box-Muller over two uniform draws.
fn normal_shock(rng: &mut ChaCha8Rng, sigma: f64) -> f64 {
    let radius: f64 = rng.sample(OpenClosed01);
    let angle: f64 = rng.gen();
    sigma * (-2.0 * radius.ln()).sqrt() * (std::f64::consts::TAU * angle).cos()
}

/// Deterministic offline strategy: a seeded multiplicative random walk per
/// ticker over the weekdays of the request window.
///
/// The stream comes from ChaCha8, a fixed algorithm, and every draw is
/// spelled out here, so a ticker's series is the same on every platform and
/// release.
#[derive(Debug, Clone, Default)]
pub struct SyntheticSource {
    config: SyntheticConfig,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub const fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    /// `(date, price, volume)` for every trading day in `[start, end]`.
    pub fn series(
        &self,
        symbol: &str,
        base: f64,
        start: Date,
        end: Date,
    ) -> Vec<(Date, f64, u64)> {
        let mut rng = ChaCha8Rng::seed_from_u64(symbol_seed(symbol) ^ self.config.base_seed);

        let mut rows = Vec::new();
        let mut price = base;
        let mut day = start;
        while day <= end {
            if is_trading_day(day) {
                if !rows.is_empty() {
                    let epsilon = normal_shock(&mut rng, self.config.volatility);
                    price = (price * (1.0 + epsilon)).max(self.config.price_floor);
                }
                let volume = VOLUME_MIN + rng.next_u64() % VOLUME_SPAN;
                rows.push((day, price, volume));
            }
            day = match day.checked_add(Duration::days(1)) {
                Some(next) => next,
                None => break,
            };
        }
        rows
    }
}

impl DataSource for SyntheticSource {
    fn id(&self) -> SourceKind {
        SourceKind::Synthetic
    }

    fn fetch<'a>(
        &'a self,
        req: &'a PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SourceBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let (start, end) = req.window();
            let mut records = Vec::new();

            for symbol in &req.symbols {
                let ticker = symbol.as_str();
                for (date, price, volume) in self.series(ticker, base_price(ticker), start, end) {
                    records.push(RawRecord {
                        date,
                        ticker: ticker.to_owned(),
                        price: Some(price),
                        volume: Some(volume as f64),
                    });
                }
            }

            Ok(SourceBatch::new(RawFrame::Records(records)))
        })
    }

    fn market_overview<'a>(
        &'a self,
        as_of: Date,
    ) -> Pin<Box<dyn Future<Output = Result<MarketOverview, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let (start, end) = Period::OneMonth.window(as_of);
            let points = self
                .series(MARKET_INDEX, INDEX_BASE_PRICE, start, end)
                .into_iter()
                .map(|(date, price, _)| OverviewPoint { date, price })
                .collect();
            MarketOverview::from_points(points)
                .map_err(|e| SourceError::internal(format!("synthetic overview failed: {e}")))
        })
    }
}
