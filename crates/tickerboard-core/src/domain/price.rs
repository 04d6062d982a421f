use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::date::iso_date;
use crate::{Symbol, ValidationError};

/// One daily observation for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(rename = "Date", with = "iso_date")]
    pub date: Date,
    #[serde(rename = "Ticker")]
    pub ticker: Symbol,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Volume", default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl PricePoint {
    pub fn new(
        date: Date,
        ticker: Symbol,
        price: f64,
        volume: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validate_price(price)?;
        Ok(Self {
            date,
            ticker,
            price,
            volume,
        })
    }

    fn is_valid(&self) -> bool {
        validate_price(self.price).is_ok()
    }
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::NonFiniteValue { field: "price" });
    }
    if price <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field: "price" });
    }
    Ok(())
}

/// The single hand-off format between acquisition and every consumer.
///
/// Invariants, enforced on construction:
/// - sorted by `(ticker, date)` ascending
/// - no two points share `(ticker, date)`; the first occurrence is kept
/// - every price is positive and finite
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalTable {
    points: Vec<PricePoint>,
}

impl CanonicalTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut points = points
            .into_iter()
            .filter(PricePoint::is_valid)
            .collect::<Vec<_>>();

        // Stable sort keeps input order among equal keys, so dedup keeps the first.
        points.sort_by(|left, right| {
            left.ticker
                .cmp(&right.ticker)
                .then_with(|| left.date.cmp(&right.date))
        });
        points.dedup_by(|later, earlier| {
            later.ticker == earlier.ticker && later.date == earlier.date
        });

        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    pub fn into_points(self) -> Vec<PricePoint> {
        self.points
    }

    /// Distinct tickers in table order.
    pub fn tickers(&self) -> Vec<Symbol> {
        let mut tickers: Vec<Symbol> = Vec::new();
        for point in &self.points {
            if tickers.last() != Some(&point.ticker) {
                tickers.push(point.ticker.clone());
            }
        }
        tickers
    }

    pub fn contains_ticker(&self, ticker: &Symbol) -> bool {
        !self.series(ticker).is_empty()
    }

    /// Date-ordered points for one ticker.
    pub fn series(&self, ticker: &Symbol) -> &[PricePoint] {
        let start = self.points.partition_point(|point| point.ticker < *ticker);
        let end = self.points.partition_point(|point| point.ticker <= *ticker);
        &self.points[start..end]
    }

    /// Points whose date falls within `[start, end]`.
    pub fn filter_window(&self, start: Date, end: Date) -> Self {
        Self {
            points: self
                .points
                .iter()
                .filter(|point| point.date >= start && point.date <= end)
                .cloned()
                .collect(),
        }
    }
}
