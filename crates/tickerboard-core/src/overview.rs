use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::date::iso_date;
use crate::ValidationError;

/// Index level used for the broad-market summary.
pub const MARKET_INDEX: &str = "^GSPC";

/// One daily index level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverviewPoint {
    #[serde(rename = "Date", with = "iso_date")]
    pub date: Date,
    #[serde(rename = "Price")]
    pub price: f64,
}

/// Direction of the index over the overview window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Bullish,
    Bearish,
}

impl Display for Trend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
        })
    }
}

/// Broad index summary, laid out like `market_overview.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOverview {
    pub current_price: f64,
    pub change: f64,
    pub change_pct: f64,
    pub data: Vec<OverviewPoint>,
}

impl MarketOverview {
    /// Derives level and change from the first and last of `points`, which are
    /// sorted by date first.
    pub fn from_points(mut points: Vec<OverviewPoint>) -> Result<Self, ValidationError> {
        points.sort_by_key(|point| point.date);
        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first.price, last.price),
            _ => return Err(ValidationError::EmptySeries),
        };
        if !first.is_finite() || !last.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "price" });
        }
        if first <= 0.0 {
            return Err(ValidationError::NonPositiveValue { field: "price" });
        }

        let change = last - first;
        Ok(Self {
            current_price: last,
            change,
            change_pct: change / first * 100.0,
            data: points,
        })
    }

    pub fn trend(&self) -> Trend {
        if self.change >= 0.0 {
            Trend::Bullish
        } else {
            Trend::Bearish
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Current Level: {:.2}\n30-Day Change: {:+.2} points ({:+.2}%)\nStatus: {}",
            self.current_price,
            self.change,
            self.change_pct,
            self.trend()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use time::macros::date;

    fn point(date: Date, price: f64) -> OverviewPoint {
        OverviewPoint { date, price }
    }

    #[test]
    fn change_is_last_minus_first() {
        let overview = MarketOverview::from_points(vec![
            point(date!(2024 - 03 - 04), 4_500.0),
            point(date!(2024 - 03 - 01), 4_400.0),
            point(date!(2024 - 03 - 05), 4_512.5),
        ])
        .expect("valid overview");

        assert_relative_eq!(overview.current_price, 4_512.5);
        assert_relative_eq!(overview.change, 112.5);
        assert_relative_eq!(overview.change_pct, 112.5 / 4_400.0 * 100.0);
        assert_eq!(overview.trend(), Trend::Bullish);
    }

    #[test]
    fn falling_index_is_bearish() {
        let overview = MarketOverview::from_points(vec![
            point(date!(2024 - 03 - 01), 4_500.0),
            point(date!(2024 - 03 - 04), 4_450.0),
        ])
        .expect("valid overview");

        assert_eq!(overview.trend(), Trend::Bearish);
        assert_eq!(
            overview.summary(),
            "Current Level: 4450.00\n30-Day Change: -50.00 points (-1.11%)\nStatus: Bearish"
        );
    }

    #[test]
    fn empty_points_are_rejected() {
        let err = MarketOverview::from_points(Vec::new()).expect_err("must fail");
        assert_eq!(err, ValidationError::EmptySeries);
    }

    #[test]
    fn decodes_snapshot_document() {
        let overview: MarketOverview = serde_json::from_str(
            r#"{"current_price":4512.3,"change":12.5,"change_pct":0.28,
                "data":[{"Date":"2024-03-01","Price":4499.8},{"Date":"2024-03-04","Price":4512.3}]}"#,
        )
        .expect("decodes");
        assert_eq!(overview.data.len(), 2);
        assert_eq!(overview.trend(), Trend::Bullish);
    }
}
