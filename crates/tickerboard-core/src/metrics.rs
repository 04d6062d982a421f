//! Per-ticker descriptive statistics.

use serde::Serialize;

use crate::{CanonicalTable, PricePoint, Symbol};

/// Trading days per year used to annualize volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    pub ticker: Symbol,
    pub current_price: f64,
    pub first_price: f64,
    pub total_return_pct: f64,
    pub volatility_pct: f64,
    pub price_range_pct: f64,
    pub high: f64,
    pub low: f64,
    pub avg_volume: Option<f64>,
    pub observations: usize,
}

/// Display strings, keyed the way the dashboard table labels them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsDisplay {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Current Price")]
    pub current_price: String,
    #[serde(rename = "Total Return")]
    pub total_return: String,
    #[serde(rename = "Volatility")]
    pub volatility: String,
    #[serde(rename = "Price Range")]
    pub price_range: String,
    #[serde(rename = "High")]
    pub high: String,
    #[serde(rename = "Low")]
    pub low: String,
    #[serde(rename = "Avg Daily Volume")]
    pub avg_volume: String,
}

impl MetricsDisplay {
    pub const HEADERS: [&'static str; 8] = [
        "Ticker",
        "Current Price",
        "Total Return",
        "Volatility",
        "Price Range",
        "High",
        "Low",
        "Avg Daily Volume",
    ];

    pub fn cells(&self) -> [&str; 8] {
        [
            &self.ticker,
            &self.current_price,
            &self.total_return,
            &self.volatility,
            &self.price_range,
            &self.high,
            &self.low,
            &self.avg_volume,
        ]
    }
}

impl MetricsRow {
    /// Computes the row for one date-ordered series; `None` below two points.
    pub fn from_series(ticker: &Symbol, series: &[PricePoint]) -> Option<Self> {
        let (first, last) = match series {
            [first, .., last] => (first.price, last.price),
            _ => return None,
        };

        let high = series
            .iter()
            .map(|point| point.price)
            .fold(f64::NEG_INFINITY, f64::max);
        let low = series
            .iter()
            .map(|point| point.price)
            .fold(f64::INFINITY, f64::min);

        let returns = series
            .windows(2)
            .map(|pair| pair[1].price / pair[0].price - 1.0)
            .collect::<Vec<_>>();

        let volumes = series
            .iter()
            .filter_map(|point| point.volume)
            .collect::<Vec<_>>();
        let avg_volume = (!volumes.is_empty())
            .then(|| volumes.iter().map(|v| *v as f64).sum::<f64>() / volumes.len() as f64);

        Some(Self {
            ticker: ticker.clone(),
            current_price: last,
            first_price: first,
            total_return_pct: (last - first) / first * 100.0,
            volatility_pct: sample_std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt() * 100.0,
            price_range_pct: (high - low) / low * 100.0,
            high,
            low,
            avg_volume,
            observations: series.len(),
        })
    }

    pub fn display(&self) -> MetricsDisplay {
        MetricsDisplay {
            ticker: self.ticker.to_string(),
            current_price: format_dollars(self.current_price),
            total_return: format!("{:+.2}%", self.total_return_pct),
            volatility: format!("{:.2}%", self.volatility_pct),
            price_range: format!("{:.2}%", self.price_range_pct),
            high: format_dollars(self.high),
            low: format_dollars(self.low),
            avg_volume: match self.avg_volume {
                Some(volume) if volume > 0.0 => group_thousands(volume.round() as u64),
                _ => String::from("N/A"),
            },
        }
    }
}

/// Metrics for each ticker in order; tickers with fewer than two points are
/// skipped and an empty table gives an empty result.
pub fn compute_metrics(table: &CanonicalTable, tickers: &[Symbol]) -> Vec<MetricsRow> {
    tickers
        .iter()
        .filter_map(|ticker| MetricsRow::from_series(ticker, table.series(ticker)))
        .collect()
}

/// Bessel-corrected standard deviation; 0 below two samples.
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);
    variance.sqrt()
}

fn format_dollars(value: f64) -> String {
    format!("${value:.2}")
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use time::macros::date;
    use time::Date;

    fn point(date: Date, price: f64, volume: Option<u64>) -> PricePoint {
        PricePoint {
            date,
            ticker: Symbol::parse("AAPL").expect("valid"),
            price,
            volume,
        }
    }

    #[test]
    fn computes_return_range_and_extremes() {
        let ticker = Symbol::parse("AAPL").expect("valid");
        let row = MetricsRow::from_series(
            &ticker,
            &[
                point(date!(2024 - 01 - 02), 100.0, Some(1_000)),
                point(date!(2024 - 01 - 03), 120.0, Some(3_000)),
                point(date!(2024 - 01 - 04), 110.0, None),
            ],
        )
        .expect("two or more points");

        assert_relative_eq!(row.total_return_pct, 10.0);
        assert_relative_eq!(row.price_range_pct, 20.0);
        assert_relative_eq!(row.high, 120.0);
        assert_relative_eq!(row.low, 100.0);
        assert_eq!(row.avg_volume, Some(2_000.0));
        assert_eq!(row.observations, 3);
    }

    #[test]
    fn single_return_has_zero_volatility() {
        let ticker = Symbol::parse("AAPL").expect("valid");
        let row = MetricsRow::from_series(
            &ticker,
            &[
                point(date!(2024 - 01 - 02), 100.0, None),
                point(date!(2024 - 01 - 03), 101.0, None),
            ],
        )
        .expect("two points");

        assert_eq!(row.volatility_pct, 0.0);
        assert_eq!(row.avg_volume, None);
    }

    #[test]
    fn one_point_is_skipped() {
        let ticker = Symbol::parse("AAPL").expect("valid");
        let single = [point(date!(2024 - 01 - 02), 100.0, None)];
        assert!(MetricsRow::from_series(&ticker, &single).is_none());
    }

    #[test]
    fn display_formats_sign_dollars_and_thousands() {
        let row = MetricsRow {
            ticker: Symbol::parse("AAPL").expect("valid"),
            current_price: 189.234,
            first_price: 168.0,
            total_return_pct: 12.344,
            volatility_pct: 23.456,
            price_range_pct: 8.9,
            high: 190.0,
            low: 165.5,
            avg_volume: Some(1_234_567.4),
            observations: 60,
        };
        let display = row.display();

        assert_eq!(display.current_price, "$189.23");
        assert_eq!(display.total_return, "+12.34%");
        assert_eq!(display.volatility, "23.46%");
        assert_eq!(display.price_range, "8.90%");
        assert_eq!(display.low, "$165.50");
        assert_eq!(display.avg_volume, "1,234,567");

        let falling = MetricsRow {
            total_return_pct: -3.5,
            avg_volume: None,
            ..row
        }
        .display();
        assert_eq!(falling.total_return, "-3.50%");
        assert_eq!(falling.avg_volume, "N/A");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(12_345_678), "12,345,678");
    }
}
