//! Raw adapter frames to [`CanonicalTable`].
//!
//! Both frame layouts funnel into the same `(ticker, date)` keyed points, so
//! single- and multi-ticker responses look identical downstream.

use std::collections::{BTreeMap, HashSet};

use time::Date;
use tracing::{debug, warn};

use crate::frame::{ColumnKey, Field, RawFrame, RawRecord, WideFrame};
use crate::{CanonicalTable, Diagnostic, PricePoint, Symbol};

/// Normalizer output.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub table: CanonicalTable,
    /// Observations discarded for a missing, non-finite or non-positive price
    /// or an unrequested or malformed ticker.
    pub dropped: usize,
    /// Requested tickers that ended up with no points.
    pub missing: Vec<Symbol>,
    pub warnings: Vec<String>,
    /// `NoValidData` when every requested ticker is missing.
    pub diagnostic: Option<Diagnostic>,
}

pub fn normalize(frame: RawFrame, requested: &[Symbol]) -> Normalized {
    let mut warnings = Vec::new();
    let (points, dropped) = match frame {
        RawFrame::Records(records) => from_records(records, requested),
        RawFrame::Wide(frame) => from_wide(&frame, requested, &mut warnings),
    };

    let table = CanonicalTable::from_points(points);
    let missing = requested
        .iter()
        .filter(|symbol| !table.contains_ticker(symbol))
        .cloned()
        .collect::<Vec<_>>();

    let diagnostic = if !requested.is_empty() && missing.len() == requested.len() {
        warn!(requested = requested.len(), "no valid data for any requested ticker");
        Some(Diagnostic::NoValidData {
            requested: requested.to_vec(),
        })
    } else {
        None
    };

    debug!(points = table.len(), dropped, "normalized frame");
    Normalized {
        table,
        dropped,
        missing,
        warnings,
        diagnostic,
    }
}

fn valid_price(price: Option<f64>) -> Option<f64> {
    price.filter(|value| value.is_finite() && *value > 0.0)
}

fn volume_count(volume: Option<f64>) -> Option<u64> {
    volume
        .filter(|value| value.is_finite() && *value >= 0.0)
        .map(|value| value.round() as u64)
}

fn from_records(records: Vec<RawRecord>, requested: &[Symbol]) -> (Vec<PricePoint>, usize) {
    let wanted = requested.iter().collect::<HashSet<_>>();
    let mut points = Vec::with_capacity(records.len());
    let mut dropped = 0;

    for record in records {
        let Ok(ticker) = Symbol::parse(&record.ticker) else {
            dropped += 1;
            continue;
        };
        let Some(price) = valid_price(record.price) else {
            dropped += 1;
            continue;
        };
        if !wanted.contains(&ticker) {
            dropped += 1;
            continue;
        }

        points.push(PricePoint {
            date: record.date,
            ticker,
            price,
            volume: volume_count(record.volume),
        });
    }

    (points, dropped)
}

fn from_wide(
    frame: &WideFrame,
    requested: &[Symbol],
    warnings: &mut Vec<String>,
) -> (Vec<PricePoint>, usize) {
    let mut closes: BTreeMap<&Symbol, &[Option<f64>]> = BTreeMap::new();
    let mut volumes: BTreeMap<&Symbol, &[Option<f64>]> = BTreeMap::new();
    let mut ignored_single = false;

    for (key, values) in frame.columns() {
        let ticker = match key {
            ColumnKey::Field(_) => match requested {
                [only] => only,
                _ => {
                    ignored_single = true;
                    continue;
                }
            },
            ColumnKey::Grouped { ticker, .. } => match requested.iter().find(|r| *r == ticker) {
                Some(ticker) => ticker,
                None => continue,
            },
        };
        let target = match key.field() {
            Field::Close => &mut closes,
            Field::Volume => &mut volumes,
        };
        target.entry(ticker).or_insert(values.as_slice());
    }

    if ignored_single {
        warnings.push(String::from(
            "ignored ungrouped columns for a multi-ticker request",
        ));
    }

    let index: &[Date] = frame.index();
    let mut points = Vec::new();
    let mut dropped = 0;

    for (ticker, close) in closes {
        let volume = volumes.get(ticker).copied();
        for (i, date) in index.iter().enumerate() {
            let Some(price) = valid_price(close.get(i).copied().flatten()) else {
                dropped += 1;
                continue;
            };
            points.push(PricePoint {
                date: *date,
                ticker: ticker.clone(),
                price,
                volume: volume_count(volume.and_then(|values| values.get(i).copied().flatten())),
            });
        }
    }

    (points, dropped)
}
