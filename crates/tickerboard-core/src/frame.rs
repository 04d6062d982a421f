//! Raw, adapter-shaped price frames prior to normalization.
//!
//! Adapters hand back whichever layout is natural for their backend:
//! - [`RawFrame::Records`]: a flat list with the ticker on every record
//!   (snapshot documents, synthetic series).
//! - [`RawFrame::Wide`]: a date index with one column per field, or per
//!   `(field, ticker)` pair when several tickers were fetched together.

use std::collections::{BTreeMap, BTreeSet};

use time::Date;

use crate::{Symbol, ValidationError};

/// Value kind held by a wide-frame column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Close,
    Volume,
}

/// Column label of a [`WideFrame`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    /// Single-ticker layout: the ticker is implied by the request.
    Field(Field),
    /// Multi-ticker layout: columns grouped by ticker.
    Grouped { field: Field, ticker: Symbol },
}

impl ColumnKey {
    pub const fn field(&self) -> Field {
        match self {
            Self::Field(field) => *field,
            Self::Grouped { field, .. } => *field,
        }
    }
}

/// Column layout for [`WideFrame::from_series`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLayout {
    /// `Close`/`Volume` columns for a one-ticker request.
    Single,
    /// `(field, ticker)` columns for a multi-ticker request.
    Grouped,
}

impl ColumnLayout {
    /// Layout matching the number of tickers that were requested.
    pub const fn for_request(requested: usize) -> Self {
        if requested > 1 {
            Self::Grouped
        } else {
            Self::Single
        }
    }
}

/// Date-indexed table of optional values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideFrame {
    index: Vec<Date>,
    columns: Vec<(ColumnKey, Vec<Option<f64>>)>,
}

impl WideFrame {
    pub fn new(index: Vec<Date>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    pub fn push_column(
        &mut self,
        key: ColumnKey,
        values: Vec<Option<f64>>,
    ) -> Result<(), ValidationError> {
        if values.len() != self.index.len() {
            return Err(ValidationError::ColumnLengthMismatch {
                len: values.len(),
                expected: self.index.len(),
            });
        }
        self.columns.push((key, values));
        Ok(())
    }

    pub fn with_column(
        mut self,
        key: ColumnKey,
        values: Vec<Option<f64>>,
    ) -> Result<Self, ValidationError> {
        self.push_column(key, values)?;
        Ok(self)
    }

    pub fn index(&self) -> &[Date] {
        &self.index
    }

    pub fn columns(&self) -> &[(ColumnKey, Vec<Option<f64>>)] {
        &self.columns
    }

    pub fn column(&self, key: &ColumnKey) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }

    /// Aligns per-ticker daily series on the union of their dates.
    ///
    /// Missing observations become `None`. Several series under
    /// [`ColumnLayout::Single`] would collide, so they are grouped instead.
    pub fn from_series(series: Vec<TickerSeries>, layout: ColumnLayout) -> Self {
        let index = series
            .iter()
            .flat_map(|s| s.rows.iter().map(|row| row.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        let grouped = layout == ColumnLayout::Grouped || series.len() > 1;
        let mut frame = Self::new(index);

        for TickerSeries { ticker, rows } in series {
            let mut by_date = BTreeMap::new();
            for row in rows {
                by_date.entry(row.date).or_insert(row);
            }

            let close = frame
                .index
                .iter()
                .map(|date| by_date.get(date).and_then(|row| row.close))
                .collect::<Vec<_>>();
            let volume = frame
                .index
                .iter()
                .map(|date| by_date.get(date).and_then(|row| row.volume))
                .collect::<Vec<_>>();

            let (close_key, volume_key) = if grouped {
                (
                    ColumnKey::Grouped {
                        field: Field::Close,
                        ticker: ticker.clone(),
                    },
                    ColumnKey::Grouped {
                        field: Field::Volume,
                        ticker,
                    },
                )
            } else {
                (ColumnKey::Field(Field::Close), ColumnKey::Field(Field::Volume))
            };

            // Lengths match the index by construction.
            frame.columns.push((close_key, close));
            frame.columns.push((volume_key, volume));
        }

        frame
    }
}

/// One row of a per-ticker daily series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesRow {
    pub date: Date,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

/// Daily series for one ticker, as returned by a per-ticker upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerSeries {
    pub ticker: Symbol,
    pub rows: Vec<SeriesRow>,
}

/// Flat record with the ticker still in raw text form.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub date: Date,
    pub ticker: String,
    pub price: Option<f64>,
    pub volume: Option<f64>,
}

/// Adapter output handed to the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub enum RawFrame {
    Records(Vec<RawRecord>),
    Wide(WideFrame),
}

impl RawFrame {
    pub fn empty() -> Self {
        Self::Records(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Records(records) => records.is_empty(),
            Self::Wide(frame) => frame.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn row(date: Date, close: f64) -> SeriesRow {
        SeriesRow {
            date,
            close: Some(close),
            volume: Some(1_000.0),
        }
    }

    fn symbol(value: &str) -> Symbol {
        Symbol::parse(value).expect("valid symbol")
    }

    #[test]
    fn single_series_uses_ungrouped_columns() {
        let frame = WideFrame::from_series(
            vec![TickerSeries {
                ticker: symbol("AAPL"),
                rows: vec![row(date!(2024 - 01 - 02), 180.0)],
            }],
            ColumnLayout::Single,
        );

        assert!(frame.column(&ColumnKey::Field(Field::Close)).is_some());
        assert_eq!(frame.columns().len(), 2);
    }

    #[test]
    fn multiple_series_align_on_union_of_dates() {
        let frame = WideFrame::from_series(
            vec![
                TickerSeries {
                    ticker: symbol("AAPL"),
                    rows: vec![
                        row(date!(2024 - 01 - 02), 180.0),
                        row(date!(2024 - 01 - 03), 181.0),
                    ],
                },
                TickerSeries {
                    ticker: symbol("MSFT"),
                    rows: vec![row(date!(2024 - 01 - 03), 380.0)],
                },
            ],
            ColumnLayout::Grouped,
        );

        assert_eq!(frame.index().len(), 2);
        let msft_close = frame
            .column(&ColumnKey::Grouped {
                field: Field::Close,
                ticker: symbol("MSFT"),
            })
            .expect("grouped column");
        assert_eq!(msft_close, &[None, Some(380.0)]);
    }

    #[test]
    fn grouped_layout_survives_single_surviving_series() {
        let frame = WideFrame::from_series(
            vec![TickerSeries {
                ticker: symbol("MSFT"),
                rows: vec![row(date!(2024 - 01 - 02), 380.0)],
            }],
            ColumnLayout::for_request(2),
        );
        assert!(frame.column(&ColumnKey::Field(Field::Close)).is_none());
        assert!(frame
            .column(&ColumnKey::Grouped {
                field: Field::Close,
                ticker: symbol("MSFT"),
            })
            .is_some());
    }

    #[test]
    fn rejects_misaligned_column() {
        let err = WideFrame::new(vec![date!(2024 - 01 - 02)])
            .with_column(ColumnKey::Field(Field::Close), vec![])
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::ColumnLengthMismatch { .. }));
    }
}
