//! Vega-Lite v5 chart specifications.
//!
//! Only the declarative document is produced here; rendering belongs to
//! whatever Vega-Lite runtime consumes it.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::date::iso_date;
use crate::overview::MarketOverview;
use crate::{join_symbols, CanonicalTable, CoreError, Symbol, ValidationError};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

const PRICE_CHART_WIDTH: u32 = 700;
const PRICE_CHART_HEIGHT: u32 = 400;
const OVERVIEW_CHART_WIDTH: u32 = 600;
const OVERVIEW_CHART_HEIGHT: u32 = 250;
const RISING_COLOR: &str = "#2E8B57";
const FALLING_COLOR: &str = "#DC143C";

/// Visual style of the price chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    #[default]
    Line,
    Area,
    /// Accepted for compatibility; drawn as a plain line since only closing
    /// prices are carried.
    Candlestick,
}

impl ChartStyle {
    pub const ALL: [Self; 3] = [Self::Line, Self::Area, Self::Candlestick];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Area => "area",
            Self::Candlestick => "candlestick",
        }
    }
}

impl Display for ChartStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartStyle {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "area" => Ok(Self::Area),
            "candlestick" => Ok(Self::Candlestick),
            _ => Err(ValidationError::InvalidChartStyle {
                value: value.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub data: InlineData,
    #[serde(flatten)]
    pub view: View,
}

impl ChartSpec {
    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Mark types in layer order.
    pub fn mark_types(&self) -> Vec<MarkType> {
        match &self.view {
            View::Single(layer) => vec![layer.mark.kind],
            View::Layered { layer, .. } => layer.iter().map(|l| l.mark.kind).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineData {
    pub values: Vec<ChartDatum>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDatum {
    #[serde(rename = "Date", with = "iso_date")]
    pub date: Date,
    #[serde(rename = "Ticker", skip_serializing_if = "Option::is_none")]
    pub ticker: Option<Symbol>,
    #[serde(rename = "Price")]
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum View {
    Single(Layer),
    Layered { layer: Vec<Layer>, resolve: Resolve },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub mark: Mark,
    pub encoding: Encoding,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Line,
    Area,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

impl Mark {
    const fn new(kind: MarkType) -> Self {
        Self {
            kind,
            point: None,
            stroke_width: None,
            opacity: None,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Encoding {
    pub x: Channel,
    pub y: Channel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Channel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tooltip: Vec<FieldRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Temporal,
    Quantitative,
    Nominal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    pub field: &'static str,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
}

impl Channel {
    const fn new(field: &'static str, kind: FieldType) -> Self {
        Self {
            field,
            kind,
            title: None,
            scale: None,
        }
    }

    fn titled(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    fn scaled(mut self, scale: Scale) -> Self {
        self.scale = Some(scale);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scale {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRef {
    pub field: &'static str,
    #[serde(rename = "type")]
    pub kind: FieldType,
}

/// Interval selection bound to the scales (pan and zoom).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: &'static str,
    pub select: &'static str,
    pub bind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolve {
    pub scale: ResolveScale,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveScale {
    pub y: &'static str,
}

fn price_tooltip(with_ticker: bool) -> Vec<FieldRef> {
    let mut tooltip = vec![FieldRef {
        field: "Date",
        kind: FieldType::Temporal,
    }];
    if with_ticker {
        tooltip.push(FieldRef {
            field: "Ticker",
            kind: FieldType::Nominal,
        });
    }
    tooltip.push(FieldRef {
        field: "Price",
        kind: FieldType::Quantitative,
    });
    tooltip
}

/// Multi-series price chart for `tickers`, or `None` for an empty table.
pub fn build_chart(
    table: &CanonicalTable,
    tickers: &[Symbol],
    style: ChartStyle,
) -> Option<ChartSpec> {
    if table.is_empty() {
        return None;
    }

    let mark = match style {
        ChartStyle::Line => Mark {
            point: Some(true),
            stroke_width: Some(2.0),
            ..Mark::new(MarkType::Line)
        },
        ChartStyle::Area => Mark {
            opacity: Some(0.7),
            ..Mark::new(MarkType::Area)
        },
        ChartStyle::Candlestick => Mark {
            stroke_width: Some(2.0),
            ..Mark::new(MarkType::Line)
        },
    };

    let values = table
        .iter()
        .map(|point| ChartDatum {
            date: point.date,
            ticker: Some(point.ticker.clone()),
            price: point.price,
        })
        .collect();

    Some(ChartSpec {
        schema: VEGA_LITE_SCHEMA,
        title: format!("Stock Price Analysis - {}", join_symbols(tickers)),
        width: PRICE_CHART_WIDTH,
        height: PRICE_CHART_HEIGHT,
        data: InlineData { values },
        view: View::Single(Layer {
            mark,
            encoding: Encoding {
                x: Channel::new("Date", FieldType::Temporal).titled("Date"),
                y: Channel::new("Price", FieldType::Quantitative).titled("Price ($)"),
                color: Some(
                    Channel::new("Ticker", FieldType::Nominal)
                        .titled("Stock")
                        .scaled(Scale {
                            scheme: Some("category10"),
                            ..Scale::default()
                        }),
                ),
                tooltip: price_tooltip(true),
            },
            params: vec![Param {
                name: "grid",
                select: "interval",
                bind: "scales",
            }],
        }),
    })
}

/// Layered area and line chart of the index level, coloured by direction.
pub fn build_overview_chart(overview: &MarketOverview) -> Option<ChartSpec> {
    if overview.data.is_empty() {
        return None;
    }

    let color = if overview.change >= 0.0 {
        RISING_COLOR
    } else {
        FALLING_COLOR
    };
    let unzeroed = || Scale {
        zero: Some(false),
        ..Scale::default()
    };

    let area = Layer {
        mark: Mark {
            opacity: Some(0.3),
            color: Some(color),
            ..Mark::new(MarkType::Area)
        },
        encoding: Encoding {
            x: Channel::new("Date", FieldType::Temporal),
            y: Channel::new("Price", FieldType::Quantitative).scaled(unzeroed()),
            color: None,
            tooltip: Vec::new(),
        },
        params: Vec::new(),
    };
    let line = Layer {
        mark: Mark {
            stroke_width: Some(3.0),
            color: Some(color),
            ..Mark::new(MarkType::Line)
        },
        encoding: Encoding {
            x: Channel::new("Date", FieldType::Temporal).titled("Date"),
            y: Channel::new("Price", FieldType::Quantitative)
                .titled("S&P 500 Index")
                .scaled(unzeroed()),
            color: None,
            tooltip: price_tooltip(false),
        },
        params: Vec::new(),
    };

    Some(ChartSpec {
        schema: VEGA_LITE_SCHEMA,
        title: String::from("S&P 500 Index - Last 30 Days"),
        width: OVERVIEW_CHART_WIDTH,
        height: OVERVIEW_CHART_HEIGHT,
        data: InlineData {
            values: overview
                .data
                .iter()
                .map(|point| ChartDatum {
                    date: point.date,
                    ticker: None,
                    price: point.price,
                })
                .collect(),
        },
        view: View::Layered {
            layer: vec![area, line],
            resolve: Resolve {
                scale: ResolveScale { y: "shared" },
            },
        },
    })
}
