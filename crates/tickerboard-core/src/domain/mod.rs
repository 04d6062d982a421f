//! # Domain Models
//!
//! Canonical domain types shared by every stage of the pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, uppercase ticker |
//! | [`Period`] | Trailing request window (1M .. 5Y) |
//! | [`PricePoint`] | One daily price for one ticker |
//! | [`CanonicalTable`] | Sorted, deduplicated set of price points |
//!
//! Ticker strings typed by a user go through [`parse_tickers`]; period labels
//! go through [`Period::resolve`], which never fails.

pub mod date;
mod period;
mod price;
mod symbol;
mod tickers;

pub use period::Period;
pub use price::{CanonicalTable, PricePoint};
pub use symbol::{join_symbols, Symbol};
pub use tickers::{parse_tickers, parse_tickers_lenient, ParsedTickers, RejectedTicker};
