//! Shared fixtures for the tickerboard behavior tests.

use time::macros::date;
use time::Date;

pub use tickerboard_core::Symbol;

/// Fixed "today" for every behavior test; a Friday.
pub const AS_OF: Date = date!(2024 - 03 - 15);

pub fn symbol(value: &str) -> Symbol {
    Symbol::parse(value).expect("valid symbol")
}

pub fn symbols(values: &[&str]) -> Vec<Symbol> {
    values.iter().map(|value| symbol(value)).collect()
}
