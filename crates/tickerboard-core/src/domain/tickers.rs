//! Free-text ticker list parsing.

use std::collections::HashSet;

use crate::{Symbol, ValidationError};

/// An entry from the raw ticker string that could not become a [`Symbol`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedTicker {
    pub input: String,
    pub reason: ValidationError,
}

/// Result of lenient ticker parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTickers {
    pub symbols: Vec<Symbol>,
    pub rejected: Vec<RejectedTicker>,
}

impl ParsedTickers {
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Parses a comma-separated ticker string such as `"aapl, googl ,MSFT"`.
///
/// Entries are trimmed and uppercased; empty entries are discarded and the
/// first occurrence of a duplicate wins. Invalid entries are skipped.
pub fn parse_tickers(raw: &str) -> Vec<Symbol> {
    parse_tickers_lenient(raw).symbols
}

/// Same as [`parse_tickers`] but also reports the entries that were rejected.
pub fn parse_tickers_lenient(raw: &str) -> ParsedTickers {
    let mut seen = HashSet::new();
    let mut parsed = ParsedTickers::default();

    for entry in raw.split(',') {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }

        match Symbol::parse(trimmed) {
            Ok(symbol) => {
                if seen.insert(symbol.clone()) {
                    parsed.symbols.push(symbol);
                }
            }
            Err(reason) => parsed.rejected.push(RejectedTicker {
                input: trimmed.to_owned(),
                reason,
            }),
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_strings(symbols: &[Symbol]) -> Vec<&str> {
        symbols.iter().map(Symbol::as_str).collect()
    }

    #[test]
    fn dedupes_case_insensitively_keeping_first() {
        let symbols = parse_tickers("aapl, AAPL , msft");
        assert_eq!(as_strings(&symbols), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn discards_empty_entries() {
        let symbols = parse_tickers(" ,googl,, ,tsla,");
        assert_eq!(as_strings(&symbols), vec!["GOOGL", "TSLA"]);
    }

    #[test]
    fn empty_string_yields_nothing() {
        assert!(parse_tickers("").is_empty());
        assert!(parse_tickers("  ,  ").is_empty());
    }

    #[test]
    fn invalid_entries_are_reported_not_raised() {
        let parsed = parse_tickers_lenient("AAPL, $$$, -XYZ");
        assert_eq!(as_strings(&parsed.symbols), vec!["AAPL"]);
        assert_eq!(parsed.rejected.len(), 2);
        assert_eq!(parsed.rejected[0].input, "$$$");
    }

    #[test]
    fn digit_leading_tickers_are_kept() {
        let symbols = parse_tickers("9988, 0700.hk, BABA");
        assert_eq!(as_strings(&symbols), vec!["9988", "0700.HK", "BABA"]);
    }

    #[test]
    fn output_is_uppercase_and_trimmed() {
        for symbol in parse_tickers("  nvda ,meta,  amzn") {
            assert_eq!(symbol.as_str(), symbol.as_str().trim());
            assert_eq!(symbol.as_str(), symbol.as_str().to_ascii_uppercase());
        }
    }
}
