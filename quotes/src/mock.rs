//! Mock quote source for testing: implements `QuoteGateway` and `RateSource`
//! with configurable prices, rates, and search hits.
//!
//! Use this in integration tests to simulate market data without network calls.
//!
//! ```
//! use folio::{Currency, Symbol};
//! use folio_quotes::mock::MockQuotes;
//! use folio_quotes::{QuoteGateway, RateSource};
//!
//! let quotes = MockQuotes::builder()
//!     .with_price(Symbol::new("AAPL"), 189.84)
//!     .with_rate(Currency::USD, Currency::CAD, 1.37)
//!     .failing(Symbol::new("ZZZZ"))
//!     .build();
//!
//! assert_eq!(quotes.quote(&Symbol::new("AAPL")).unwrap().price, 189.84);
//! assert!(quotes.quote(&Symbol::new("ZZZZ")).is_err());
//! assert_eq!(quotes.rate(&Currency::USD, &Currency::CAD).unwrap(), 1.37);
//! ```

use std::sync::Mutex;

use folio::{Currency, Symbol};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::QuoteError;
use crate::types::{Quote, SearchHit};
use crate::{QuoteGateway, RateSource};

/// Builder for `MockQuotes`.
#[derive(Default)]
pub struct MockQuotesBuilder {
    prices: FxHashMap<Symbol, f64>,
    rates: FxHashMap<(Currency, Currency), f64>,
    hits: Vec<SearchHit>,
    failing: FxHashSet<Symbol>,
}

impl MockQuotesBuilder {
    pub fn with_price(mut self, symbol: Symbol, price: f64) -> Self {
        self.prices.insert(symbol, price);
        self
    }

    pub fn with_rate(mut self, from: Currency, to: Currency, rate: f64) -> Self {
        self.rates.insert((from, to), rate);
        self
    }

    pub fn with_hit(mut self, hit: SearchHit) -> Self {
        self.hits.push(hit);
        self
    }

    /// Quotes for `symbol` fail with [`QuoteError::Unavailable`].
    pub fn failing(mut self, symbol: Symbol) -> Self {
        self.failing.insert(symbol);
        self
    }

    pub fn build(self) -> MockQuotes {
        MockQuotes {
            prices: self.prices,
            rates: self.rates,
            hits: self.hits,
            failing: self.failing,
            quoted: Mutex::new(Vec::new()),
        }
    }
}

/// A mock quote source that records every quoted symbol.
pub struct MockQuotes {
    prices: FxHashMap<Symbol, f64>,
    rates: FxHashMap<(Currency, Currency), f64>,
    hits: Vec<SearchHit>,
    failing: FxHashSet<Symbol>,
    quoted: Mutex<Vec<Symbol>>,
}

impl MockQuotes {
    pub fn builder() -> MockQuotesBuilder {
        MockQuotesBuilder::default()
    }

    /// Symbols passed to [`QuoteGateway::quote`], in call order.
    pub fn quoted_symbols(&self) -> Vec<Symbol> {
        self.quoted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl QuoteGateway for MockQuotes {
    fn quote(&self, symbol: &Symbol) -> Result<Quote, QuoteError> {
        self.quoted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(*symbol);

        if self.failing.contains(symbol) {
            return Err(QuoteError::unavailable(*symbol, "mock: quote failed"));
        }
        self.prices
            .get(symbol)
            .map(|&price| Quote::new(*symbol, price))
            .ok_or_else(|| QuoteError::unavailable(*symbol, "mock: unknown symbol"))
    }

    /// Hits whose symbol or short name contains the query, case-insensitively.
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, QuoteError> {
        let needle = query.trim().to_ascii_lowercase();
        Ok(self
            .hits
            .iter()
            .filter(|hit| {
                hit.symbol.to_ascii_lowercase().contains(&needle)
                    || hit
                        .short_name
                        .as_deref()
                        .is_some_and(|name| name.to_ascii_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }
}

impl RateSource for MockQuotes {
    fn rate(&self, from: &Currency, to: &Currency) -> Result<f64, QuoteError> {
        self.rates
            .get(&(*from, *to))
            .copied()
            .ok_or_else(|| QuoteError::RateUnavailable {
                from: *from,
                to: *to,
                reason: "mock: no rate configured".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuoteType;

    fn aapl() -> Symbol {
        Symbol::new("AAPL")
    }

    #[test]
    fn builder_basic() {
        let quotes = MockQuotes::builder().with_price(aapl(), 150.0).build();

        let quote = quotes.quote(&aapl()).unwrap();
        assert_eq!(quote.symbol, aapl());
        assert_eq!(quote.price, 150.0);
        assert_eq!(quote.currency, None);
    }

    #[test]
    fn unknown_symbol_is_unavailable() {
        let quotes = MockQuotes::builder().build();
        let err = quotes.quote(&aapl()).unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(quotes.quoted_symbols(), vec![aapl()]);
    }

    #[test]
    fn failing_overrides_price() {
        let quotes = MockQuotes::builder()
            .with_price(aapl(), 150.0)
            .failing(aapl())
            .build();
        assert!(quotes.quote(&aapl()).is_err());
    }

    #[test]
    fn search_matches_symbol_and_name() {
        let quotes = MockQuotes::builder()
            .with_hit(SearchHit::new("AAPL", "Apple Inc.", "NMS", QuoteType::Equity))
            .with_hit(SearchHit::new("VOO", "Vanguard S&P 500 ETF", "PCX", QuoteType::Etf))
            .build();

        assert_eq!(quotes.search("aap").unwrap().len(), 1);
        assert_eq!(quotes.search("vanguard").unwrap()[0].symbol, "VOO");
        assert!(quotes.search("tesla").unwrap().is_empty());
    }

    #[test]
    fn rate_is_directional() {
        let quotes = MockQuotes::builder()
            .with_rate(Currency::USD, Currency::CAD, 1.37)
            .build();
        assert_eq!(quotes.rate(&Currency::USD, &Currency::CAD).unwrap(), 1.37);
        assert!(matches!(
            quotes.rate(&Currency::CAD, &Currency::USD),
            Err(QuoteError::RateUnavailable { .. })
        ));
    }
}
