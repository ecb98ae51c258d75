//! Quote and exchange-rate gateways for folio.
//!
//! Provides the `QuoteGateway` and `RateSource` traits that the rebalancer
//! talks to, plus implementations:
//!
//! - **Mock** (`mock`): configurable in-memory prices for tests
//! - **Yahoo Finance** (feature `yahoo`): blocking REST client

pub mod error;
pub mod mock;
pub mod types;

#[cfg(feature = "yahoo")]
pub mod yahoo;

pub use error::QuoteError;
pub use types::*;

use folio::{Currency, Symbol};
use log::{debug, warn};
use rustc_hash::FxHashSet;

/// A market-data source that can price symbols and search for them.
pub trait QuoteGateway {
    /// Get the latest price for a symbol.
    fn quote(&self, symbol: &Symbol) -> Result<Quote, QuoteError>;

    /// Search instruments by ticker or name.
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, QuoteError>;
}

/// A source of currency conversion rates.
pub trait RateSource {
    /// Units of `to` per one unit of `from`.
    fn rate(&self, from: &Currency, to: &Currency) -> Result<f64, QuoteError>;
}

/// Quote every symbol once, in first-seen order.
///
/// Fails on the first symbol without a usable price.
pub fn fetch_prices<G>(gateway: &G, symbols: &[Symbol]) -> Result<Vec<(Symbol, f64)>, QuoteError>
where
    G: QuoteGateway + ?Sized,
{
    let mut seen = FxHashSet::default();
    let mut prices = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        if !seen.insert(*symbol) {
            continue;
        }
        let quote = gateway.quote(symbol)?;
        if !quote.price.is_finite() || quote.price <= 0.0 {
            return Err(QuoteError::unavailable(
                *symbol,
                format!("invalid price {}", quote.price),
            ));
        }
        debug!("{symbol}: {}", quote.price);
        prices.push((*symbol, quote.price));
    }

    Ok(prices)
}

/// Conversion rate from `from` to `to`, or 1.0 when none is available.
pub fn rate_or_identity<R>(source: &R, from: &Currency, to: &Currency) -> f64
where
    R: RateSource + ?Sized,
{
    if from == to {
        return 1.0;
    }
    match source.rate(from, to) {
        Ok(rate) if rate.is_finite() && rate > 0.0 => rate,
        Ok(rate) => {
            warn!("Ignoring invalid {from}->{to} rate {rate}, using 1.0");
            1.0
        }
        Err(e) => {
            warn!("{e}, using 1.0");
            1.0
        }
    }
}

/// Keep only hits that can be held in a portfolio (equities and ETFs).
pub fn tradable(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    hits.into_iter()
        .filter(|hit| hit.quote_type.is_tradable())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock::MockQuotes;

    fn aapl() -> Symbol {
        Symbol::new("AAPL")
    }
    fn voo() -> Symbol {
        Symbol::new("VOO")
    }

    #[test]
    fn fetch_prices_dedups_in_order() {
        let quotes = MockQuotes::builder()
            .with_price(aapl(), 190.0)
            .with_price(voo(), 470.5)
            .build();

        let prices = fetch_prices(&quotes, &[voo(), aapl(), voo()]).unwrap();
        assert_eq!(prices, vec![(voo(), 470.5), (aapl(), 190.0)]);
        assert_eq!(quotes.quoted_symbols(), vec![voo(), aapl()]);
    }

    #[test]
    fn fetch_prices_fails_fast() {
        let quotes = MockQuotes::builder()
            .with_price(voo(), 470.5)
            .failing(aapl())
            .build();

        let err = fetch_prices(&quotes, &[aapl(), voo()]).unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(quotes.quoted_symbols(), vec![aapl()]);
    }

    #[test]
    fn fetch_prices_rejects_zero_price() {
        let quotes = MockQuotes::builder().with_price(aapl(), 0.0).build();
        let err = fetch_prices(&quotes, &[aapl()]).unwrap_err();
        assert!(matches!(err, QuoteError::Unavailable { symbol, .. } if symbol == aapl()));
    }

    #[test]
    fn rate_fallback_is_identity() {
        let quotes = MockQuotes::builder()
            .with_rate(Currency::USD, Currency::CAD, 1.37)
            .build();

        assert_eq!(rate_or_identity(&quotes, &Currency::USD, &Currency::CAD), 1.37);
        assert_eq!(rate_or_identity(&quotes, &Currency::USD, &Currency::USD), 1.0);
        let eur = Currency::parse("EUR").unwrap();
        assert_eq!(rate_or_identity(&quotes, &Currency::USD, &eur), 1.0);
    }

    #[test]
    fn tradable_keeps_equities_and_etfs() {
        let hits = vec![
            SearchHit::new("AAPL", "Apple Inc.", "NMS", QuoteType::Equity),
            SearchHit::new("AAPL240621C", "AAPL Call", "OPR", QuoteType::Option),
            SearchHit::new("VOO", "Vanguard S&P 500 ETF", "PCX", QuoteType::Etf),
        ];
        let kept: Vec<_> = tradable(hits).into_iter().map(|h| h.symbol).collect();
        assert_eq!(kept, vec!["AAPL", "VOO"]);
    }
}
