//! Yahoo Finance quote gateway.

pub mod client;
pub mod types;

use folio::{Currency, Symbol};

use crate::error::QuoteError;
use crate::types::{Quote, SearchHit};
use crate::{QuoteGateway, RateSource};
pub use client::YahooClient;

/// Yahoo ticker for a currency pair, e.g. `USDCAD=X`.
pub fn fx_ticker(from: &Currency, to: &Currency) -> String {
    format!("{}{}=X", from.code(), to.code())
}

impl QuoteGateway for YahooClient {
    fn quote(&self, symbol: &Symbol) -> Result<Quote, QuoteError> {
        let meta = match self.chart(symbol.as_str()) {
            Ok(meta) => meta,
            Err(QuoteError::Parse(reason)) => return Err(QuoteError::unavailable(*symbol, reason)),
            Err(e) => return Err(e),
        };

        let price = meta
            .price()
            .ok_or_else(|| QuoteError::unavailable(*symbol, "no regular market price"))?;

        Ok(Quote {
            symbol: *symbol,
            price,
            currency: meta.currency,
        })
    }

    fn search(&self, query: &str) -> Result<Vec<SearchHit>, QuoteError> {
        let resp = self.search_quotes(query)?;
        Ok(resp.quotes.into_iter().map(SearchHit::from).collect())
    }
}

impl RateSource for YahooClient {
    fn rate(&self, from: &Currency, to: &Currency) -> Result<f64, QuoteError> {
        let unavailable = |reason: String| QuoteError::RateUnavailable {
            from: *from,
            to: *to,
            reason,
        };

        let meta = self
            .chart(&fx_ticker(from, to))
            .map_err(|e| unavailable(e.to_string()))?;
        meta.price()
            .ok_or_else(|| unavailable("no regular market price".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fx_ticker_format() {
        assert_eq!(fx_ticker(&Currency::USD, &Currency::CAD), "USDCAD=X");
    }
}
