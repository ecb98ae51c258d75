//! Shared gateway types: quotes and search hits.

use std::fmt;

use folio::Symbol;

/// Latest market price for a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: Symbol,
    /// Regular-market price in the instrument's quote currency.
    pub price: f64,
    /// Quote currency as reported by the provider, when known.
    pub currency: Option<String>,
}

impl Quote {
    pub fn new(symbol: Symbol, price: f64) -> Self {
        Self {
            symbol,
            price,
            currency: None,
        }
    }
}

/// Instrument class reported by a symbol search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteType {
    Equity,
    Etf,
    MutualFund,
    Index,
    Currency,
    Cryptocurrency,
    Future,
    Option,
    Other,
}

impl QuoteType {
    /// Parse a provider code such as `EQUITY` or `ETF` (case-insensitive).
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "EQUITY" => Self::Equity,
            "ETF" => Self::Etf,
            "MUTUALFUND" => Self::MutualFund,
            "INDEX" => Self::Index,
            "CURRENCY" => Self::Currency,
            "CRYPTOCURRENCY" => Self::Cryptocurrency,
            "FUTURE" => Self::Future,
            "OPTION" => Self::Option,
            _ => Self::Other,
        }
    }

    /// Whether holdings of this class can be added to a portfolio.
    pub fn is_tradable(self) -> bool {
        matches!(self, Self::Equity | Self::Etf)
    }
}

/// One result of a symbol search.
///
/// The symbol is kept as text: search results may include instruments
/// whose tickers are not valid [`Symbol`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub symbol: String,
    pub short_name: Option<String>,
    pub exchange: Option<String>,
    pub quote_type: QuoteType,
}

impl SearchHit {
    pub fn new(symbol: &str, short_name: &str, exchange: &str, quote_type: QuoteType) -> Self {
        Self {
            symbol: symbol.to_string(),
            short_name: Some(short_name.to_string()),
            exchange: Some(exchange.to_string()),
            quote_type,
        }
    }
}

impl fmt::Display for SearchHit {
    /// `SYMBOL - short name (exchange)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)?;
        if let Some(name) = &self.short_name {
            write!(f, " - {name}")?;
        }
        if let Some(exchange) = &self.exchange {
            write!(f, " ({exchange})")?;
        }
        Ok(())
    }
}
