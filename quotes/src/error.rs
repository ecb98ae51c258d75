//! Quote gateway error types.

use folio::{Currency, Symbol};

/// Errors that can occur while fetching quotes, search results, or rates.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// No usable price for a symbol. Fatal for the request that needed it.
    #[error("quote unavailable for {symbol}: {reason}")]
    Unavailable { symbol: Symbol, reason: String },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("parse error: {0}")]
    Parse(String),

    /// No exchange rate for a pair. Callers fall back to an identity rate.
    #[error("exchange rate {from}->{to} unavailable: {reason}")]
    RateUnavailable {
        from: Currency,
        to: Currency,
        reason: String,
    },
}

impl QuoteError {
    /// Shorthand for [`QuoteError::Unavailable`].
    pub fn unavailable(symbol: Symbol, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            symbol,
            reason: reason.into(),
        }
    }

    /// Whether this error is a missing price for a specific symbol.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
