//! Error types for symbols, holdings, and currency codes.

use std::path::PathBuf;

/// Errors returned when parsing a ticker symbol.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    /// The symbol was empty after trimming.
    #[error("symbol must not be empty")]
    Empty,
    /// The symbol does not fit in the inline buffer.
    #[error("symbol '{0}' exceeds {max} bytes", max = crate::Symbol::MAX_LEN)]
    TooLong(String),
    /// The symbol contains whitespace, control, or non-ASCII characters.
    #[error("symbol '{0}' contains invalid characters")]
    InvalidChars(String),
}

/// Errors returned by holdings mutations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum HoldingsError {
    #[error("shares must be a positive number, got {0}")]
    InvalidShares(f64),

    #[error("price must be a positive number, got {0}")]
    InvalidPrice(f64),

    #[error("target percentage must be in [0, 100], got {0}")]
    InvalidTarget(f64),
}

/// Errors returned by a [`HoldingsStore`](crate::holdings::HoldingsStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read holdings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write holdings file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[cfg(feature = "persistence")]
    #[error("failed to parse holdings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors returned when parsing a currency code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid currency code '{0}': expected three ASCII letters")]
pub struct CurrencyError(pub String);
