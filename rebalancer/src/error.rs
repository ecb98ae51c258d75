//! Error types for the rebalancer.

use std::path::PathBuf;

use folio::{HoldingsError, StoreError, Symbol, SymbolError};
use folio_quotes::QuoteError;

/// All errors that can occur during rebalancer operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid symbol: {0}")]
    Symbol(#[from] SymbolError),

    #[error("{0}")]
    Holdings(#[from] HoldingsError),

    #[error("holdings store error: {0}")]
    Store(#[from] StoreError),

    #[error("{symbol} is not in the portfolio")]
    NotHeld { symbol: Symbol },

    #[error("{0}")]
    Quote(#[from] QuoteError),

    #[error("execution aborted: {0}")]
    Aborted(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

impl Error {
    /// Process exit code for this error: 2 for market-data failures, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Quote(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
