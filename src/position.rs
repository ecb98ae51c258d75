//! A single held symbol with its share count, last price, and target allocation.

use crate::error::HoldingsError;
use crate::rounding::{floor_shares, round_currency};
use crate::types::Symbol;

/// A holding in one instrument.
///
/// `shares` may be fractional (brokers report fractional lots), but every
/// valuation and trade decision works in whole shares. `price` is in currency
/// units per share. `target_pct` is the desired share of portfolio value, in
/// percent (`50.0` = half the portfolio).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub symbol: Symbol,
    pub shares: f64,
    pub price: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_pct: f64,
}

impl Position {
    /// Create a position with no target allocation.
    pub fn new(symbol: Symbol, shares: f64, price: f64) -> Self {
        Self {
            symbol,
            shares,
            price,
            target_pct: 0.0,
        }
    }

    /// Builder-style target assignment.
    pub fn with_target(mut self, target_pct: f64) -> Self {
        self.target_pct = target_pct;
        self
    }

    /// Whole shares held.
    #[inline]
    pub fn whole_shares(&self) -> i64 {
        floor_shares(self.shares)
    }

    /// Market value of the whole shares held, rounded to cents.
    #[inline]
    pub fn market_value(&self) -> f64 {
        round_currency(self.price * self.whole_shares() as f64)
    }

    /// Check that a share quantity can be added to a position.
    pub fn validate_shares(shares: f64) -> Result<(), HoldingsError> {
        if !shares.is_finite() || shares <= 0.0 {
            return Err(HoldingsError::InvalidShares(shares));
        }
        Ok(())
    }

    /// Check that a price is usable for valuation.
    pub fn validate_price(price: f64) -> Result<(), HoldingsError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(HoldingsError::InvalidPrice(price));
        }
        Ok(())
    }

    /// Check that a target percentage is within [0, 100].
    pub fn validate_target(target_pct: f64) -> Result<(), HoldingsError> {
        if !target_pct.is_finite() || !(0.0..=100.0).contains(&target_pct) {
            return Err(HoldingsError::InvalidTarget(target_pct));
        }
        Ok(())
    }
}
