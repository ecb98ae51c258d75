//! Valuation stage: live prices in, position values and allocation percentages out.

use rustc_hash::FxHashMap;

use crate::position::Position;
use crate::rounding::{percentage_of, round_currency};
use crate::types::Symbol;

/// A position together with its market value and current allocation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValuedPosition {
    pub position: Position,
    /// `price × floor(shares)`, rounded to cents.
    pub total_value: f64,
    /// Share of the portfolio total, in percent, rounded to 2 decimals.
    pub current_pct: f64,
}

impl ValuedPosition {
    #[inline]
    pub fn symbol(&self) -> Symbol {
        self.position.symbol
    }

    #[inline]
    pub fn price(&self) -> f64 {
        self.position.price
    }

    #[inline]
    pub fn target_pct(&self) -> f64 {
        self.position.target_pct
    }

    /// Current minus target allocation, in percentage points.
    #[inline]
    pub fn drift_pct(&self) -> f64 {
        self.current_pct - self.position.target_pct
    }
}

/// A valued portfolio. Only constructed for a non-zero total, so
/// percentages are always defined.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Valuation {
    positions: Vec<ValuedPosition>,
    total_value: f64,
}

impl Valuation {
    /// Valued positions in holdings order.
    pub fn positions(&self) -> &[ValuedPosition] {
        &self.positions
    }

    /// Sum of all position values.
    #[inline]
    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    /// Look up a valued position by symbol.
    pub fn get(&self, symbol: &Symbol) -> Option<&ValuedPosition> {
        self.positions.iter().find(|p| p.symbol() == *symbol)
    }

    /// Sum of target percentages across all positions.
    pub fn target_sum(&self) -> f64 {
        self.positions.iter().map(|p| p.target_pct()).sum()
    }

    /// Sum of current percentages (100 up to rounding).
    pub fn current_sum(&self) -> f64 {
        self.positions.iter().map(|p| p.current_pct).sum()
    }

    /// Symbols in holdings order.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.positions.iter().map(|p| p.symbol()).collect()
    }
}

/// Value a set of positions at the given live prices.
///
/// Each position's price is replaced by its quote rounded to cents; a
/// position without a quote keeps its stored price. Position values use
/// whole shares only.
///
/// Returns `None` when there is nothing to value: no positions, or a
/// total of zero (percentages would be undefined).
pub fn value_positions(positions: &[Position], prices: &[(Symbol, f64)]) -> Option<Valuation> {
    if positions.is_empty() {
        return None;
    }

    let price_map: FxHashMap<Symbol, f64> = prices.iter().copied().collect();

    let repriced: Vec<(Position, f64)> = positions
        .iter()
        .map(|pos| {
            let mut pos = pos.clone();
            if let Some(&quote) = price_map.get(&pos.symbol) {
                pos.price = round_currency(quote);
            }
            let value = pos.market_value();
            (pos, value)
        })
        .collect();

    let total_value: f64 = repriced.iter().map(|(_, value)| value).sum();
    if total_value <= 0.0 {
        return None;
    }

    let positions = repriced
        .into_iter()
        .map(|(position, total_value_of)| ValuedPosition {
            position,
            total_value: total_value_of,
            current_pct: percentage_of(total_value_of, total_value),
        })
        .collect();

    Some(Valuation {
        positions,
        total_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aapl() -> Symbol {
        Symbol::new("AAPL")
    }
    fn goog() -> Symbol {
        Symbol::new("GOOG")
    }

    #[test]
    fn values_and_percentages() {
        let positions = [
            Position::new(aapl(), 10.0, 140.0),
            Position::new(goog(), 5.0, 100.0),
        ];
        let prices = [(aapl(), 150.0), (goog(), 100.0)];

        let valuation = value_positions(&positions, &prices).unwrap();
        assert_eq!(valuation.total_value(), 2000.0);
        assert_eq!(valuation.positions()[0].price(), 150.0);
        assert_eq!(valuation.positions()[0].total_value, 1500.0);
        assert_eq!(valuation.positions()[0].current_pct, 75.0);
        assert_eq!(valuation.positions()[1].current_pct, 25.0);
    }

    #[test]
    fn fractional_shares_are_floored() {
        let positions = [Position::new(aapl(), 2.9, 10.0)];
        let valuation = value_positions(&positions, &[]).unwrap();
        assert_eq!(valuation.total_value(), 20.0);
        assert_eq!(valuation.positions()[0].current_pct, 100.0);
    }

    #[test]
    fn quotes_rounded_to_cents() {
        let positions = [Position::new(aapl(), 1.0, 1.0)];
        let valuation = value_positions(&positions, &[(aapl(), 187.456)]).unwrap();
        assert_eq!(valuation.positions()[0].price(), 187.46);
    }

    #[test]
    fn empty_portfolio() {
        assert!(value_positions(&[], &[]).is_none());
    }

    #[test]
    fn zero_total_is_no_portfolio() {
        let positions = [Position::new(aapl(), 0.5, 150.0)];
        assert!(value_positions(&positions, &[]).is_none());
    }

    #[test]
    fn idempotent_for_unchanged_inputs() {
        let positions = [
            Position::new(aapl(), 7.0, 0.0),
            Position::new(goog(), 3.0, 0.0),
        ];
        let prices = [(aapl(), 123.45), (goog(), 67.89)];
        let a = value_positions(&positions, &prices).unwrap();
        let b = value_positions(&positions, &prices).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn lookup_and_sums() {
        let positions = [
            Position::new(aapl(), 1.0, 1.0).with_target(60.0),
            Position::new(goog(), 2.0, 1.0).with_target(40.0),
        ];
        let valuation = value_positions(&positions, &[]).unwrap();
        assert_eq!(valuation.target_sum(), 100.0);
        assert!((valuation.current_sum() - 100.0).abs() < 0.05);
        assert_eq!(valuation.get(&goog()).unwrap().total_value, 2.0);
        assert_eq!(valuation.symbols(), vec![aapl(), goog()]);
    }
}
