//! Rebalancing engine: an ordered sequence of whole-share trades toward
//! target allocations.
//!
//! The engine works in three phases:
//!
//! 1. **Adjustments.** For each position, compute the target value, the value
//!    gap, and the whole-share delta that closes it. These are computed once,
//!    against the original valuation, and never revisited.
//! 2. **Sells.** Every negative delta, in holdings order. Each step produces a
//!    new [`Snapshot`] of the running portfolio.
//! 3. **Buys.** Every positive delta, in holdings order. Buy value deltas
//!    accumulate into `cash_required`.
//!
//! Because deltas are rounded to whole shares, the final allocation is close
//! to, but generally not exactly at, the targets.
//!
//! ```
//! use folio::{Position, Strategy, Symbol};
//! use folio::rebalance::compute_rebalancing;
//! use folio::valuation::value_positions;
//!
//! let positions = [
//!     Position::new(Symbol::new("AAPL"), 10.0, 150.0).with_target(50.0),
//!     Position::new(Symbol::new("GOOG"), 5.0, 100.0).with_target(50.0),
//! ];
//! let valuation = value_positions(&positions, &[]).unwrap();
//! let plan = compute_rebalancing(&valuation, Strategy::Both).unwrap();
//!
//! assert_eq!(plan.steps[0].action(), "Sell 3 shares of AAPL");
//! assert_eq!(plan.steps[1].action(), "Buy 5 shares of GOOG");
//! assert_eq!(plan.cash_required, 500.0);
//! ```

use crate::rounding::{
    floor_shares, percentage_of, round_currency, round_shares, targets_sum_to_100,
};
use crate::types::{Direction, Strategy, Symbol, TradeType};
use crate::valuation::{Valuation, ValuedPosition};

/// The adjustment one position needs, computed against the original valuation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Adjustment {
    pub symbol: Symbol,
    pub current_pct: f64,
    pub target_pct: f64,
    /// Signed whole-share delta: negative = sell, positive = buy.
    pub share_delta: i64,
    /// `share_delta × price`.
    pub value_delta: f64,
    pub price: f64,
    /// Magnitude of the unrounded value gap. Unused for ordering today
    /// beyond the sell/buy split.
    pub priority: f64,
}

impl Adjustment {
    /// The trade this adjustment calls for, if any.
    pub fn trade_type(&self) -> Option<TradeType> {
        match self.share_delta {
            d if d < 0 => Some(TradeType::Sell),
            d if d > 0 => Some(TradeType::Buy),
            _ => None,
        }
    }
}

/// One row of a holdings table attached to a trade step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoldingSnapshot {
    pub symbol: Symbol,
    /// Whole shares.
    pub shares: i64,
    pub percentage: f64,
    pub value: f64,
    /// `Increase`/`Decrease` for the step's traded symbol, `Neutral` otherwise.
    pub direction: Direction,
}

/// Portfolio value movement caused by one step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueChange {
    pub amount: f64,
    pub percentage: f64,
    pub direction: Direction,
}

/// One atomic trade decision plus the portfolio it leaves behind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeStep {
    pub trade_type: TradeType,
    pub symbol: Symbol,
    /// Signed whole shares; the sign matches `trade_type`.
    pub share_delta: i64,
    /// Absolute traded value, rounded to cents.
    pub value: f64,
    pub before_holdings: Vec<HoldingSnapshot>,
    pub holdings: Vec<HoldingSnapshot>,
    pub value_change: ValueChange,
    /// Portfolio total after this step, rounded to cents.
    pub total_value: f64,
}

impl TradeStep {
    /// Human-readable instruction, e.g. `"Sell 3 shares of AAPL"`.
    pub fn action(&self) -> String {
        let verb = match self.trade_type {
            TradeType::Buy => "Buy",
            TradeType::Sell => "Sell",
        };
        format!("{verb} {} shares of {}", self.share_delta.abs(), self.symbol)
    }

    /// Sum of the post-step holdings values.
    pub fn holdings_value(&self) -> f64 {
        self.holdings.iter().map(|h| h.value).sum()
    }
}

/// The full rebalancing proposal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RebalancePlan {
    /// Sells first, then buys, each in holdings order.
    pub steps: Vec<TradeStep>,
    /// Portfolio value after the last step (the starting value if no steps).
    pub final_value: f64,
    /// Sum of buy value deltas. Sell proceeds are not netted against it.
    pub cash_required: f64,
    pub total_trades: usize,
    /// Allocation alignment before any trade (100 = on target).
    pub alignment_before: f64,
    /// Allocation alignment after the last step.
    pub alignment_after: f64,
}

impl RebalancePlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn sells(&self) -> impl Iterator<Item = &TradeStep> {
        self.steps
            .iter()
            .filter(|s| s.trade_type == TradeType::Sell)
    }

    pub fn buys(&self) -> impl Iterator<Item = &TradeStep> {
        self.steps.iter().filter(|s| s.trade_type == TradeType::Buy)
    }

    /// Total proceeds from sell steps.
    pub fn cash_raised(&self) -> f64 {
        round_currency(self.sells().map(|s| s.value).sum())
    }
}

#[derive(Clone, Debug, PartialEq)]
struct SnapshotRow {
    symbol: Symbol,
    shares: f64,
    price: f64,
    value: f64,
    percentage: f64,
    target_pct: f64,
}

/// Immutable view of the running portfolio between steps.
///
/// [`Snapshot::apply`] returns a new snapshot instead of mutating, so every
/// intermediate state can be inspected and tested on its own.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    rows: Vec<SnapshotRow>,
    total_value: f64,
}

impl Snapshot {
    /// Start from valued positions and the total they were valued against.
    pub fn new(positions: &[ValuedPosition], total_value: f64) -> Self {
        let rows = positions
            .iter()
            .map(|p| SnapshotRow {
                symbol: p.symbol(),
                shares: p.position.shares,
                price: p.price(),
                value: p.total_value,
                percentage: percentage_of(p.total_value, total_value),
                target_pct: p.target_pct(),
            })
            .collect();
        Self { rows, total_value }
    }

    /// Running portfolio total (unrounded sum of position values).
    #[inline]
    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    /// Shares currently held for `symbol`.
    pub fn shares(&self, symbol: &Symbol) -> Option<f64> {
        self.rows.iter().find(|r| r.symbol == *symbol).map(|r| r.shares)
    }

    /// Current percentage for `symbol`.
    pub fn percentage(&self, symbol: &Symbol) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.symbol == *symbol)
            .map(|r| r.percentage)
    }

    /// Apply a share delta to one symbol, returning the resulting snapshot.
    ///
    /// The traded position is revalued at whole shares, then the total and
    /// every percentage are recomputed. Unknown symbols leave the portfolio
    /// unchanged.
    pub fn apply(&self, symbol: Symbol, share_delta: i64) -> Snapshot {
        let mut rows = self.rows.clone();
        if let Some(row) = rows.iter_mut().find(|r| r.symbol == symbol) {
            row.shares += share_delta as f64;
            row.value = round_currency(floor_shares(row.shares) as f64 * row.price);
        }

        let total_value: f64 = rows.iter().map(|r| r.value).sum();
        for row in &mut rows {
            row.percentage = percentage_of(row.value, total_value);
        }

        Snapshot { rows, total_value }
    }

    /// Holdings table with `tag` on the subject symbol and `Neutral` elsewhere.
    pub fn holdings(&self, subject: Symbol, tag: Direction) -> Vec<HoldingSnapshot> {
        self.rows
            .iter()
            .map(|r| HoldingSnapshot {
                symbol: r.symbol,
                shares: floor_shares(r.shares),
                percentage: r.percentage,
                value: r.value,
                direction: if r.symbol == subject {
                    tag
                } else {
                    Direction::Neutral
                },
            })
            .collect()
    }

    /// `100 − Σ|current − target| / 2`; each misallocated point is counted
    /// once as excess and once as shortfall, hence the halving.
    pub fn alignment_score(&self) -> f64 {
        let total_diff: f64 = self
            .rows
            .iter()
            .map(|r| (r.percentage - r.target_pct).abs())
            .sum();
        round_currency(100.0 - total_diff / 2.0)
    }
}

/// Compute the per-position adjustments against the original valuation.
pub fn compute_adjustments(positions: &[ValuedPosition], total_value: f64) -> Vec<Adjustment> {
    positions
        .iter()
        .map(|p| {
            let price = p.price();
            let target_value = p.target_pct() / 100.0 * total_value;
            let diff = target_value - p.total_value;
            let share_delta = if price > 0.0 {
                round_shares(diff / price)
            } else {
                0
            };

            Adjustment {
                symbol: p.symbol(),
                current_pct: percentage_of(p.total_value, total_value),
                target_pct: p.target_pct(),
                share_delta,
                value_delta: share_delta as f64 * price,
                price,
                priority: diff.abs(),
            }
        })
        .collect()
}

/// Alignment score of a valuation against its own targets.
pub fn alignment_score(valuation: &Valuation) -> f64 {
    Snapshot::new(valuation.positions(), valuation.total_value()).alignment_score()
}

/// Execute one adjustment against `before`, returning the step and the new snapshot.
fn execute_step(before: &Snapshot, adj: &Adjustment, trade_type: TradeType) -> (TradeStep, Snapshot) {
    let tag = trade_type.direction();
    let before_holdings = before.holdings(adj.symbol, tag);
    let after = before.apply(adj.symbol, adj.share_delta);

    let previous = before.total_value();
    let current = after.total_value();
    let change_pct = percentage_of(current - previous, previous);

    let step = TradeStep {
        trade_type,
        symbol: adj.symbol,
        share_delta: adj.share_delta,
        value: round_currency(adj.value_delta.abs()),
        before_holdings,
        holdings: after.holdings(adj.symbol, tag),
        value_change: ValueChange {
            amount: round_currency(current - previous),
            percentage: change_pct,
            direction: if change_pct < 0.0 {
                Direction::Decrease
            } else {
                Direction::Increase
            },
        },
        total_value: round_currency(current),
    };

    (step, after)
}

/// Propose a step-by-step rebalancing of `positions` toward their targets.
///
/// `total_value` is the portfolio total the positions were valued against.
/// Returns `None` when the targets do not sum to 100% (within 0.01); this is
/// a defined "no suggestions" outcome, not an error.
pub fn rebalance(
    positions: &[ValuedPosition],
    total_value: f64,
    strategy: Strategy,
) -> Option<RebalancePlan> {
    let target_sum: f64 = positions.iter().map(|p| p.target_pct()).sum();
    if !targets_sum_to_100(target_sum) {
        return None;
    }

    let adjustments = compute_adjustments(positions, total_value);
    let mut snapshot = Snapshot::new(positions, total_value);
    let alignment_before = snapshot.alignment_score();

    let mut steps = Vec::new();
    let mut cash_required = 0.0_f64;

    if strategy.allows_sells() {
        for adj in adjustments.iter().filter(|a| a.share_delta < 0) {
            let (step, next) = execute_step(&snapshot, adj, TradeType::Sell);
            steps.push(step);
            snapshot = next;
        }
    }

    if strategy.allows_buys() {
        for adj in adjustments.iter().filter(|a| a.share_delta > 0) {
            let (step, next) = execute_step(&snapshot, adj, TradeType::Buy);
            cash_required += adj.value_delta;
            steps.push(step);
            snapshot = next;
        }
    }

    let total_trades = steps.len();
    Some(RebalancePlan {
        steps,
        final_value: round_currency(snapshot.total_value()),
        cash_required: round_currency(cash_required),
        total_trades,
        alignment_before,
        alignment_after: snapshot.alignment_score(),
    })
}

/// [`rebalance`] over a [`Valuation`].
pub fn compute_rebalancing(valuation: &Valuation, strategy: Strategy) -> Option<RebalancePlan> {
    rebalance(valuation.positions(), valuation.total_value(), strategy)
}
