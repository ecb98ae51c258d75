//! # folio
//!
//! Portfolio valuation and step-by-step, whole-share rebalancing toward
//! target allocations.
//!
//! ## Pipeline
//!
//! ```text
//! Holdings ──▶ Valuation ──▶ Rebalancing engine ──▶ (Currency projection) ──▶ display
//! ```
//!
//! - [`holdings`]: the persisted positions and their mutations (add, merge,
//!   set target, remove) behind the [`HoldingsStore`] trait.
//! - [`valuation`]: live prices in, position values and percentages out.
//! - [`rebalance`]: sells first, then buys, each step recorded with the
//!   portfolio it leaves behind.
//! - [`projection`]: restate a plan in a display currency without touching
//!   the share-based decisions.
//!
//! ## Quick Start
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
//!
//! // Live quotes replace the stored prices
//! let prices = [(Symbol::new("AAPL"), 150.0), (Symbol::new("GOOG"), 100.0)];
//! let valuation = value_positions(&positions, &prices).unwrap();
//! assert_eq!(valuation.total_value(), 2000.0);
//! assert_eq!(valuation.positions()[0].current_pct, 75.0);
//!
//! let plan = compute_rebalancing(&valuation, Strategy::Both).unwrap();
//! assert_eq!(plan.total_trades, 2);
//! assert_eq!(plan.steps[0].share_delta, -3); // sell AAPL first
//! assert_eq!(plan.steps[1].share_delta, 5);  // then buy GOOG
//! ```
//!
//! ## Targets
//!
//! Rebalancing only runs when target percentages sum to 100 (±0.01).
//! Otherwise [`rebalance::compute_rebalancing`] returns `None`:
//!
//! ```
//! use folio::{Position, Strategy, Symbol};
//! use folio::rebalance::compute_rebalancing;
//! use folio::valuation::value_positions;
//!
//! let positions = [Position::new(Symbol::new("VTI"), 4.0, 250.0).with_target(90.0)];
//! let valuation = value_positions(&positions, &[]).unwrap();
//! assert!(compute_rebalancing(&valuation, Strategy::Both).is_none());
//! ```
//!
//! ## Currency Projection
//!
//! ```
//! use folio::{Position, Strategy, Symbol};
//! use folio::projection::{project, Currency};
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
//! let cad = project(&plan, Currency::CAD, 1.35);
//! assert_eq!(cad.cash_required.amount, 675.0);
//! assert_eq!(cad.cash_required.original, 500.0);
//! assert_eq!(cad.steps[1].share_delta, 5);
//! ```

mod error;
pub mod holdings;
mod position;
pub mod projection;
pub mod rebalance;
pub mod rounding;
mod types;
pub mod valuation;

// Re-export public API
pub use error::{CurrencyError, HoldingsError, StoreError, SymbolError};
pub use holdings::{Holdings, HoldingsStore, MemoryStore};
#[cfg(feature = "persistence")]
pub use holdings::JsonFileStore;
pub use position::Position;
pub use projection::{Converted, Currency, ProjectedPlan};
pub use rebalance::{Adjustment, HoldingSnapshot, RebalancePlan, Snapshot, TradeStep, ValueChange};
pub use types::{Direction, Strategy, Symbol, TradeType};
pub use valuation::{Valuation, ValuedPosition};
