//! folio-rebalancer: command-line portfolio tracker and whole-share rebalancer.
//!
//! Loads holdings from a JSON file, prices them through a quote gateway,
//! computes a sells-first rebalancing plan toward target allocations, and
//! records every command in a JSONL audit trail.

pub mod audit;
pub mod config;
pub mod drift;
pub mod error;
pub mod execution;
