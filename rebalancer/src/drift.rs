//! Allocation drift report: current vs target allocation per position.

use folio::rebalance::alignment_score;
use folio::rounding::round_currency;
use folio::{Currency, RebalancePlan, Valuation};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Drift report comparing current allocation against targets.
#[derive(Debug, Clone, Serialize)]
pub struct DriftReport {
    pub currency: Currency,
    pub entries: Vec<DriftEntry>,
    pub total_value: f64,
    pub target_sum: f64,
    /// `100 − Σ|current − target| / 2`, in percent.
    pub alignment: f64,
}

/// One symbol's drift entry. Monetary fields are in the report currency.
#[derive(Debug, Clone, Serialize)]
pub struct DriftEntry {
    pub symbol: String,
    pub shares: i64,
    pub price: f64,
    pub value: f64,
    pub current_pct: f64,
    pub target_pct: f64,
    pub drift_pct: f64,
    /// Net share change proposed by the plan, 0 if none.
    pub planned_delta: i64,
}

/// Build a drift report from a valuation, restated at `rate` units of
/// `currency` per base unit.
pub fn drift_report(
    valuation: &Valuation,
    plan: Option<&RebalancePlan>,
    currency: Currency,
    rate: f64,
) -> DriftReport {
    let mut planned: FxHashMap<folio::Symbol, i64> = FxHashMap::default();
    if let Some(plan) = plan {
        for step in &plan.steps {
            *planned.entry(step.symbol).or_default() += step.share_delta;
        }
    }

    let entries = valuation
        .positions()
        .iter()
        .map(|p| DriftEntry {
            symbol: p.symbol().as_str().to_string(),
            shares: p.position.whole_shares(),
            price: round_currency(p.price() * rate),
            value: round_currency(p.total_value * rate),
            current_pct: p.current_pct,
            target_pct: p.target_pct(),
            drift_pct: round_currency(p.drift_pct()),
            planned_delta: planned.get(&p.symbol()).copied().unwrap_or(0),
        })
        .collect();

    DriftReport {
        currency,
        entries,
        total_value: round_currency(valuation.total_value() * rate),
        target_sum: round_currency(valuation.target_sum()),
        alignment: alignment_score(valuation),
    }
}

impl std::fmt::Display for DriftReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "PORTFOLIO ({}):", self.currency)?;
        writeln!(
            f,
            "  {:8} {:>8} {:>12} {:>14} {:>9} {:>9} {:>9} {:>6}",
            "Symbol", "Shares", "Price", "Value", "Current%", "Target%", "Drift%", "Plan"
        )?;
        for e in &self.entries {
            let plan = if e.planned_delta == 0 {
                "-".to_string()
            } else {
                format!("{:+}", e.planned_delta)
            };
            writeln!(
                f,
                "  {:8} {:>8} {:>12} {:>14} {:>8.2}% {:>8.2}% {:>+8.2}% {:>6}",
                e.symbol,
                e.shares,
                self.currency.format(e.price),
                self.currency.format(e.value),
                e.current_pct,
                e.target_pct,
                e.drift_pct,
                plan,
            )?;
        }
        writeln!(f, "\n  Total value: {}", self.currency.format(self.total_value))?;
        writeln!(f, "  Target sum:  {:.2}%", self.target_sum)?;
        writeln!(f, "  Alignment:   {:.2}%", self.alignment)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio::rebalance::compute_rebalancing;
    use folio::valuation::value_positions;
    use folio::{Position, Strategy, Symbol};

    fn valuation() -> Valuation {
        let positions = [
            Position::new(Symbol::new("AAPL"), 10.0, 150.0).with_target(50.0),
            Position::new(Symbol::new("GOOG"), 5.0, 100.0).with_target(50.0),
        ];
        value_positions(&positions, &[]).unwrap()
    }

    #[test]
    fn entries_without_plan() {
        let report = drift_report(&valuation(), None, Currency::USD, 1.0);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.total_value, 2000.0);
        assert_eq!(report.target_sum, 100.0);
        assert_eq!(report.alignment, 75.0);

        let aapl = &report.entries[0];
        assert_eq!(aapl.symbol, "AAPL");
        assert_eq!(aapl.shares, 10);
        assert_eq!(aapl.current_pct, 75.0);
        assert_eq!(aapl.drift_pct, 25.0);
        assert_eq!(aapl.planned_delta, 0);
    }

    #[test]
    fn planned_deltas_from_plan() {
        let valuation = valuation();
        let plan = compute_rebalancing(&valuation, Strategy::Both).unwrap();
        let report = drift_report(&valuation, Some(&plan), Currency::USD, 1.0);
        assert_eq!(report.entries[0].planned_delta, -3);
        assert_eq!(report.entries[1].planned_delta, 5);
    }

    #[test]
    fn converted_amounts() {
        let report = drift_report(&valuation(), None, Currency::CAD, 1.35);
        assert_eq!(report.total_value, 2700.0);
        assert_eq!(report.entries[1].price, 135.0);
        // Percentages are currency-independent
        assert_eq!(report.entries[1].current_pct, 25.0);
    }

    #[test]
    fn display_format() {
        let report = drift_report(&valuation(), None, Currency::CAD, 1.35);
        let s = format!("{report}");
        assert!(s.contains("AAPL"));
        assert!(s.contains("C$2,700.00"));
        assert!(s.contains("Alignment:   75.00%"));
    }
}
