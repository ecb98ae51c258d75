//! Command orchestration: holdings → quotes → valuation → plan → display.
//!
//! Every command is generic over its quote source (`QuoteGateway`,
//! `RateSource`) and its `HoldingsStore`.

use folio::projection::project;
use folio::rebalance::compute_rebalancing;
use folio::rounding::{round_currency, targets_sum_to_100};
use folio::valuation::value_positions;
use folio::{Currency, Holdings, HoldingsStore, Position, ProjectedPlan, Strategy, Symbol, Valuation};
use folio_quotes::{Quote, QuoteGateway, RateSource, SearchHit, fetch_prices, rate_or_identity, tradable};
use log::{info, warn};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::audit::{self, AuditLog};
use crate::config::Config;
use crate::drift::{DriftReport, drift_report};
use crate::error::{Error, Result};

/// Symbols the demo portfolio is drawn from.
pub const DEMO_SYMBOLS: [&str; 10] = [
    "AAPL", "GOOGL", "MSFT", "AMZN", "META", "VOO", "VTI", "QQQ", "SPY", "NVDA",
];

/// Number of distinct symbols in a demo portfolio.
pub const DEMO_SIZE: usize = 3;

/// Options for the `show` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowOptions {
    /// Overrides the configured strategy.
    pub strategy: Option<Strategy>,
    /// Overrides the configured display currency.
    pub currency: Option<Currency>,
}

/// What `show` found.
#[derive(Debug, Clone)]
pub enum ShowOutcome {
    /// No holdings stored.
    Empty,
    /// Every position is worth zero (all fractional shares).
    NoValue,
    /// Valued, but targets do not sum to 100%.
    TargetsIncomplete {
        valuation: Valuation,
        report: DriftReport,
        target_sum: f64,
    },
    /// Valued and planned. An empty plan means the portfolio is on target.
    Planned {
        valuation: Valuation,
        report: DriftReport,
        plan: ProjectedPlan,
    },
}

/// Value the portfolio at live prices and compute a rebalancing plan.
///
/// Stored prices are refreshed with the quotes used for the valuation.
pub fn show<Q, S>(
    config: &Config,
    quotes: &Q,
    store: &mut S,
    audit: &mut AuditLog,
    opts: &ShowOptions,
) -> Result<ShowOutcome>
where
    Q: QuoteGateway + RateSource + ?Sized,
    S: HoldingsStore + ?Sized,
{
    audit::log_run_started(audit, "show")?;

    let holdings = store.load()?;
    if holdings.is_empty() {
        println!("No holdings. Add one with `folio add SYMBOL SHARES` or try `folio demo`.");
        return Ok(ShowOutcome::Empty);
    }

    // 1. Quote every held symbol
    let prices = fetch_prices(quotes, &holdings.symbols())?;

    // 2. Value at live prices
    let Some(valuation) = value_positions(holdings.positions(), &prices) else {
        println!("Portfolio has no whole shares to value.");
        return Ok(ShowOutcome::NoValue);
    };
    audit::log_valuation(audit, &valuation)?;

    let refreshed: Vec<Position> = valuation
        .positions()
        .iter()
        .map(|p| p.position.clone())
        .collect();
    store.save(&Holdings::from(refreshed))?;

    // 3. Display currency
    let base = config.portfolio.base_currency;
    let currency = opts.currency.unwrap_or(config.portfolio.display_currency);
    let rate = rate_or_identity(quotes, &base, &currency);

    // 4. Plan
    let strategy = opts.strategy.unwrap_or(config.portfolio.strategy);
    let Some(plan) = compute_rebalancing(&valuation, strategy) else {
        let target_sum = round_currency(valuation.target_sum());
        let report = drift_report(&valuation, None, currency, rate);
        print!("{report}");
        println!("\nTarget percentages must sum to 100%. Current sum: {target_sum}%");
        audit::log_targets_incomplete(audit, target_sum)?;
        return Ok(ShowOutcome::TargetsIncomplete {
            valuation,
            report,
            target_sum,
        });
    };

    info!(
        "Computed {strategy} plan: {} trades, alignment {:.2}% -> {:.2}%",
        plan.total_trades, plan.alignment_before, plan.alignment_after
    );

    let report = drift_report(&valuation, Some(&plan), currency, rate);
    let projected = project(&plan, currency, rate);
    audit::log_plan(audit, &projected)?;

    print!("{report}");
    display_plan(&projected, strategy);

    Ok(ShowOutcome::Planned {
        valuation,
        report,
        plan: projected,
    })
}

/// Quote `symbol` and add `shares` of it to the portfolio.
///
/// The symbol is quoted before the store is touched.
pub fn add<Q, S>(
    quotes: &Q,
    store: &mut S,
    audit: &mut AuditLog,
    symbol: &str,
    shares: f64,
) -> Result<Position>
where
    Q: QuoteGateway + ?Sized,
    S: HoldingsStore + ?Sized,
{
    let symbol = Symbol::try_new(symbol)?;
    Position::validate_shares(shares)?;
    audit::log_run_started(audit, "add")?;

    let quote = quotes.quote(&symbol)?;
    let price = round_currency(quote.price);

    let mut holdings = store.load()?;
    holdings.add(symbol, shares, price)?;
    store.save(&holdings)?;

    let position = holdings
        .get(&symbol)
        .cloned()
        .ok_or(Error::NotHeld { symbol })?;

    audit::log_holdings_changed(
        audit,
        "add",
        serde_json::json!({
            "symbol": symbol.as_str(),
            "shares": shares,
            "price": price,
            "total_shares": position.shares,
        }),
    )?;
    println!(
        "Added {shares} {symbol} @ ${price:.2} (now {} shares)",
        position.shares
    );

    Ok(position)
}

/// Set the target allocation of a held symbol.
///
/// Returns the new sum of all targets. A sum other than 100% is allowed
/// while editing but reported.
pub fn set_target<S>(store: &mut S, audit: &mut AuditLog, symbol: &str, target_pct: f64) -> Result<f64>
where
    S: HoldingsStore + ?Sized,
{
    let symbol = Symbol::try_new(symbol)?;
    audit::log_run_started(audit, "target")?;

    let mut holdings = store.load()?;
    if !holdings.set_target(&symbol, target_pct)? {
        return Err(Error::NotHeld { symbol });
    }
    store.save(&holdings)?;

    let target_sum = round_currency(holdings.target_sum());
    audit::log_holdings_changed(
        audit,
        "target",
        serde_json::json!({
            "symbol": symbol.as_str(),
            "target_pct": target_pct,
            "target_sum": target_sum,
        }),
    )?;

    println!("Target for {symbol} set to {target_pct}%");
    if !targets_sum_to_100(target_sum) {
        warn!("Targets sum to {target_sum}%, rebalancing needs 100%");
        println!("Target percentages must sum to 100%. Current sum: {target_sum}%");
    }

    Ok(target_sum)
}

/// Remove a symbol from the portfolio, confirming first unless `force`.
///
/// Returns `false` if the user declined.
pub fn remove<S>(store: &mut S, audit: &mut AuditLog, symbol: &str, force: bool) -> Result<bool>
where
    S: HoldingsStore + ?Sized,
{
    let symbol = Symbol::try_new(symbol)?;
    audit::log_run_started(audit, "remove")?;

    let mut holdings = store.load()?;
    if holdings.get(&symbol).is_none() {
        return Err(Error::NotHeld { symbol });
    }

    if !force && !confirm(&format!("Remove {symbol} from the portfolio?"))? {
        println!("Aborted.");
        return Ok(false);
    }

    holdings.remove(&symbol);
    store.save(&holdings)?;
    audit::log_holdings_changed(
        audit,
        "remove",
        serde_json::json!({ "symbol": symbol.as_str() }),
    )?;
    println!("Removed {symbol}");

    Ok(true)
}

/// Search instruments and print the tradable ones.
pub fn search<Q>(quotes: &Q, query: &str) -> Result<Vec<SearchHit>>
where
    Q: QuoteGateway + ?Sized,
{
    let hits = tradable(quotes.search(query.trim())?);
    if hits.is_empty() {
        println!("No stocks or ETFs match '{}'.", query.trim());
    }
    for hit in &hits {
        println!("{hit}");
    }
    Ok(hits)
}

/// Print the current price of one symbol.
pub fn quote<Q>(quotes: &Q, symbol: &str) -> Result<Quote>
where
    Q: QuoteGateway + ?Sized,
{
    let symbol = Symbol::try_new(symbol)?;
    let quote = quotes.quote(&symbol)?;
    match &quote.currency {
        Some(currency) => println!("{symbol}: {:.2} {currency}", quote.price),
        None => println!("{symbol}: {:.2}", quote.price),
    }
    Ok(quote)
}

/// Replace the portfolio with [`DEMO_SIZE`] random symbols from
/// [`DEMO_SYMBOLS`], each with 1..=100 shares and no target.
///
/// Asks before discarding existing holdings unless `force`. Returns `None`
/// if the user declined.
pub fn demo<Q, S, R>(
    quotes: &Q,
    store: &mut S,
    audit: &mut AuditLog,
    rng: &mut R,
    force: bool,
) -> Result<Option<Holdings>>
where
    Q: QuoteGateway + ?Sized,
    S: HoldingsStore + ?Sized,
    R: Rng,
{
    audit::log_run_started(audit, "demo")?;

    let existing = store.load()?;
    if !existing.is_empty()
        && !force
        && !confirm(&format!(
            "Replace the current {} holdings with a demo portfolio?",
            existing.len()
        ))?
    {
        println!("Aborted.");
        return Ok(None);
    }

    let picks: Vec<&str> = DEMO_SYMBOLS
        .choose_multiple(rng, DEMO_SIZE)
        .copied()
        .collect();

    let mut holdings = Holdings::new();
    for code in picks {
        let symbol = Symbol::try_new(code)?;
        let shares = f64::from(rng.gen_range(1u32..=100));
        let quote = quotes.quote(&symbol)?;
        holdings.add(symbol, shares, round_currency(quote.price))?;
    }

    store.save(&holdings)?;
    let symbols: Vec<String> = holdings.symbols().iter().map(|s| s.to_string()).collect();
    audit::log_holdings_changed(audit, "demo", serde_json::json!({ "symbols": symbols }))?;

    println!("Demo portfolio:");
    for pos in holdings.positions() {
        println!("  {:8} {:>4} @ ${:.2}", pos.symbol, pos.shares, pos.price);
    }

    Ok(Some(holdings))
}

// === Helpers ===

fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| Error::Aborted(format!("confirmation prompt failed: {e}")))
}

fn display_plan(plan: &ProjectedPlan, strategy: Strategy) {
    let fmt = |amount: f64| plan.currency.format(amount);

    if plan.steps.is_empty() {
        println!("\nNo rebalancing needed ({strategy}): portfolio matches targets.");
        return;
    }

    println!("\nREBALANCING PLAN ({strategy}):");
    println!(
        "  {:>3}  {:4} {:8} {:>8} {:>14} {:>14}",
        "#", "Type", "Symbol", "Shares", "Value", "Portfolio"
    );
    for (i, step) in plan.steps.iter().enumerate() {
        println!(
            "  {:>3}  {:4} {:8} {:>8} {:>14} {:>14}   ({}, {:+.2}%)",
            i + 1,
            step.trade_type.to_string(),
            step.symbol,
            step.share_delta.abs(),
            fmt(step.value.amount),
            fmt(step.total_value.amount),
            step.action,
            step.value_change.percentage,
        );
    }

    println!("\n  Final value:   {}", fmt(plan.final_value.amount));
    println!("  Cash required: {}", fmt(plan.cash_required.amount));
    println!("  Total trades:  {}", plan.total_trades);
    if plan.rate != 1.0 {
        println!("  Rate:          {:.4} {} per base unit", plan.rate, plan.currency);
    }
}
