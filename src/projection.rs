//! Currency projection: restate a computed plan in a display currency.
//!
//! The engine always runs in the base currency. Projection multiplies every
//! monetary field by the exchange rate and keeps the base amount next to it;
//! share counts, percentages, and trade decisions are copied untouched.

use std::fmt;
use std::str::FromStr;

use crate::error::CurrencyError;
use crate::rebalance::{HoldingSnapshot, RebalancePlan, TradeStep, ValueChange};
use crate::rounding::round_currency;
use crate::types::{Direction, Symbol, TradeType};

/// ISO 4217 currency code, uppercase.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency([u8; 3]);

impl Currency {
    pub const USD: Currency = Currency(*b"USD");
    pub const CAD: Currency = Currency(*b"CAD");

    /// Parse a three-letter code, case-insensitively.
    pub fn parse(code: &str) -> Result<Self, CurrencyError> {
        let code = code.trim();
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(CurrencyError(code.to_string()));
        }
        Ok(Currency([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }

    pub fn code(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Prefix used when printing amounts.
    pub fn symbol(&self) -> &'static str {
        match self.code() {
            "CAD" => "C$",
            "EUR" => "€",
            "GBP" => "£",
            _ => "$",
        }
    }

    /// Format an amount with thousands separators and 2 decimals.
    pub fn format(&self, amount: f64) -> String {
        let text = format_amount(amount);
        match text.strip_prefix('-') {
            Some(abs) => format!("-{}{abs}", self.symbol()),
            None => format!("{}{text}", self.symbol()),
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self.code())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Currency {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Currency {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Currency::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// `1234567.891` → `"1,234,567.89"`.
pub fn format_amount(amount: f64) -> String {
    let rounded = round_currency(amount);
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// A display amount with the base-currency amount it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Converted {
    /// Amount in the display currency, rounded to cents.
    pub amount: f64,
    /// Amount in the base currency, as computed by the engine.
    pub original: f64,
}

impl Converted {
    fn at(original: f64, rate: f64) -> Self {
        Self {
            amount: round_currency(original * rate),
            original,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedHolding {
    pub symbol: Symbol,
    pub shares: i64,
    pub percentage: f64,
    pub value: Converted,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedValueChange {
    pub amount: Converted,
    pub percentage: f64,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedStep {
    pub trade_type: TradeType,
    pub symbol: Symbol,
    pub share_delta: i64,
    pub action: String,
    pub value: Converted,
    pub before_holdings: Vec<ProjectedHolding>,
    pub holdings: Vec<ProjectedHolding>,
    pub value_change: ProjectedValueChange,
    pub total_value: Converted,
}

/// A [`RebalancePlan`] restated in a display currency.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedPlan {
    pub currency: Currency,
    pub rate: f64,
    pub steps: Vec<ProjectedStep>,
    pub final_value: Converted,
    pub cash_required: Converted,
    pub total_trades: usize,
}

fn project_holdings(holdings: &[HoldingSnapshot], rate: f64) -> Vec<ProjectedHolding> {
    holdings
        .iter()
        .map(|h| ProjectedHolding {
            symbol: h.symbol,
            shares: h.shares,
            percentage: h.percentage,
            value: Converted::at(h.value, rate),
            direction: h.direction,
        })
        .collect()
}

fn project_change(change: &ValueChange, rate: f64) -> ProjectedValueChange {
    ProjectedValueChange {
        amount: Converted::at(change.amount, rate),
        percentage: change.percentage,
        direction: change.direction,
    }
}

fn project_step(step: &TradeStep, rate: f64) -> ProjectedStep {
    ProjectedStep {
        trade_type: step.trade_type,
        symbol: step.symbol,
        share_delta: step.share_delta,
        action: step.action(),
        value: Converted::at(step.value, rate),
        before_holdings: project_holdings(&step.before_holdings, rate),
        holdings: project_holdings(&step.holdings, rate),
        value_change: project_change(&step.value_change, rate),
        total_value: Converted::at(step.total_value, rate),
    }
}

/// Restate `plan` in `currency` at `rate` display units per base unit.
pub fn project(plan: &RebalancePlan, currency: Currency, rate: f64) -> ProjectedPlan {
    ProjectedPlan {
        currency,
        rate,
        steps: plan.steps.iter().map(|s| project_step(s, rate)).collect(),
        final_value: Converted::at(plan.final_value, rate),
        cash_required: Converted::at(plan.cash_required, rate),
        total_trades: plan.total_trades,
    }
}
