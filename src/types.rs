//! Core types: Symbol, Strategy, TradeType, Direction

use std::fmt;
use std::str::FromStr;

use crate::error::SymbolError;

/// Ticker symbol stored inline, uppercase-normalized.
///
/// `Symbol` is `Copy` so it can be used freely as a hash key and inside
/// snapshots without allocation. Exchange suffixes such as `SHOP.TO` or
/// `BRK-B` fit comfortably in [`Symbol::MAX_LEN`] bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    bytes: [u8; Symbol::MAX_LEN],
    len: u8,
}

impl Symbol {
    /// Maximum symbol length in bytes.
    pub const MAX_LEN: usize = 12;

    /// Create a symbol, uppercasing the input.
    ///
    /// # Panics
    ///
    /// Panics if the input is not a valid symbol. Use [`Symbol::try_new`]
    /// for untrusted input.
    pub fn new(s: &str) -> Self {
        match Self::try_new(s) {
            Ok(sym) => sym,
            Err(e) => panic!("invalid symbol: {e}"),
        }
    }

    /// Create a symbol from untrusted input.
    ///
    /// Leading and trailing whitespace is trimmed; the rest must be
    /// printable ASCII without spaces.
    pub fn try_new(s: &str) -> Result<Self, SymbolError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SymbolError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(SymbolError::InvalidChars(s.to_string()));
        }
        if s.len() > Self::MAX_LEN {
            return Err(SymbolError::TooLong(s.to_string()));
        }

        let mut bytes = [0u8; Self::MAX_LEN];
        for (dst, src) in bytes.iter_mut().zip(s.bytes()) {
            *dst = src.to_ascii_uppercase();
        }
        Ok(Self {
            bytes,
            len: s.len() as u8,
        })
    }

    /// The symbol text.
    pub fn as_str(&self) -> &str {
        // Only ASCII bytes are ever written.
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Symbol {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Symbol {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Symbol::try_new(&s).map_err(serde::de::Error::custom)
    }
}

/// Which half of the adjustment set a rebalancing run may execute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strategy {
    /// Sells first, then buys.
    #[default]
    Both,
    /// Raise cash only.
    Sell,
    /// Deploy external cash only.
    Buy,
}

impl Strategy {
    /// Whether sell steps are generated.
    #[inline]
    pub fn allows_sells(self) -> bool {
        matches!(self, Strategy::Both | Strategy::Sell)
    }

    /// Whether buy steps are generated.
    #[inline]
    pub fn allows_buys(self) -> bool {
        matches!(self, Strategy::Both | Strategy::Buy)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Both => write!(f, "both"),
            Strategy::Sell => write!(f, "sell"),
            Strategy::Buy => write!(f, "buy"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" => Ok(Strategy::Both),
            "sell" => Ok(Strategy::Sell),
            "buy" => Ok(Strategy::Buy),
            other => Err(format!("unknown strategy '{other}' (expected both, sell, or buy)")),
        }
    }
}

/// Trade direction of a rebalancing step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum TradeType {
    Buy,
    Sell,
}

impl TradeType {
    /// How the traded position moves in a step of this type.
    pub fn direction(self) -> Direction {
        match self {
            TradeType::Buy => Direction::Increase,
            TradeType::Sell => Direction::Decrease,
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::Buy => f.pad("BUY"),
            TradeType::Sell => f.pad("SELL"),
        }
    }
}

/// Movement tag attached to holdings rows and value changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Increase,
    Decrease,
    Neutral,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Increase => f.pad("increase"),
            Direction::Decrease => f.pad("decrease"),
            Direction::Neutral => f.pad("neutral"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_uppercases() {
        assert_eq!(Symbol::new("aapl").as_str(), "AAPL");
        assert_eq!(Symbol::new(" shop.to ").as_str(), "SHOP.TO");
        assert_eq!(Symbol::new("aapl"), Symbol::new("AAPL"));
    }

    #[test]
    fn symbol_rejects_bad_input() {
        assert_eq!(Symbol::try_new("   "), Err(SymbolError::Empty));
        assert!(matches!(
            Symbol::try_new("ABCDEFGHIJKLMN"),
            Err(SymbolError::TooLong(_))
        ));
        assert!(matches!(
            Symbol::try_new("BRK B"),
            Err(SymbolError::InvalidChars(_))
        ));
    }

    #[test]
    fn symbol_display_pads() {
        assert_eq!(format!("{:6}|", Symbol::new("VOO")), "VOO   |");
        assert_eq!(format!("{:?}", Symbol::new("VOO")), "Symbol(VOO)");
    }

    #[test]
    fn strategy_parse_and_filters() {
        assert_eq!("both".parse::<Strategy>(), Ok(Strategy::Both));
        assert_eq!("SELL".parse::<Strategy>(), Ok(Strategy::Sell));
        assert_eq!(" buy ".parse::<Strategy>(), Ok(Strategy::Buy));
        assert!("hold".parse::<Strategy>().is_err());
        assert_eq!(Strategy::default(), Strategy::Both);

        assert!(Strategy::Both.allows_sells() && Strategy::Both.allows_buys());
        assert!(Strategy::Sell.allows_sells() && !Strategy::Sell.allows_buys());
        assert!(!Strategy::Buy.allows_sells() && Strategy::Buy.allows_buys());
    }

    #[test]
    fn trade_type_display() {
        assert_eq!(format!("{}", TradeType::Buy), "BUY");
        assert_eq!(format!("{}", TradeType::Sell), "SELL");
        assert_eq!(TradeType::Sell.direction(), Direction::Decrease);
        assert_eq!(format!("{}", Direction::Neutral), "neutral");
    }
}
