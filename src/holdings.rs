//! Holdings store: the persisted list of positions and its mutations.
//!
//! The engine only ever sees a loaded snapshot. Callers serialize mutations
//! against the same store (one update at a time per portfolio).

use crate::error::{HoldingsError, StoreError};
use crate::position::Position;
use crate::types::Symbol;

/// Ordered positions, at most one per symbol.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Holdings {
    positions: Vec<Position>,
}

impl Holdings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&Position> {
        self.positions.iter().find(|p| p.symbol == *symbol)
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.positions.iter().map(|p| p.symbol).collect()
    }

    /// Sum of target percentages across all positions.
    pub fn target_sum(&self) -> f64 {
        self.positions.iter().map(|p| p.target_pct).sum()
    }

    /// Add shares of `symbol` at the quoted `price`.
    ///
    /// If the symbol is already held the shares are merged into the existing
    /// position and its target is kept; otherwise a new position is appended
    /// with a target of 0.
    pub fn add(&mut self, symbol: Symbol, shares: f64, price: f64) -> Result<(), HoldingsError> {
        Position::validate_shares(shares)?;
        Position::validate_price(price)?;

        match self.positions.iter_mut().find(|p| p.symbol == symbol) {
            Some(existing) => existing.shares += shares,
            None => self.positions.push(Position::new(symbol, shares, price)),
        }
        Ok(())
    }

    /// Set the target allocation for a held symbol.
    ///
    /// Returns `Ok(false)` if the symbol is not held.
    pub fn set_target(&mut self, symbol: &Symbol, target_pct: f64) -> Result<bool, HoldingsError> {
        Position::validate_target(target_pct)?;
        match self.positions.iter_mut().find(|p| p.symbol == *symbol) {
            Some(pos) => {
                pos.target_pct = target_pct;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a symbol. Returns whether anything was removed.
    pub fn remove(&mut self, symbol: &Symbol) -> bool {
        let before = self.positions.len();
        self.positions.retain(|p| p.symbol != *symbol);
        self.positions.len() != before
    }
}

impl From<Vec<Position>> for Holdings {
    fn from(positions: Vec<Position>) -> Self {
        let mut holdings = Holdings::new();
        for pos in positions {
            match holdings.positions.iter_mut().find(|p| p.symbol == pos.symbol) {
                Some(existing) => existing.shares += pos.shares,
                None => holdings.positions.push(pos),
            }
        }
        holdings
    }
}

/// Persistence boundary for holdings.
pub trait HoldingsStore {
    /// Load the current holdings snapshot.
    fn load(&self) -> Result<Holdings, StoreError>;

    /// Replace the stored holdings.
    fn save(&mut self, holdings: &Holdings) -> Result<(), StoreError>;
}

/// Holdings kept in process memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    holdings: Holdings,
}

impl MemoryStore {
    pub fn new(holdings: Holdings) -> Self {
        Self { holdings }
    }
}

impl HoldingsStore for MemoryStore {
    fn load(&self) -> Result<Holdings, StoreError> {
        Ok(self.holdings.clone())
    }

    fn save(&mut self, holdings: &Holdings) -> Result<(), StoreError> {
        self.holdings = holdings.clone();
        Ok(())
    }
}

/// Holdings stored as a pretty-printed JSON array of positions.
#[cfg(feature = "persistence")]
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(feature = "persistence")]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(feature = "persistence")]
impl HoldingsStore for JsonFileStore {
    /// A missing file is an empty portfolio.
    fn load(&self) -> Result<Holdings, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Holdings::new()),
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        if json.trim().is_empty() {
            return Ok(Holdings::new());
        }
        let positions: Vec<Position> = serde_json::from_str(&json)?;
        Ok(Holdings::from(positions))
    }

    fn save(&mut self, holdings: &Holdings) -> Result<(), StoreError> {
        let write_err = |e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let json = serde_json::to_string_pretty(holdings)?;
        std::fs::write(&self.path, json).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aapl() -> Symbol {
        Symbol::new("AAPL")
    }
    fn msft() -> Symbol {
        Symbol::new("MSFT")
    }

    #[test]
    fn add_appends_with_zero_target() {
        let mut holdings = Holdings::new();
        holdings.add(Symbol::new("aapl"), 10.0, 150.0).unwrap();

        assert_eq!(holdings.len(), 1);
        let pos = holdings.get(&aapl()).unwrap();
        assert_eq!(pos.symbol.as_str(), "AAPL");
        assert_eq!(pos.shares, 10.0);
        assert_eq!(pos.target_pct, 0.0);
    }

    #[test]
    fn add_merges_existing_symbol() {
        let mut holdings = Holdings::new();
        holdings.add(aapl(), 10.0, 150.0).unwrap();
        holdings.set_target(&aapl(), 40.0).unwrap();
        holdings.add(aapl(), 2.5, 160.0).unwrap();

        assert_eq!(holdings.len(), 1);
        let pos = holdings.get(&aapl()).unwrap();
        assert_eq!(pos.shares, 12.5);
        assert_eq!(pos.price, 150.0);
        assert_eq!(pos.target_pct, 40.0);
    }

    #[test]
    fn add_rejects_bad_shares() {
        let mut holdings = Holdings::new();
        assert_eq!(
            holdings.add(aapl(), -1.0, 150.0),
            Err(HoldingsError::InvalidShares(-1.0))
        );
        assert!(holdings.add(aapl(), 1.0, 0.0).is_err());
        assert!(holdings.is_empty());
    }

    #[test]
    fn set_target_unknown_symbol() {
        let mut holdings = Holdings::new();
        holdings.add(aapl(), 1.0, 1.0).unwrap();
        assert_eq!(holdings.set_target(&msft(), 10.0), Ok(false));
        assert!(holdings.set_target(&aapl(), 101.0).is_err());
        assert_eq!(holdings.set_target(&aapl(), 100.0), Ok(true));
        assert_eq!(holdings.target_sum(), 100.0);
    }

    #[test]
    fn remove_by_symbol() {
        let mut holdings = Holdings::new();
        holdings.add(aapl(), 1.0, 1.0).unwrap();
        holdings.add(msft(), 1.0, 1.0).unwrap();

        assert!(holdings.remove(&Symbol::new("aapl")));
        assert!(!holdings.remove(&aapl()));
        assert_eq!(holdings.symbols(), vec![msft()]);
    }

    #[test]
    fn from_vec_merges_duplicates() {
        let holdings = Holdings::from(vec![
            Position::new(aapl(), 1.0, 1.0),
            Position::new(msft(), 2.0, 1.0),
            Position::new(aapl(), 3.0, 1.0),
        ]);
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings.get(&aapl()).unwrap().shares, 4.0);
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::default();
        assert!(store.load().unwrap().is_empty());

        let mut holdings = Holdings::new();
        holdings.add(aapl(), 5.0, 10.0).unwrap();
        store.save(&holdings).unwrap();

        assert_eq!(store.load().unwrap(), holdings);
    }
}

#[cfg(all(test, feature = "persistence"))]
mod persistence_tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nope.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("holdings.json");
        let mut store = JsonFileStore::new(&path);

        let mut holdings = Holdings::new();
        holdings.add(Symbol::new("VOO"), 3.0, 480.12).unwrap();
        holdings.set_target(&Symbol::new("VOO"), 100.0).unwrap();
        store.save(&holdings).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, holdings);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"symbol\": \"VOO\""));
    }

    #[test]
    fn target_defaults_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.json");
        std::fs::write(&path, r#"[{"symbol":"spy","shares":2,"price":500.0}]"#).unwrap();

        let loaded = JsonFileStore::new(&path).load().unwrap();
        let pos = loaded.get(&Symbol::new("SPY")).unwrap();
        assert_eq!(pos.target_pct, 0.0);
        assert_eq!(pos.shares, 2.0);
    }

    #[test]
    fn corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }
}
