//! TOML configuration loading and validation.

use std::path::{Path, PathBuf};

use folio::{Currency, Strategy};
use folio_quotes::yahoo::client;
use log::info;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub quotes: QuotesConfig,
    pub portfolio: PortfolioConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuotesConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Override for the chart endpoint (mirrors, test servers).
    pub chart_url: Option<String>,
    /// Override for the search endpoint.
    pub search_url: Option<String>,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            chart_url: None,
            search_url: None,
        }
    }
}

fn default_timeout() -> u64 {
    client::DEFAULT_TIMEOUT.as_secs()
}
fn default_user_agent() -> String {
    client::DEFAULT_USER_AGENT.into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub holdings_file: String,
    /// Currency that quotes and stored prices are denominated in.
    pub base_currency: Currency,
    /// Currency plans are displayed in unless `--currency` is given.
    pub display_currency: Currency,
    pub strategy: Strategy,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            holdings_file: default_holdings_file(),
            base_currency: Currency::USD,
            display_currency: Currency::USD,
            strategy: Strategy::Both,
        }
    }
}

fn default_holdings_file() -> String {
    "holdings.json".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: String,
    pub audit_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Config {
    /// Load config from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if self.quotes.timeout_secs == 0 {
            return Err(Error::Config("quotes.timeout_secs must be > 0".into()));
        }
        if self.quotes.user_agent.trim().is_empty() {
            return Err(Error::Config("quotes.user_agent must not be empty".into()));
        }
        if self.portfolio.holdings_file.trim().is_empty() {
            return Err(Error::Config(
                "portfolio.holdings_file must not be empty".into(),
            ));
        }
        if self.logging.audit_file.trim().is_empty() {
            return Err(Error::Config("logging.audit_file must not be empty".into()));
        }
        Ok(())
    }

    /// Path of the JSON holdings file.
    pub fn holdings_path(&self) -> PathBuf {
        PathBuf::from(&self.portfolio.holdings_file)
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_toml() -> &'static str {
        r#"
[quotes]
timeout_secs = 5
user_agent = "folio-test"

[portfolio]
holdings_file = "data/holdings.json"
base_currency = "USD"
display_currency = "cad"
strategy = "sell"

[logging]
dir = "./logs"
audit_file = "audit.jsonl"
"#
    }

    #[test]
    fn parse_example_config() {
        let config = Config::from_toml(example_toml()).unwrap();
        assert_eq!(config.quotes.timeout_secs, 5);
        assert_eq!(config.quotes.chart_url, None);
        assert_eq!(config.portfolio.base_currency, Currency::USD);
        assert_eq!(config.portfolio.display_currency, Currency::CAD);
        assert_eq!(config.portfolio.strategy, Strategy::Sell);
        assert_eq!(
            config.holdings_path(),
            PathBuf::from("data/holdings.json")
        );
    }

    #[test]
    fn empty_document_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.quotes.timeout_secs, 10);
        assert_eq!(config.portfolio.holdings_file, "holdings.json");
        assert_eq!(config.portfolio.strategy, Strategy::Both);
        assert_eq!(config.portfolio.display_currency, Currency::USD);
    }

    #[test]
    fn partial_section_keeps_defaults() {
        let config = Config::from_toml("[portfolio]\nstrategy = \"buy\"\n").unwrap();
        assert_eq!(config.portfolio.strategy, Strategy::Buy);
        assert_eq!(config.portfolio.holdings_file, "holdings.json");
    }

    #[test]
    fn validate_catches_zero_timeout() {
        assert!(Config::from_toml("[quotes]\ntimeout_secs = 0\n").is_err());
    }

    #[test]
    fn validate_catches_empty_holdings_file() {
        let mut config = Config::default();
        config.portfolio.holdings_file = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_currency_is_parse_error() {
        let err = Config::from_toml("[portfolio]\nbase_currency = \"DOLLARS\"\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.audit_path(), PathBuf::from("./logs/audit.jsonl"));
    }
}
