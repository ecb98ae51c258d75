//! CLI entry point for the folio rebalancer.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};

use folio::{Currency, JsonFileStore, Strategy};
use folio_quotes::yahoo::YahooClient;
use folio_rebalancer::audit::AuditLog;
use folio_rebalancer::config::Config;
use folio_rebalancer::error::{Error, Result};
use folio_rebalancer::execution::{self, ShowOptions};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio tracker and whole-share rebalancer")]
#[command(version)]
struct Cli {
    /// Path to config.toml
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Value the portfolio at live prices and show the rebalancing plan
    Show {
        /// Which trades to plan: both, sell, or buy
        #[arg(long)]
        strategy: Option<Strategy>,

        /// Display currency (e.g. USD, CAD)
        #[arg(long)]
        currency: Option<Currency>,
    },

    /// Add shares of a symbol at its current price
    Add {
        symbol: String,
        shares: f64,
    },

    /// Set the target allocation (percent) for a held symbol
    Target {
        symbol: String,
        pct: f64,
    },

    /// Remove a symbol from the portfolio
    Remove {
        symbol: String,

        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Search stocks and ETFs by ticker or name
    Search { query: String },

    /// Show the current price of a symbol
    Quote { symbol: String },

    /// Replace the portfolio with three random demo holdings
    Demo {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(&config, cli.command) {
        match &e {
            Error::Aborted(msg) => {
                eprintln!("{msg}");
                process::exit(0);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(e.exit_code());
            }
        }
    }
}

fn run(config: &Config, command: Command) -> Result<()> {
    let quotes = connect_quotes(config)?;
    let mut store = JsonFileStore::new(config.holdings_path());

    match command {
        Command::Show { strategy, currency } => {
            let mut audit = AuditLog::open(&config.audit_path())?;
            let opts = ShowOptions { strategy, currency };
            execution::show(config, &quotes, &mut store, &mut audit, &opts)?;
        }
        Command::Add { symbol, shares } => {
            let mut audit = AuditLog::open(&config.audit_path())?;
            execution::add(&quotes, &mut store, &mut audit, &symbol, shares)?;
        }
        Command::Target { symbol, pct } => {
            let mut audit = AuditLog::open(&config.audit_path())?;
            execution::set_target(&mut store, &mut audit, &symbol, pct)?;
        }
        Command::Remove { symbol, force } => {
            let mut audit = AuditLog::open(&config.audit_path())?;
            execution::remove(&mut store, &mut audit, &symbol, force)?;
        }
        Command::Search { query } => {
            execution::search(&quotes, &query)?;
        }
        Command::Quote { symbol } => {
            execution::quote(&quotes, &symbol)?;
        }
        Command::Demo { force } => {
            let mut audit = AuditLog::open(&config.audit_path())?;
            let mut rng = rand::thread_rng();
            execution::demo(&quotes, &mut store, &mut audit, &mut rng, force)?;
        }
    }

    Ok(())
}

fn connect_quotes(config: &Config) -> Result<YahooClient> {
    let mut client = YahooClient::new(
        Duration::from_secs(config.quotes.timeout_secs),
        &config.quotes.user_agent,
    )?;
    if config.quotes.chart_url.is_some() || config.quotes.search_url.is_some() {
        client = client.with_urls(
            config
                .quotes
                .chart_url
                .as_deref()
                .unwrap_or(folio_quotes::yahoo::client::CHART_URL),
            config
                .quotes
                .search_url
                .as_deref()
                .unwrap_or(folio_quotes::yahoo::client::SEARCH_URL),
        );
    }
    Ok(client)
}
