//! Yahoo Finance REST client.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use super::types::{ChartMeta, ChartResponse, SearchResponse};
use crate::error::QuoteError;

pub const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Yahoo rejects requests without a browser-like user agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) folio/0.3";

/// Blocking Yahoo Finance client.
pub struct YahooClient {
    client: Client,
    chart_url: String,
    search_url: String,
}

impl YahooClient {
    /// Create a client against the public endpoints.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| QuoteError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            chart_url: CHART_URL.to_string(),
            search_url: SEARCH_URL.to_string(),
        })
    }

    /// Point the client at different endpoints (mirrors, test servers).
    pub fn with_urls(mut self, chart_url: &str, search_url: &str) -> Self {
        self.chart_url = chart_url.trim_end_matches('/').to_string();
        self.search_url = search_url.to_string();
        self
    }

    /// Latest daily chart metadata for a Yahoo ticker (GET /v8/finance/chart/{ticker}).
    pub fn chart(&self, ticker: &str) -> Result<ChartMeta, QuoteError> {
        let url = format!("{}/{ticker}", self.chart_url);
        debug!("GET {url}");

        let resp = self
            .client
            .get(&url)
            .query(&[("interval", "1d"), ("range", "1d")])
            .send()
            .map_err(|e| QuoteError::Connection(format!("chart request failed: {e}")))?;

        // Unknown tickers come back as 404 with an error body worth reading
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| QuoteError::Connection(format!("failed to read chart body: {e}")))?;

        let parsed: ChartResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(QuoteError::Connection(format!(
                    "chart returned {status}: {body}"
                )));
            }
            Err(e) => {
                return Err(QuoteError::Parse(format!("failed to parse chart: {e}")));
            }
        };

        parsed.into_meta().map_err(QuoteError::Parse)
    }

    /// Search instruments by text (GET /v1/finance/search).
    pub fn search_quotes(&self, query: &str) -> Result<SearchResponse, QuoteError> {
        debug!("GET {} q={query}", self.search_url);

        let resp = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("quotesCount", "10"), ("newsCount", "0")])
            .send()
            .map_err(|e| QuoteError::Connection(format!("search request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(QuoteError::Connection(format!(
                "search returned {status}: {body}"
            )));
        }

        resp.json::<SearchResponse>()
            .map_err(|e| QuoteError::Parse(format!("failed to parse search: {e}")))
    }
}
