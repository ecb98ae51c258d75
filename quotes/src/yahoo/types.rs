//! Yahoo Finance API response types.

use serde::Deserialize;

use crate::types::{QuoteType, SearchHit};

/// Chart endpoint envelope (`/v8/finance/chart/{symbol}`).
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
}

/// Instrument metadata carried by every chart result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
    #[serde(default)]
    pub previous_close: Option<f64>,
}

/// Error object returned in place of a result.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

impl ChartResponse {
    /// The first result's metadata, or the reason there is none.
    pub fn into_meta(self) -> Result<ChartMeta, String> {
        if let Some(err) = self.chart.error {
            return Err(format!("{}: {}", err.code, err.description));
        }
        self.chart
            .result
            .and_then(|results| results.into_iter().next())
            .map(|r| r.meta)
            .ok_or_else(|| "empty chart result".to_string())
    }
}

impl ChartMeta {
    /// Regular-market price, falling back to the previous close.
    pub fn price(&self) -> Option<f64> {
        self.regular_market_price.or(self.previous_close)
    }
}

/// Search endpoint response (`/v1/finance/search`).
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub quotes: Vec<SearchQuote>,
}

/// One search result. Yahoo spells these fields in lowercase.
#[derive(Debug, Deserialize)]
pub struct SearchQuote {
    pub symbol: String,
    #[serde(default)]
    pub shortname: Option<String>,
    #[serde(default)]
    pub longname: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default, rename = "quoteType")]
    pub quote_type: Option<String>,
}

impl From<SearchQuote> for SearchHit {
    fn from(q: SearchQuote) -> Self {
        SearchHit {
            symbol: q.symbol,
            short_name: q.shortname.or(q.longname),
            exchange: q.exchange,
            quote_type: q
                .quote_type
                .as_deref()
                .map_or(QuoteType::Other, QuoteType::from_code),
        }
    }
}
