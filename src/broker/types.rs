//! Wire types for the broker proxy's JSON endpoints.

use serde::{Deserialize, Serialize};

use crate::config::Credentials;

/// Body for the balance endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRequest<'a> {
    /// Broker API key id.
    pub api_key: &'a str,
    /// Broker private key.
    pub private_key: &'a str,
}

impl<'a> BalanceRequest<'a> {
    /// Build the request body from credentials.
    pub fn new(credentials: &'a Credentials) -> Self {
        Self {
            api_key: &credentials.api_key,
            private_key: &credentials.private_key,
        }
    }
}

/// Body for the market listing endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMarketsRequest<'a> {
    /// Broker API key id.
    pub api_key: &'a str,
    /// Broker private key.
    pub private_key: &'a str,
    /// Series ticker to list markets for.
    pub series_ticker: &'a str,
    /// Page size bound.
    pub limit: u32,
}

/// Body for the order placement endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest<'a> {
    /// Broker API key id.
    pub api_key: &'a str,
    /// Broker private key.
    pub private_key: &'a str,
    /// Market ticker to trade.
    pub ticker: &'a str,
    /// Order side: "yes" or "no".
    pub side: &'a str,
    /// Number of contracts.
    pub count: u32,
}

/// A raw market record as the broker reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMarket {
    /// Broker's opaque market ticker.
    pub ticker: String,
    /// Human-readable title, when the broker supplies one.
    pub title: Option<String>,
    /// Best YES bid in cents.
    pub yes_bid: Option<i64>,
    /// Best NO bid in cents.
    pub no_bid: Option<i64>,
    /// Best YES ask in cents.
    pub yes_ask: Option<i64>,
    /// Best NO ask in cents.
    pub no_ask: Option<i64>,
}

/// Response from the market listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsResponse {
    /// Listed markets.
    #[serde(default)]
    pub markets: Vec<RawMarket>,
}

/// Error envelope the broker proxy attaches to failure responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Broker-reported error message, if any.
    pub error: Option<String>,
}

impl ErrorBody {
    /// Broker message if present, otherwise a generic status line.
    pub fn message_or_status(&self, status: reqwest::StatusCode) -> String {
        match &self.error {
            Some(message) if !message.is_empty() => message.clone(),
            _ => format!("HTTP {}", status),
        }
    }
}
