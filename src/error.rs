//! Unified error types for the swipe client.

use thiserror::Error;

/// Unified error type for the swipe client.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Market resolution error.
    #[error("market error: {0}")]
    Market(#[from] MarketError),

    /// Balance lookup error.
    #[error("balance error: {0}")]
    Balance(#[from] BalanceError),

    /// Order placement error.
    #[error("order error: {0}")]
    Order(#[from] OrderError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Market listing and resolution errors.
///
/// None of these surface past the resolver: every variant is recovered by
/// falling back to the static sample data for the category.
#[derive(Error, Debug)]
pub enum MarketError {
    /// Broker rejected or failed the listing request.
    #[error("failed to list markets for {series}: {reason}")]
    ListingFailed {
        /// Series ticker the listing was issued for.
        series: String,
        /// Reason, preferring the broker's reported error message.
        reason: String,
    },

    /// Broker returned a listing with no usable markets.
    #[error("broker returned no markets for {series}")]
    EmptyListing {
        /// Series ticker the listing was issued for.
        series: String,
    },

    /// Failed to parse the listing response body.
    #[error("failed to parse market data: {0}")]
    ParseError(String),

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Balance lookup errors.
#[derive(Error, Debug)]
pub enum BalanceError {
    /// Broker rejected or failed the balance request.
    #[error("balance request failed: {0}")]
    RequestFailed(String),

    /// Response body had no recognizable balance field.
    #[error("no balance field in response: {0}")]
    Unparsable(String),

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Order placement errors.
///
/// Order placement is fire-and-forget: these are logged by the session
/// engine and never returned to the voting flow.
#[derive(Error, Debug)]
pub enum OrderError {
    /// Order submission failed.
    #[error("order submission failed: {0}")]
    SubmissionFailed(String),

    /// Broker rejected the order.
    #[error("order rejected: {reason}")]
    Rejected {
        /// Rejection reason from the broker.
        reason: String,
    },

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
