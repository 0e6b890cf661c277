//! Broker proxy boundary: HTTP client and wire types.

pub mod client;
pub mod types;

pub use client::BrokerClient;
pub use types::RawMarket;
