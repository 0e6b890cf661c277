//! Kalshi swipe-voting client.
//!
//! This library implements a card-deck voting flow over Kalshi sports
//! markets: a category resolves into an ordered list of markets (live via a
//! broker proxy, or a static sample list when the broker is unreachable),
//! and the user swipes through them voting yes or no. A vote on a live
//! market fires a one-contract order in the background and never blocks the
//! deck from advancing.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`broker`]: Broker proxy HTTP client and wire types
//! - [`market`]: Category catalog, ticker parsing, listing resolution
//! - [`balance`]: Account balance fetching and normalization
//! - [`session`]: Swipe session state machine
//! - [`api`]: HTTP API for health/metrics
//! - [`metrics`]: Prometheus metrics

pub mod api;
pub mod balance;
pub mod broker;
pub mod config;
pub mod error;
pub mod market;
pub mod metrics;
pub mod session;

pub use config::Config;
pub use error::{AppError, Result};
