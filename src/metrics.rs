//! Prometheus metrics for latency tracking and monitoring.
//!
//! This module provides metrics for:
//! - Market resolution latency
//! - Balance fetch latency
//! - Order submission latency
//! - Vote, skip, and fallback counters

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// Market resolution latency metric name.
pub const METRIC_MARKET_RESOLVE_LATENCY: &str = "market_resolve_latency_ms";
/// Balance fetch latency metric name.
pub const METRIC_BALANCE_FETCH_LATENCY: &str = "balance_fetch_latency_ms";
/// Order submission latency metric name.
pub const METRIC_ORDER_SUBMIT_LATENCY: &str = "order_submit_latency_ms";
/// Votes cast counter metric name.
pub const METRIC_VOTES_CAST: &str = "votes_cast_total";
/// Skips counter metric name.
pub const METRIC_SKIPS: &str = "skips_total";
/// Orders fired counter metric name.
pub const METRIC_ORDERS_FIRED: &str = "orders_fired_total";
/// Orders failed counter metric name.
pub const METRIC_ORDERS_FAILED: &str = "orders_failed_total";
/// Sample fallback counter metric name.
pub const METRIC_SAMPLE_FALLBACKS: &str = "sample_fallbacks_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    // Latency histograms
    describe_histogram!(
        METRIC_MARKET_RESOLVE_LATENCY,
        "Market listing resolution latency in milliseconds"
    );
    describe_histogram!(
        METRIC_BALANCE_FETCH_LATENCY,
        "Account balance fetch latency in milliseconds"
    );
    describe_histogram!(
        METRIC_ORDER_SUBMIT_LATENCY,
        "Order submission latency in milliseconds"
    );

    // Counters
    describe_counter!(METRIC_VOTES_CAST, "Total number of votes cast");
    describe_counter!(METRIC_SKIPS, "Total number of markets skipped");
    describe_counter!(
        METRIC_ORDERS_FIRED,
        "Total number of orders submitted to the broker"
    );
    describe_counter!(
        METRIC_ORDERS_FAILED,
        "Total number of orders that failed"
    );
    describe_counter!(
        METRIC_SAMPLE_FALLBACKS,
        "Total number of resolutions that fell back to sample data"
    );

    debug!("Metrics initialized");
}

/// Increment the votes cast counter.
pub fn inc_votes_cast() {
    counter!(METRIC_VOTES_CAST).increment(1);
}

/// Increment the skips counter.
pub fn inc_skips() {
    counter!(METRIC_SKIPS).increment(1);
}

/// Increment the orders fired counter.
pub fn inc_orders_fired() {
    counter!(METRIC_ORDERS_FIRED).increment(1);
}

/// Increment the orders failed counter.
pub fn inc_orders_failed() {
    counter!(METRIC_ORDERS_FAILED).increment(1);
}

/// Increment the sample fallback counter.
pub fn inc_sample_fallbacks() {
    counter!(METRIC_SAMPLE_FALLBACKS).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

/// Create a latency timer for market resolution.
pub fn timer_market_resolve() -> LatencyTimer {
    LatencyTimer::new(METRIC_MARKET_RESOLVE_LATENCY)
}

/// Create a latency timer for balance fetching.
pub fn timer_balance_fetch() -> LatencyTimer {
    LatencyTimer::new(METRIC_BALANCE_FETCH_LATENCY)
}

/// Create a latency timer for order submission.
pub fn timer_order_submit() -> LatencyTimer {
    LatencyTimer::new(METRIC_ORDER_SUBMIT_LATENCY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latency_timer_measures_time() {
        let timer = LatencyTimer::new("test_metric");
        sleep(Duration::from_millis(10));
        let elapsed = timer.elapsed_ms();
        assert!(elapsed >= 9.0); // Allow some tolerance
        // Timer will record on drop
    }
}
