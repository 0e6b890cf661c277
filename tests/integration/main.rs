//! Integration tests for the Kalshi swipe client.
//!
//! These tests require a running broker proxy plus valid KALSHI_API_KEY and
//! KALSHI_PRIVATE_KEY environment variables.
//! Run with: cargo test --test integration -- --ignored
//!
//! Note: These tests interact with the real Kalshi API through the proxy.

use kalshi_swipe::balance;
use kalshi_swipe::broker::BrokerClient;
use kalshi_swipe::config::Config;
use kalshi_swipe::market::{self, Category};
use rust_decimal::Decimal;

/// Get a test config from environment.
fn test_config() -> Option<Config> {
    // Try to load from environment
    dotenvy::dotenv().ok();

    let api_key = std::env::var("KALSHI_API_KEY").ok()?;
    let private_key = std::env::var("KALSHI_PRIVATE_KEY").ok()?;

    // Skip if using placeholder credentials
    if api_key.starts_with("your-") || private_key.len() < 64 {
        return None;
    }

    Some(Config {
        kalshi_api_key: Some(api_key),
        kalshi_private_key: Some(private_key),
        broker_url: std::env::var("BROKER_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
        category: "nba".to_string(),
        market_limit: 100,
        order_count: 1,
        advance_delay_ms: 0,
        port: 8080,
        rust_log: "info".to_string(),
        verbose: false,
    })
}

/// Test that the proxy returns a parseable balance.
#[tokio::test]
#[ignore = "requires KALSHI_API_KEY and a running broker proxy"]
async fn test_fetch_balance() {
    let config = match test_config() {
        Some(c) => c,
        None => {
            println!("Skipping: KALSHI_API_KEY not set or invalid");
            return;
        }
    };

    let client = BrokerClient::new(&config);
    let credentials = config.credentials().unwrap();

    let result = balance::fetch(&client, &credentials).await;
    assert!(result.is_ok(), "Failed to fetch balance: {:?}", result.err());

    let balance = result.unwrap();
    assert!(balance >= Decimal::ZERO, "Balance should be non-negative");

    println!("Account balance: ${}", balance);
}

/// Test that a live category resolves into non-empty markets.
#[tokio::test]
#[ignore = "requires KALSHI_API_KEY and a running broker proxy"]
async fn test_resolve_live_markets() {
    let config = match test_config() {
        Some(c) => c,
        None => {
            println!("Skipping: KALSHI_API_KEY not set or invalid");
            return;
        }
    };

    let client = BrokerClient::new(&config);
    let credentials = config.credentials();
    let category = Category::from_id(&config.category);

    let resolution =
        market::resolve(&client, &category, credentials.as_ref(), config.market_limit).await;

    assert!(
        !resolution.markets.is_empty(),
        "Resolution should never yield an empty deck"
    );

    println!(
        "Resolved {} market(s) from {}",
        resolution.markets.len(),
        resolution.source
    );
    for m in resolution.markets.iter().take(5) {
        println!("  [{}c] {}", m.price_cents().round(), m.question);
    }
}
