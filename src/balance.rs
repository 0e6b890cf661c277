//! Account balance fetching and normalization.
//!
//! The broker proxy does not guarantee a stable balance shape, so the
//! response is probed for a ladder of known field names and normalized into
//! decimal currency units. Balance runs independently of market resolution
//! and never blocks voting; a failure here means the consumer shows a
//! neutral placeholder.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::broker::BrokerClient;
use crate::config::Credentials;
use crate::error::BalanceError;
use crate::metrics;

/// Fetch and normalize the account balance, in dollars.
#[instrument(skip(client, credentials))]
pub async fn fetch(
    client: &BrokerClient,
    credentials: &Credentials,
) -> Result<Decimal, BalanceError> {
    let timer = metrics::timer_balance_fetch();
    let body = client.fetch_balance_raw(credentials).await?;
    drop(timer);

    let balance = normalize(&body)
        .ok_or_else(|| BalanceError::Unparsable(body.to_string()))?;

    debug!(balance = %balance, "Normalized account balance");

    Ok(balance)
}

/// Normalize a raw balance body into decimal currency units.
///
/// Probing ladder: `balance` (cents) → `balance_cents` (cents) →
/// `account_balance` / `portfolio_balance` (already dollars) → first
/// positive numeric field, treated as cents.
pub fn normalize(body: &Value) -> Option<Decimal> {
    for key in ["balance", "balance_cents"] {
        if let Some(cents) = decimal_field(body, key) {
            return Some(cents / Decimal::ONE_HUNDRED);
        }
    }

    for key in ["account_balance", "portfolio_balance"] {
        if let Some(dollars) = decimal_field(body, key) {
            return Some(dollars);
        }
    }

    // Last resort: any positive numeric field is assumed to be cents.
    let map = body.as_object()?;
    for value in map.values() {
        if let Some(number) = as_decimal(value) {
            if number > Decimal::ZERO {
                return Some(number / Decimal::ONE_HUNDRED);
            }
        }
    }

    None
}

/// Read a named field as a decimal, accepting numbers or numeric strings.
fn decimal_field(body: &Value, key: &str) -> Option<Decimal> {
    body.get(key).and_then(as_decimal)
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    if let Some(s) = value.as_str() {
        return s.parse().ok();
    }
    if let Some(i) = value.as_i64() {
        return Some(Decimal::from(i));
    }
    value.as_f64().and_then(|f| Decimal::try_from(f).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn balance_field_is_cents() {
        assert_eq!(normalize(&json!({"balance": 5000})), Some(dec!(50)));
        assert_eq!(normalize(&json!({"balance": "5000"})), Some(dec!(50)));
    }

    #[test]
    fn balance_cents_field_is_cents() {
        assert_eq!(normalize(&json!({"balance_cents": 1234})), Some(dec!(12.34)));
    }

    #[test]
    fn account_and_portfolio_balances_are_already_dollars() {
        assert_eq!(
            normalize(&json!({"account_balance": 50.25})),
            Some(dec!(50.25))
        );
        assert_eq!(
            normalize(&json!({"portfolio_balance": 7.5})),
            Some(dec!(7.5))
        );
    }

    #[test]
    fn unrelated_positive_numeric_field_is_treated_as_cents() {
        assert_eq!(normalize(&json!({"note": "hi", "funds": 250})), Some(dec!(2.5)));
    }

    #[test]
    fn named_keys_win_over_the_positional_fallback() {
        let body = json!({"other": 999999, "balance": 5000});
        assert_eq!(normalize(&body), Some(dec!(50)));
    }

    #[test]
    fn bodies_without_usable_numbers_are_rejected() {
        assert_eq!(normalize(&json!({})), None);
        assert_eq!(normalize(&json!({"note": "hello"})), None);
        assert_eq!(normalize(&json!({"delta": -5})), None);
        assert_eq!(normalize(&json!("just a string")), None);
    }

    #[tokio::test]
    async fn fetch_normalizes_the_proxy_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/balance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"balance": 5000})))
            .mount(&server)
            .await;

        let client = BrokerClient::with_base_url(server.uri());
        let credentials = Credentials::new("key-id", "pem");

        let balance = fetch(&client, &credentials).await.unwrap();
        assert_eq!(balance, dec!(50));
    }

    #[tokio::test]
    async fn fetch_surfaces_broker_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/balance"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "bad credentials"})),
            )
            .mount(&server)
            .await;

        let client = BrokerClient::with_base_url(server.uri());
        let credentials = Credentials::new("key-id", "pem");

        let err = fetch(&client, &credentials).await.unwrap_err();
        assert!(err.to_string().contains("bad credentials"));
    }

    #[tokio::test]
    async fn fetch_rejects_unparsable_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/balance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"note": "hello"})))
            .mount(&server)
            .await;

        let client = BrokerClient::with_base_url(server.uri());
        let credentials = Credentials::new("key-id", "pem");

        let err = fetch(&client, &credentials).await.unwrap_err();
        assert!(matches!(err, BalanceError::Unparsable(_)));
    }
}
