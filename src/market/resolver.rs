//! Market resolution: live broker listing with deterministic sample fallback.

use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use crate::broker::{BrokerClient, RawMarket};
use crate::config::Credentials;
use crate::error::MarketError;
use crate::metrics;

use super::samples;
use super::ticker;
use super::types::{series_for, Category, Market};

/// Where a resolution's markets came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResolutionSource {
    /// Live broker listing.
    Live,
    /// Static sample data.
    Sample,
}

/// Outcome of resolving a category into an ordered market list.
///
/// Resolution never fails: the worst case is the sample list plus the error
/// message that forced the fallback, retained for display in the loading
/// state only.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Ordered markets for the session.
    pub markets: Vec<Market>,
    /// Live or sample data.
    pub source: ResolutionSource,
    /// Message of the failure that forced a sample fallback, if any.
    pub error: Option<String>,
    /// When the resolution completed.
    pub resolved_at: OffsetDateTime,
}

impl Resolution {
    fn sample(category: &Category, error: Option<String>) -> Self {
        Self {
            markets: samples::for_category(category.id),
            source: ResolutionSource::Sample,
            error,
            resolved_at: OffsetDateTime::now_utc(),
        }
    }

    fn live(markets: Vec<Market>) -> Self {
        Self {
            markets,
            source: ResolutionSource::Live,
            error: None,
            resolved_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Resolve a category into an ordered market list.
///
/// Prefers a single live listing bounded to `limit` records; falls back to
/// the category's fixed sample list when credentials are incomplete, the
/// listing fails at any level, or the transformed listing is empty. The
/// caller always receives a usable list.
#[instrument(skip(client, credentials), fields(category = %category.id))]
pub async fn resolve(
    client: &BrokerClient,
    category: &Category,
    credentials: Option<&Credentials>,
    limit: u32,
) -> Resolution {
    let credentials = match credentials {
        Some(c) if c.is_complete() => c,
        _ => {
            debug!("No credentials, using sample markets");
            return Resolution::sample(category, None);
        }
    };

    let series = series_for(category.id);
    let timer = metrics::timer_market_resolve();

    match client.list_markets(credentials, series, limit).await {
        Ok(raw_markets) => {
            drop(timer);
            let markets: Vec<Market> = raw_markets.into_iter().map(to_market).collect();

            if markets.is_empty() {
                let err = MarketError::EmptyListing {
                    series: series.to_string(),
                };
                warn!(error = %err, "Empty live listing, falling back to samples");
                metrics::inc_sample_fallbacks();
                return Resolution::sample(category, Some(err.to_string()));
            }

            info!(count = markets.len(), series = %series, "Resolved live markets");
            Resolution::live(markets)
        }
        Err(err) => {
            drop(timer);
            warn!(error = %err, series = %series, "Live listing failed, falling back to samples");
            metrics::inc_sample_fallbacks();
            Resolution::sample(category, Some(err.to_string()))
        }
    }
}

/// Transform a raw broker record into a swipeable market.
///
/// The display price is the YES bid in probability units, defaulting to even
/// odds when the broker reports none.
fn to_market(raw: RawMarket) -> Market {
    let parsed = ticker::parse(&raw.ticker, raw.title.as_deref());

    let price = raw
        .yes_bid
        .map(|bid| Decimal::new(bid, 2))
        .unwrap_or(Market::DEFAULT_PRICE);

    let cents = |v: Option<i64>| v.map(Decimal::from);

    Market {
        question: parsed.question,
        ticker: Some(raw.ticker),
        team_name: (!parsed.team_name.is_empty()).then_some(parsed.team_name),
        match_info: (!parsed.match_info.is_empty()).then_some(parsed.match_info),
        price,
        yes_bid: cents(raw.yes_bid),
        no_bid: cents(raw.no_bid),
        yes_ask: cents(raw.yes_ask),
        no_ask: cents(raw.no_ask),
    }
}
