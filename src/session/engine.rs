//! Swipe session state machine.
//!
//! A session moves through three phases: `Loading` while a market listing is
//! being resolved, `Active` while the user works through the deck, and
//! `Complete` once the cursor has passed the last market. Votes on live
//! markets fire a one-contract order in the background; order failures are
//! logged and never block the session from advancing.
//!
//! Listings resolve asynchronously, so each load is stamped with a
//! generation number. A resolution carrying a stale generation (the session
//! was reloaded while it was in flight) is discarded.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::broker::BrokerClient;
use crate::config::{Config, Credentials};
use crate::market::{Market, Resolution, ResolutionSource, VoteDirection};
use crate::metrics;

/// Lifecycle phase of a swipe session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// A market listing is being resolved.
    Loading,
    /// Markets are loaded and the cursor points at the current one.
    Active,
    /// Every market has been voted on or skipped.
    Complete,
}

/// Running count of votes cast, by direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Number of yes votes.
    pub yes: u32,
    /// Number of no votes.
    pub no: u32,
}

impl Tally {
    /// Total number of votes cast in either direction.
    pub fn total(&self) -> u32 {
        self.yes + self.no
    }
}

/// Point-in-time view of a session, safe to hand to the HTTP layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Current lifecycle phase.
    pub phase: SessionPhase,
    /// Index of the current market within the deck.
    pub cursor: usize,
    /// Number of markets in the deck.
    pub total_markets: usize,
    /// Vote counts so far.
    pub tally: Tally,
    /// Where the deck came from.
    pub source: ResolutionSource,
    /// Question text of the market under the cursor, if any.
    pub current_question: Option<String>,
}

/// End-of-session summary.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Vote counts for the session.
    pub tally: Tally,
    /// Number of markets skipped.
    pub skipped: u32,
    /// Number of markets in the deck.
    pub total_markets: usize,
    /// Where the deck came from.
    pub source: ResolutionSource,
}

/// The swipe session engine.
pub struct SwipeSession {
    client: Arc<BrokerClient>,
    credentials: Option<Credentials>,
    order_count: u32,
    advance_delay: Duration,
    phase: SessionPhase,
    generation: u64,
    markets: Vec<Market>,
    source: ResolutionSource,
    cursor: usize,
    tally: Tally,
    skipped: u32,
    last_vote: Option<VoteDirection>,
}

impl SwipeSession {
    /// Create a session from application config and a shared broker client.
    pub fn new(config: &Config, client: Arc<BrokerClient>) -> Self {
        Self {
            client,
            credentials: config.credentials(),
            order_count: config.order_count,
            advance_delay: Duration::from_millis(config.advance_delay_ms),
            phase: SessionPhase::Loading,
            generation: 0,
            markets: Vec::new(),
            source: ResolutionSource::Sample,
            cursor: 0,
            tally: Tally::default(),
            skipped: 0,
            last_vote: None,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Vote counts so far.
    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Index of the current market within the deck.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The market under the cursor, if the session is active.
    pub fn current_market(&self) -> Option<&Market> {
        if self.phase == SessionPhase::Active {
            self.markets.get(self.cursor)
        } else {
            None
        }
    }

    /// The vote cast on the current market, cleared on advance.
    pub fn last_vote(&self) -> Option<VoteDirection> {
        self.last_vote
    }

    /// Begin loading a new deck, invalidating any resolution still in
    /// flight. Returns the generation the eventual resolution must carry.
    pub fn begin_loading(&mut self) -> u64 {
        self.generation += 1;
        self.phase = SessionPhase::Loading;
        self.markets.clear();
        self.cursor = 0;
        self.tally = Tally::default();
        self.skipped = 0;
        self.last_vote = None;
        debug!(generation = self.generation, "Session loading");
        self.generation
    }

    /// Install a resolved market listing.
    ///
    /// Returns `false` when `generation` is stale, in which case the
    /// resolution is discarded and the session state is untouched.
    pub fn apply_resolution(&mut self, generation: u64, resolution: Resolution) -> bool {
        if generation != self.generation {
            debug!(
                stale = generation,
                current = self.generation,
                "Discarding stale market resolution"
            );
            return false;
        }

        info!(
            markets = resolution.markets.len(),
            source = %resolution.source,
            "Session deck loaded"
        );

        self.markets = resolution.markets;
        self.source = resolution.source;
        self.cursor = 0;
        self.phase = if self.markets.is_empty() {
            SessionPhase::Complete
        } else {
            SessionPhase::Active
        };
        true
    }

    /// Vote on the current market and advance.
    ///
    /// A yes/no vote on a live market fires a one-contract order in the
    /// background; the session never waits on, or fails because of, the
    /// order. Returns `false` when the session is not active.
    #[instrument(skip(self), fields(cursor = self.cursor))]
    pub async fn vote(&mut self, direction: VoteDirection) -> bool {
        let live_ticker = match self.current_market() {
            Some(market) if market.is_live() => market.ticker.clone(),
            Some(_) => None,
            None => {
                warn!(phase = ?self.phase, "Vote rejected outside active session");
                return false;
            }
        };

        self.last_vote = Some(direction);
        match direction {
            VoteDirection::Yes => self.tally.yes += 1,
            VoteDirection::No => self.tally.no += 1,
        }
        metrics::inc_votes_cast();

        if let (Some(ticker), Some(credentials)) = (live_ticker, &self.credentials) {
            self.fire_order(ticker, credentials.clone(), direction);
        }

        if !self.advance_delay.is_zero() {
            tokio::time::sleep(self.advance_delay).await;
        }

        self.advance();
        true
    }

    /// Skip the current market without voting. Advances immediately.
    pub fn skip(&mut self) -> bool {
        if self.current_market().is_none() {
            warn!(phase = ?self.phase, "Skip rejected outside active session");
            return false;
        }

        self.skipped += 1;
        metrics::inc_skips();
        self.advance();
        true
    }

    /// Summary of the session so far.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            tally: self.tally,
            skipped: self.skipped,
            total_markets: self.markets.len(),
            source: self.source,
        }
    }

    /// Point-in-time view for the HTTP status endpoint.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            cursor: self.cursor,
            total_markets: self.markets.len(),
            tally: self.tally,
            source: self.source,
            current_question: self.current_market().map(|m| m.question.clone()),
        }
    }

    /// Restart the session with a freshly resolved deck; markets are never
    /// cached across runs. Only valid once the session is complete. Returns
    /// the generation for the new load, exactly as [`Self::begin_loading`]
    /// does, or `None` when the session is not complete.
    pub fn reset(&mut self) -> Option<u64> {
        if self.phase != SessionPhase::Complete {
            warn!(phase = ?self.phase, "Reset rejected before completion");
            return None;
        }

        info!("Session reset");
        Some(self.begin_loading())
    }

    /// Submit a one-contract order without blocking the session.
    fn fire_order(&self, ticker: String, credentials: Credentials, direction: VoteDirection) {
        let client = Arc::clone(&self.client);
        let count = self.order_count;
        metrics::inc_orders_fired();

        tokio::spawn(async move {
            let timer = metrics::timer_order_submit();
            match client
                .place_order(&credentials, &ticker, direction, count)
                .await
            {
                Ok(()) => {
                    info!(ticker = %ticker, side = %direction, count, "Order submitted");
                }
                Err(e) => {
                    metrics::inc_orders_failed();
                    warn!(ticker = %ticker, side = %direction, error = %e, "Order failed");
                }
            }
            drop(timer);
        });
    }

    /// Move the cursor past the current market, completing the session
    /// when the deck is exhausted.
    fn advance(&mut self) {
        self.cursor += 1;
        self.last_vote = None;
        if self.cursor >= self.markets.len() {
            self.phase = SessionPhase::Complete;
            info!(
                yes = self.tally.yes,
                no = self.tally.no,
                skipped = self.skipped,
                "Session complete"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market;
    use serde_json::json;
    use time::OffsetDateTime;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> Config {
        Config {
            kalshi_api_key: Some("key-id".to_string()),
            kalshi_private_key: Some("pem".to_string()),
            broker_url: "http://127.0.0.1:1/api".to_string(),
            category: "nba".to_string(),
            market_limit: 100,
            order_count: 1,
            advance_delay_ms: 0,
            port: 8080,
            rust_log: "info".to_string(),
            verbose: false,
        }
    }

    fn session_with_url(base_url: &str) -> SwipeSession {
        let mut config = test_config();
        config.broker_url = base_url.to_string();
        let client = Arc::new(BrokerClient::with_base_url(base_url.to_string()));
        SwipeSession::new(&config, client)
    }

    fn sample_resolution() -> Resolution {
        Resolution {
            markets: market::samples::for_category("nba"),
            source: ResolutionSource::Sample,
            error: None,
            resolved_at: OffsetDateTime::now_utc(),
        }
    }

    fn live_resolution(tickers: &[&str]) -> Resolution {
        let markets = tickers
            .iter()
            .map(|t| {
                let mut m = Market::sample(format!("Will {t} resolve yes?"), Market::DEFAULT_PRICE);
                m.ticker = Some(t.to_string());
                m
            })
            .collect();
        Resolution {
            markets,
            source: ResolutionSource::Live,
            error: None,
            resolved_at: OffsetDateTime::now_utc(),
        }
    }

    fn loaded_session() -> SwipeSession {
        let mut session = session_with_url("http://127.0.0.1:1");
        let generation = session.begin_loading();
        assert!(session.apply_resolution(generation, sample_resolution()));
        session
    }

    #[test]
    fn new_session_starts_loading() {
        let session = session_with_url("http://127.0.0.1:1");
        assert_eq!(session.phase(), SessionPhase::Loading);
        assert!(session.current_market().is_none());
    }

    #[test]
    fn applying_a_resolution_activates_the_session() {
        let session = loaded_session();
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.cursor(), 0);
        assert!(session.current_market().is_some());
    }

    #[test]
    fn stale_resolutions_are_discarded() {
        let mut session = session_with_url("http://127.0.0.1:1");
        let first = session.begin_loading();
        let second = session.begin_loading();
        assert_ne!(first, second);

        assert!(!session.apply_resolution(first, sample_resolution()));
        assert_eq!(session.phase(), SessionPhase::Loading);

        assert!(session.apply_resolution(second, sample_resolution()));
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[tokio::test]
    async fn votes_accumulate_in_the_tally() {
        let mut session = loaded_session();

        assert!(session.vote(VoteDirection::Yes).await);
        assert!(session.vote(VoteDirection::No).await);
        assert!(session.vote(VoteDirection::Yes).await);

        let tally = session.tally();
        assert_eq!(tally.yes, 2);
        assert_eq!(tally.no, 1);
        assert_eq!(session.cursor(), 3);
        assert_eq!(tally.total() as usize, session.cursor());
    }

    #[tokio::test]
    async fn skips_advance_without_counting_votes() {
        let mut session = loaded_session();

        assert!(session.skip());
        assert!(session.vote(VoteDirection::Yes).await);
        assert!(session.skip());

        assert_eq!(session.tally().total(), 1);
        assert_eq!(session.cursor(), 3);
        assert_eq!(session.summary().skipped, 2);
    }

    #[tokio::test]
    async fn exhausting_the_deck_completes_the_session() {
        let mut session = loaded_session();
        let total = session.summary().total_markets;

        for _ in 0..total {
            assert!(session.vote(VoteDirection::Yes).await);
        }

        assert_eq!(session.phase(), SessionPhase::Complete);
        assert!(session.current_market().is_none());
        assert!(!session.vote(VoteDirection::No).await);
        assert!(!session.skip());
        assert_eq!(session.tally().yes, total as u32);
    }

    #[tokio::test]
    async fn reset_is_only_valid_from_complete() {
        let mut session = loaded_session();
        assert!(session.reset().is_none());

        let total = session.summary().total_markets;
        for _ in 0..total {
            session.skip();
        }
        assert_eq!(session.phase(), SessionPhase::Complete);

        let generation = session.reset().expect("reset from complete");
        assert_eq!(session.phase(), SessionPhase::Loading);

        assert!(session.apply_resolution(generation, sample_resolution()));
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.tally(), Tally::default());
        assert_eq!(session.summary().skipped, 0);
    }

    #[test]
    fn votes_and_skips_are_rejected_while_loading() {
        let mut session = session_with_url("http://127.0.0.1:1");
        session.begin_loading();
        assert!(!session.skip());
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn empty_resolutions_complete_immediately() {
        let mut session = session_with_url("http://127.0.0.1:1");
        let generation = session.begin_loading();
        let resolution = Resolution {
            markets: Vec::new(),
            source: ResolutionSource::Live,
            error: None,
            resolved_at: OffsetDateTime::now_utc(),
        };
        assert!(session.apply_resolution(generation, resolution));
        assert_eq!(session.phase(), SessionPhase::Complete);
    }

    #[tokio::test]
    async fn failed_orders_do_not_block_voting() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/place_order"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "order rejected"})),
            )
            .mount(&server)
            .await;

        let mut session = session_with_url(&server.uri());
        let generation = session.begin_loading();
        assert!(session.apply_resolution(generation, live_resolution(&["KXNBAGAME-A", "KXNBAGAME-B"])));

        assert!(session.vote(VoteDirection::Yes).await);
        assert_eq!(session.tally().yes, 1);
        assert_eq!(session.cursor(), 1);

        assert!(session.vote(VoteDirection::No).await);
        assert_eq!(session.phase(), SessionPhase::Complete);
        assert_eq!(session.tally().total(), 2);
    }

    #[tokio::test]
    async fn sample_markets_never_fire_orders() {
        // Sample markets carry no ticker, so no order task is spawned even
        // though the configured broker URL is unroutable.
        let mut session = loaded_session();
        assert!(session.vote(VoteDirection::Yes).await);
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn snapshot_reflects_the_cursor() {
        let session = loaded_session();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Active);
        assert_eq!(snapshot.cursor, 0);
        assert_eq!(snapshot.total_markets, 8);
        assert!(snapshot.current_question.is_some());
    }
}
