//! Market and category types for the swipe session.

use once_cell::sync::Lazy;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Direction of a cast vote on a binary market.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VoteDirection {
    /// Vote that the market resolves YES.
    Yes,
    /// Vote that the market resolves NO.
    No,
}

impl VoteDirection {
    /// Wire representation used by the broker ("yes" / "no").
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteDirection::Yes => "yes",
            VoteDirection::No => "no",
        }
    }
}

/// A browsable market category, selected once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Stable category id.
    pub id: &'static str,
    /// Display name for the selection screen.
    pub display_name: &'static str,
}

/// The fixed category catalog.
pub const CATALOG: [Category; 6] = [
    Category { id: "nba", display_name: "NBA Basketball" },
    Category { id: "nfl", display_name: "NFL Football" },
    Category { id: "mlb", display_name: "MLB Baseball" },
    Category { id: "nhl", display_name: "NHL Hockey" },
    Category { id: "cfb", display_name: "College Football" },
    Category { id: "mixed", display_name: "Mixed Picks" },
];

impl Category {
    /// Look up a catalog entry by id; unknown ids land on the mixed catch-all.
    pub fn from_id(id: &str) -> Category {
        CATALOG
            .iter()
            .find(|c| c.id == id)
            .copied()
            .unwrap_or(CATALOG[5])
    }
}

/// Series ticker used when a category id has no mapping of its own.
pub const DEFAULT_SERIES: &str = "KXNBAGAME";

/// Category id → broker series ticker.
///
/// `mixed` is intentionally absent: it, and any unrecognized id, resolves to
/// [`DEFAULT_SERIES`].
static SERIES_BY_CATEGORY: Lazy<IndexMap<&'static str, &'static str>> = Lazy::new(|| {
    IndexMap::from([
        ("nba", "KXNBAGAME"),
        ("nfl", "KXNFLGAME"),
        ("mlb", "KXMLBGAME"),
        ("nhl", "KXNHLGAME"),
        ("cfb", "KXNCAAFGAME"),
    ])
});

/// Map a category id to the broker series ticker to list.
pub fn series_for(category_id: &str) -> &'static str {
    SERIES_BY_CATEGORY
        .get(category_id)
        .copied()
        .unwrap_or(DEFAULT_SERIES)
}

/// A single swipeable binary market.
///
/// Immutable once resolved. `ticker` is present only for live broker
/// markets; sample markets carry `None` and votes on them place no order.
#[derive(Debug, Clone, Serialize)]
pub struct Market {
    /// Display question.
    pub question: String,
    /// Broker's opaque ticker, live markets only.
    pub ticker: Option<String>,
    /// Trailing team abbreviation derived from the ticker.
    pub team_name: Option<String>,
    /// "A vs B" match summary derived from the ticker.
    pub match_info: Option<String>,
    /// Probability-like display price in [0, 1].
    pub price: Decimal,
    /// Best YES bid in cents.
    pub yes_bid: Option<Decimal>,
    /// Best NO bid in cents.
    pub no_bid: Option<Decimal>,
    /// Best YES ask in cents.
    pub yes_ask: Option<Decimal>,
    /// Best NO ask in cents.
    pub no_ask: Option<Decimal>,
}

impl Market {
    /// Display price when a live market reports no YES bid.
    pub const DEFAULT_PRICE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

    /// Build a sample (non-tradeable) market for the fallback lists.
    pub fn sample(question: impl Into<String>, price: Decimal) -> Self {
        Self {
            question: question.into(),
            ticker: None,
            team_name: None,
            match_info: None,
            price,
            yes_bid: None,
            no_bid: None,
            yes_ask: None,
            no_ask: None,
        }
    }

    /// Whether this market is backed by a live broker ticker.
    pub fn is_live(&self) -> bool {
        self.ticker.is_some()
    }

    /// Display price in cents.
    pub fn price_cents(&self) -> Decimal {
        self.price * Decimal::ONE_HUNDRED
    }
}
