//! Ticker parsing heuristics.
//!
//! Broker tickers encode date/teams/outcome by convention, e.g.
//! `KXNBAGAME-25OCT30MIASAS-SAS`: series, then a match segment carrying the
//! date and both team abbreviations, then the outcome team. The derivation is
//! best-effort: tickers outside that convention keep their default question,
//! which is accepted behavior rather than an error.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// NBA team abbreviation → city name, in fixed insertion order.
///
/// Iteration order decides the order teams appear in the "A vs B" summary,
/// not their position inside the match segment.
static TEAM_NAMES: Lazy<IndexMap<&'static str, &'static str>> = Lazy::new(|| {
    IndexMap::from([
        ("ATL", "Atlanta"),
        ("BKN", "Brooklyn"),
        ("BOS", "Boston"),
        ("CHA", "Charlotte"),
        ("CHI", "Chicago"),
        ("CLE", "Cleveland"),
        ("DAL", "Dallas"),
        ("DEN", "Denver"),
        ("DET", "Detroit"),
        ("GSW", "Golden State"),
        ("HOU", "Houston"),
        ("IND", "Indiana"),
        ("LAC", "LA Clippers"),
        ("LAL", "LA Lakers"),
        ("MEM", "Memphis"),
        ("MIA", "Miami"),
        ("MIL", "Milwaukee"),
        ("MIN", "Minnesota"),
        ("NOP", "New Orleans"),
        ("NYK", "New York"),
        ("OKC", "Oklahoma City"),
        ("ORL", "Orlando"),
        ("PHI", "Philadelphia"),
        ("PHX", "Phoenix"),
        ("POR", "Portland"),
        ("SAC", "Sacramento"),
        ("SAS", "San Antonio"),
        ("TOR", "Toronto"),
        ("UTA", "Utah"),
        ("WAS", "Washington"),
    ])
});

/// Question and match metadata derived from a raw ticker.
///
/// Fields are empty strings (not `None`) when derivation found nothing, so a
/// caller can always render them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTicker {
    /// Display question.
    pub question: String,
    /// Trailing team abbreviation segment, verbatim.
    pub team_name: String,
    /// "A vs B" or "<Team> Wins" summary.
    pub match_info: String,
}

/// Derive a display question and match metadata from a raw ticker.
///
/// Pure and deterministic. The default question is `title` when present,
/// otherwise the raw ticker unmodified; it survives unchanged whenever the
/// ticker has fewer than three hyphen-separated segments.
pub fn parse(raw_ticker: &str, title: Option<&str>) -> ParsedTicker {
    let default_question = title.unwrap_or(raw_ticker).to_string();

    let segments: Vec<&str> = raw_ticker.split('-').collect();
    if segments.len() < 3 {
        return ParsedTicker {
            question: default_question,
            team_name: String::new(),
            match_info: String::new(),
        };
    }

    let team_name = segments[segments.len() - 1].to_string();
    let match_segment = segments[1];

    // Every abbreviation occurring inside the match segment contributes its
    // city name, in table iteration order.
    let teams_in_match: Vec<&str> = TEAM_NAMES
        .iter()
        .filter(|(abbr, _)| match_segment.contains(*abbr))
        .map(|(_, name)| *name)
        .collect();

    let match_info = if teams_in_match.len() >= 2 {
        teams_in_match.join(" vs ")
    } else if let Some(name) = TEAM_NAMES.get(team_name.as_str()) {
        format!("{} Wins", name)
    } else {
        String::new()
    };

    let resolved_team = TEAM_NAMES
        .get(team_name.as_str())
        .copied()
        .unwrap_or(team_name.as_str());

    let question = if !match_info.is_empty() && !team_name.is_empty() {
        format!("{} - Will {} Win?", match_info, resolved_team)
    } else if !team_name.is_empty() {
        format!("Will {} Win?", resolved_team)
    } else {
        default_question
    };

    ParsedTicker {
        question,
        team_name,
        match_info,
    }
}
