//! Static fallback market lists.
//!
//! Used whenever credentials are absent or a live listing fails. One fixed
//! eight-market list per category, plus a default list that also serves the
//! mixed category. Sample markets carry no ticker, so votes on them never
//! place orders.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::types::Market;

fn market(question: &str, price: Decimal) -> Market {
    Market::sample(question, price)
}

/// The fixed sample list for a category id.
///
/// Unrecognized ids (and `mixed`) receive the default list. Never fails and
/// touches no I/O.
pub fn for_category(category_id: &str) -> Vec<Market> {
    match category_id {
        "nba" => nba(),
        "nfl" => nfl(),
        "mlb" => mlb(),
        "nhl" => nhl(),
        "cfb" => cfb(),
        _ => default_list(),
    }
}

fn nba() -> Vec<Market> {
    vec![
        market("Will the Celtics beat the Lakers tonight?", dec!(0.62)),
        market("Will the Warriors score over 115 points?", dec!(0.48)),
        market("Will the Nuggets win by 10 or more?", dec!(0.31)),
        market("Will the Heat cover against the Knicks?", dec!(0.53)),
        market("Will the Bucks win their next road game?", dec!(0.57)),
        market("Will the Thunder reach the conference finals?", dec!(0.44)),
        market("Will the Suns beat the Mavericks?", dec!(0.49)),
        market("Will the 76ers make the playoffs?", dec!(0.71)),
    ]
}

fn nfl() -> Vec<Market> {
    vec![
        market("Will the Chiefs win on Sunday?", dec!(0.66)),
        market("Will the Bills score a first-quarter touchdown?", dec!(0.41)),
        market("Will the Eagles cover the spread?", dec!(0.52)),
        market("Will the 49ers win by a field goal or less?", dec!(0.27)),
        market("Will the Cowboys win their division?", dec!(0.38)),
        market("Will the Ravens keep their opponent under 20 points?", dec!(0.55)),
        market("Will the Lions win on the road?", dec!(0.59)),
        market("Will the Packers reach the playoffs?", dec!(0.63)),
    ]
}

fn mlb() -> Vec<Market> {
    vec![
        market("Will the Yankees beat the Red Sox tonight?", dec!(0.54)),
        market("Will the Dodgers score five or more runs?", dec!(0.47)),
        market("Will the Braves win the series?", dec!(0.61)),
        market("Will the Astros hit a home run tonight?", dec!(0.68)),
        market("Will the Phillies win in extra innings?", dec!(0.12)),
        market("Will the Cubs shut out their opponent?", dec!(0.09)),
        market("Will the Mets win their next home game?", dec!(0.51)),
        market("Will the Orioles win 90 games this season?", dec!(0.43)),
    ]
}

fn nhl() -> Vec<Market> {
    vec![
        market("Will the Bruins win in regulation?", dec!(0.46)),
        market("Will the Oilers score four or more goals?", dec!(0.39)),
        market("Will the Rangers win at home tonight?", dec!(0.58)),
        market("Will the Avalanche win by two or more?", dec!(0.33)),
        market("Will the Maple Leafs beat the Canadiens?", dec!(0.64)),
        market("Will tonight's game go to overtime?", dec!(0.23)),
        market("Will the Panthers keep their win streak alive?", dec!(0.49)),
        market("Will the Golden Knights make the playoffs?", dec!(0.72)),
    ]
}

fn cfb() -> Vec<Market> {
    vec![
        market("Will Georgia beat Alabama this weekend?", dec!(0.45)),
        market("Will Ohio State cover against Michigan?", dec!(0.51)),
        market("Will Texas score 35 or more points?", dec!(0.56)),
        market("Will Oregon win by double digits?", dec!(0.42)),
        market("Will Notre Dame win on the road?", dec!(0.48)),
        market("Will LSU win their conference opener?", dec!(0.53)),
        market("Will Penn State go undefeated at home?", dec!(0.37)),
        market("Will Clemson reach the playoff?", dec!(0.29)),
    ]
}

fn default_list() -> Vec<Market> {
    vec![
        market("Will the home team win tonight's featured game?", dec!(0.55)),
        market("Will tonight's top matchup go down to the final minute?", dec!(0.34)),
        market("Will the favorite cover the spread this weekend?", dec!(0.50)),
        market("Will an underdog pull off an upset tonight?", dec!(0.28)),
        market("Will the highest-scoring team tonight break 120?", dec!(0.40)),
        market("Will a road team sweep tonight's slate?", dec!(0.08)),
        market("Will tomorrow's headline game sell out?", dec!(0.77)),
        market("Will this week's biggest favorite actually win?", dec!(0.82)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::types::CATALOG;
    use rust_decimal::Decimal;

    #[test]
    fn every_category_has_exactly_eight_samples() {
        for category in CATALOG {
            let markets = for_category(category.id);
            assert_eq!(markets.len(), 8, "category {}", category.id);
        }
    }

    #[test]
    fn unknown_category_gets_the_default_list() {
        let unknown = for_category("does-not-exist");
        let mixed = for_category("mixed");
        let questions: Vec<&str> = unknown.iter().map(|m| m.question.as_str()).collect();
        let mixed_questions: Vec<&str> = mixed.iter().map(|m| m.question.as_str()).collect();
        assert_eq!(questions, mixed_questions);
    }

    #[test]
    fn samples_are_deterministic_and_offline() {
        let first = for_category("nba");
        let second = for_category("nba");
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.question, b.question);
            assert_eq!(a.price, b.price);
        }
    }

    #[test]
    fn sample_prices_stay_in_unit_range() {
        for category in CATALOG {
            for market in for_category(category.id) {
                assert!(market.price > Decimal::ZERO && market.price < Decimal::ONE);
                assert!(market.ticker.is_none());
            }
        }
    }
}
