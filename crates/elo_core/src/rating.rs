//! Elo rating calculation

/// Starting rating for agents that have never played
pub const INITIAL_RATING: f64 = 1000.0;

/// K-factor for Elo updates (higher = more volatile)
pub const K_FACTOR: f64 = 32.0;

/// Expected score of a player rated `rating` against an opponent rated `opponent`.
///
/// `expected_score(a, b) + expected_score(b, a)` is always 1.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent - rating) / 400.0))
}

/// Rating change for a player after one game against opponents averaging
/// `opponents_avg`, rounded to one decimal place.
pub fn rating_delta(rating: f64, opponents_avg: f64, won: bool) -> f64 {
    let actual = if won { 1.0 } else { 0.0 };
    round_to_tenth(K_FACTOR * (actual - expected_score(rating, opponents_avg)))
}

/// Round to one decimal place, the precision every persisted rating uses.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
#[path = "rating_tests.rs"]
mod rating_tests;
