// This file is part of tournament-engine.
//
// tournament-engine is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// tournament-engine is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Elo expected scores, rating changes and performance ratings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::status::Outcome;

/// No rating change will take a player below this.
pub const RATING_FLOOR: i32 = 100;

/// Players with fewer games than this use [`K_PROVISIONAL`].
pub const PROVISIONAL_GAMES: u32 = 20;
pub const K_PROVISIONAL: f64 = 40.0;
pub const K_ESTABLISHED: f64 = 32.0;

/// K-factor for tournament performance, whatever a player's history.
pub const K_PERFORMANCE: f64 = 32.0;

const SPREAD: f64 = 400.0;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Rated {
    No,
    #[default]
    Yes,
}

impl fmt::Display for Rated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rated::No => write!(f, "unrated"),
            Rated::Yes => write!(f, "rated"),
        }
    }
}

/// The score `a` is expected to take from a single game against `b`.
#[must_use]
pub fn expected_score(a: f64, b: f64) -> f64 {
    1.0 / (1.0 + 10_f64.powf((b - a) / SPREAD))
}

#[must_use]
pub fn k_factor(games_played: u32) -> f64 {
    if games_played < PROVISIONAL_GAMES {
        K_PROVISIONAL
    } else {
        K_ESTABLISHED
    }
}

/// How much `player` gains or loses after a game against `opponent`.
///
/// `games_played` is the player's lifetime count before this game. The
/// returned delta never takes the player below [`RATING_FLOOR`].
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn rating_delta(player: i32, opponent: i32, outcome: Outcome, games_played: u32) -> i32 {
    let expected = expected_score(f64::from(player), f64::from(opponent));
    let delta = (k_factor(games_played) * (outcome.score() - expected)).round() as i32;

    if player + delta < RATING_FLOOR {
        RATING_FLOOR - player
    } else {
        delta
    }
}

/// The change to a running tournament performance figure.
///
/// Always uses [`K_PERFORMANCE`] and is not floored.
#[must_use]
pub fn performance_delta(player: f64, opponent: f64, outcome: Outcome) -> f64 {
    K_PERFORMANCE * (outcome.score() - expected_score(player, opponent))
}

/// Estimates the rating a set of results was played at.
///
/// Each game is `(opponent_rating, outcome)`. Returns `None` when there are no
/// games.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn performance_rating(games: &[(i32, Outcome)]) -> Option<i32> {
    if games.is_empty() {
        return None;
    }

    let count = games.len() as f64;
    let average_opponent = games
        .iter()
        .map(|(rating, _)| f64::from(*rating))
        .sum::<f64>()
        / count;
    let fraction = games.iter().map(|(_, outcome)| outcome.score()).sum::<f64>() / count;

    #[allow(clippy::float_cmp)]
    let performance = if fraction == 1.0 {
        average_opponent + SPREAD
    } else if fraction == 0.0 {
        average_opponent - SPREAD
    } else {
        average_opponent + (-SPREAD * (1.0 / fraction - 1.0).log10())
    };

    Some(performance.round() as i32)
}
