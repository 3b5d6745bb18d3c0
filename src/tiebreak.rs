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

use std::{fmt, str::FromStr};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::tournament::Tournament;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum TiebreakMethod {
    /// The average score of every opponent faced.
    #[default]
    Buchholz,
    /// The scores of beaten opponents plus half the scores of drawn ones.
    SonnebornBerger,
}

impl TiebreakMethod {
    /// Computes the tiebreak of every participant, keyed by player id.
    #[must_use]
    pub fn compute_all(self, tournament: &Tournament) -> FxHashMap<String, f64> {
        let scores: FxHashMap<&str, f64> = tournament
            .participants
            .iter()
            .map(|player| (player.id.as_str(), player.score))
            .collect();

        tournament
            .participants
            .iter()
            .map(|player| {
                let value = match self {
                    Self::Buchholz => buchholz(tournament, &scores, &player.id),
                    Self::SonnebornBerger => sonneborn_berger(tournament, &scores, &player.id),
                };
                (player.id.clone(), value)
            })
            .collect()
    }
}

/// Opponents' current scores summed and divided by the games paired, or 0
/// with no games.
fn buchholz(tournament: &Tournament, scores: &FxHashMap<&str, f64>, player_id: &str) -> f64 {
    let mut total = 0.0;
    let mut games = 0_u32;

    for pairing in tournament.rounds.iter().flat_map(|round| &round.pairings) {
        if let Some(opponent) = pairing.opponent_of(player_id) {
            games += 1;
            total += scores.get(opponent).copied().unwrap_or_default();
        }
    }

    if games == 0 {
        0.0
    } else {
        total / f64::from(games)
    }
}

fn sonneborn_berger(
    tournament: &Tournament,
    scores: &FxHashMap<&str, f64>,
    player_id: &str,
) -> f64 {
    tournament
        .rounds
        .iter()
        .flat_map(|round| &round.pairings)
        .filter_map(|pairing| {
            let color = pairing.color_of(player_id)?;
            let result = pairing.result?;
            let opponent = pairing.player(color.opposite());
            let earned = result.outcome_for(color).score();

            Some(earned * scores.get(opponent).copied().unwrap_or_default())
        })
        .sum()
}

impl fmt::Display for TiebreakMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buchholz => write!(f, "buchholz"),
            Self::SonnebornBerger => write!(f, "sonneborn_berger"),
        }
    }
}

impl FromStr for TiebreakMethod {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.to_lowercase().as_str() {
            "buchholz" => Ok(Self::Buchholz),
            "sonneborn_berger" | "sonneborn-berger" | "sb" => Ok(Self::SonnebornBerger),
            _ => Err(anyhow::Error::msg(format!("invalid tiebreak: {value}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        format::Format,
        status::PairingResult,
        tournament::{NewTournament, PlayerIdentity},
    };

    /// Four players, round 1: a beats b, c draws d.
    fn one_round_played() -> anyhow::Result<Tournament> {
        let now = Utc::now();
        let mut tournament = Tournament::new(
            "t".to_string(),
            NewTournament {
                name: "Tiebreaks".to_string(),
                format: Format::Swiss,
                max_players: 4,
                ..NewTournament::default()
            },
        );

        for (id, rating) in [("a", 2000), ("b", 1900), ("c", 1800), ("d", 1700)] {
            tournament.join(
                PlayerIdentity {
                    id: id.to_string(),
                    username: id.to_string(),
                    rating,
                    title: None,
                },
                now,
            )?;
        }

        tournament.start(now)?;
        tournament.record_result("1-1", PairingResult::White, now)?;
        tournament.record_result("1-2", PairingResult::Draw, now)?;

        Ok(tournament)
    }

    #[test]
    fn buchholz_averages_opponent_scores() -> anyhow::Result<()> {
        let tournament = one_round_played()?;
        let buchholz = TiebreakMethod::Buchholz.compute_all(&tournament);

        // Round 2 pairs a-c and b-d, which count before they are decided.
        assert!((buchholz["a"] - (0.0 + 0.5) / 2.0).abs() < 1e-9);
        assert!((buchholz["b"] - (1.0 + 0.5) / 2.0).abs() < 1e-9);
        assert!((buchholz["c"] - (0.5 + 1.0) / 2.0).abs() < 1e-9);
        assert!((buchholz["d"] - (0.5 + 0.0) / 2.0).abs() < 1e-9);

        Ok(())
    }

    #[test]
    fn sonneborn_berger_counts_only_points_earned() -> anyhow::Result<()> {
        let tournament = one_round_played()?;
        let sonneborn_berger = TiebreakMethod::SonnebornBerger.compute_all(&tournament);

        assert!(sonneborn_berger["a"].abs() < 1e-9);
        assert!(sonneborn_berger["b"].abs() < 1e-9);
        assert!((sonneborn_berger["c"] - 0.25).abs() < 1e-9);
        assert!((sonneborn_berger["d"] - 0.25).abs() < 1e-9);

        Ok(())
    }

    #[test]
    fn no_games_no_tiebreak() {
        let tournament = Tournament::new("t".to_string(), NewTournament::default());
        assert!(TiebreakMethod::Buchholz.compute_all(&tournament).is_empty());
    }
}
