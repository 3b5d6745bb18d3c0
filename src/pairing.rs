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

//! Builds the games of a round from the players still in the tournament.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::tournament::TournamentPlayer;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum PairingSystem {
    #[default]
    Swiss,
    RoundRobin,
}

/// One round's games as `(white, black)` player ids, plus the player sitting
/// out, if any.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pairings {
    pub pairs: Vec<(String, String)>,
    pub bye: Option<String>,
}

impl PairingSystem {
    /// Pairs `players` for round `round` (1-based).
    ///
    /// `players` must hold only active players, in join order. Nothing is
    /// mutated: awarding the bye point is up to the caller.
    #[must_use]
    pub fn generate_pairings(self, players: &[&TournamentPlayer], round: u32) -> Pairings {
        match self {
            Self::Swiss => swiss(players),
            Self::RoundRobin => round_robin(players, round),
        }
    }
}

/// Sorts by standing and pairs neighbours; the lowest ranked odd player out
/// gets the bye.
fn swiss(players: &[&TournamentPlayer]) -> Pairings {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| a.standing_cmp(b));

    let bye = if sorted.len() % 2 == 1 {
        sorted.pop().map(|player| player.id.clone())
    } else {
        None
    };

    let pairs = sorted
        .chunks_exact(2)
        .filter_map(|pair| match pair {
            [white, black] => Some((white.id.clone(), black.id.clone())),
            _ => None,
        })
        .collect();

    Pairings { pairs, bye }
}

/// The circle method: seat 0 stays put while the others rotate one seat per
/// round. An odd field gets an empty seat, and whoever faces it has the bye.
fn round_robin(players: &[&TournamentPlayer], round: u32) -> Pairings {
    let mut seats: Vec<Option<&str>> = players
        .iter()
        .map(|player| Some(player.id.as_str()))
        .collect();

    if seats.len() % 2 == 1 {
        seats.push(None);
    }

    let mut pairings = Pairings::default();
    if seats.len() < 2 {
        return pairings;
    }

    let rotations = round.saturating_sub(1) as usize % (seats.len() - 1);
    seats[1..].rotate_right(rotations);

    let half = seats.len() / 2;
    let (top, bottom) = seats.split_at(half);

    for (board, (a, b)) in top.iter().zip(bottom.iter().rev()).enumerate() {
        match (a, b) {
            (Some(a), Some(b)) => {
                let (white, black) = if (board + rotations).is_multiple_of(2) {
                    (a, b)
                } else {
                    (b, a)
                };
                pairings.pairs.push(((*white).to_string(), (*black).to_string()));
            }
            (Some(player), None) | (None, Some(player)) => {
                pairings.bye = Some((*player).to_string());
            }
            (None, None) => {}
        }
    }

    pairings
}

impl fmt::Display for PairingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Swiss => write!(f, "swiss"),
            Self::RoundRobin => write!(f, "round_robin"),
        }
    }
}

impl FromStr for PairingSystem {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.to_lowercase().as_str() {
            "swiss" => Ok(Self::Swiss),
            "round_robin" | "roundrobin" | "round-robin" => Ok(Self::RoundRobin),
            _ => Err(anyhow::Error::msg(format!("invalid pairing system: {value}"))),
        }
    }
}
