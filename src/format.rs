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

use serde::{Deserialize, Serialize};

use crate::pairing::PairingSystem;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Format {
    #[default]
    Swiss,
    RoundRobin,
    Elimination,
    Arena,
}

impl Format {
    /// Whether another round follows once `rounds_played` rounds are complete.
    ///
    /// Only Swiss and round robin run past their first round.
    #[must_use]
    pub fn should_continue(
        self,
        rounds_played: usize,
        active_players: usize,
        max_rounds: Option<u32>,
    ) -> bool {
        match self {
            Self::Swiss => {
                let max_rounds = max_rounds.map_or_else(
                    || default_swiss_rounds(active_players),
                    |rounds| rounds as usize,
                );
                rounds_played < max_rounds && active_players > 1
            }
            Self::RoundRobin => rounds_played < active_players.saturating_sub(1),
            Self::Elimination | Self::Arena => false,
        }
    }

    /// The pairing system a new tournament of this format gets by default.
    #[must_use]
    pub fn default_pairing_system(self) -> PairingSystem {
        match self {
            Self::RoundRobin => PairingSystem::RoundRobin,
            Self::Swiss | Self::Elimination | Self::Arena => PairingSystem::Swiss,
        }
    }
}

/// `ceil(log2(players))`, the rounds needed to separate a single winner.
#[must_use]
pub fn default_swiss_rounds(players: usize) -> usize {
    if players <= 1 {
        0
    } else {
        (usize::BITS - (players - 1).leading_zeros()) as usize
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Swiss => write!(f, "swiss"),
            Self::RoundRobin => write!(f, "round_robin"),
            Self::Elimination => write!(f, "elimination"),
            Self::Arena => write!(f, "arena"),
        }
    }
}

impl FromStr for Format {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.to_lowercase().as_str() {
            "swiss" => Ok(Self::Swiss),
            "round_robin" | "roundrobin" | "round-robin" => Ok(Self::RoundRobin),
            "elimination" => Ok(Self::Elimination),
            "arena" => Ok(Self::Arena),
            _ => Err(anyhow::Error::msg(format!("invalid format: {value}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swiss_default_rounds() {
        assert_eq!(default_swiss_rounds(0), 0);
        assert_eq!(default_swiss_rounds(1), 0);
        assert_eq!(default_swiss_rounds(2), 1);
        assert_eq!(default_swiss_rounds(3), 2);
        assert_eq!(default_swiss_rounds(4), 2);
        assert_eq!(default_swiss_rounds(5), 3);
        assert_eq!(default_swiss_rounds(8), 3);
        assert_eq!(default_swiss_rounds(9), 4);
        assert_eq!(default_swiss_rounds(64), 6);
    }

    #[test]
    fn swiss_continues_until_max_rounds() {
        assert!(Format::Swiss.should_continue(2, 5, None));
        assert!(!Format::Swiss.should_continue(3, 5, None));
        assert!(Format::Swiss.should_continue(4, 5, Some(5)));
        assert!(!Format::Swiss.should_continue(5, 5, Some(5)));
        assert!(!Format::Swiss.should_continue(0, 1, Some(5)));
    }

    #[test]
    fn round_robin_plays_everyone_once() {
        assert!(Format::RoundRobin.should_continue(2, 4, None));
        assert!(!Format::RoundRobin.should_continue(3, 4, None));
        assert!(!Format::RoundRobin.should_continue(0, 1, None));
    }

    #[test]
    fn other_formats_stop_after_one_round() {
        assert!(!Format::Arena.should_continue(1, 10, None));
        assert!(!Format::Elimination.should_continue(1, 10, Some(4)));
    }
}
