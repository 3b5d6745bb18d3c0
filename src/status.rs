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

use crate::color::Color;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum TournamentStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl TournamentStatus {
    /// Completed and cancelled tournaments never change again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upcoming => write!(f, "upcoming"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for TournamentStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value {
            "upcoming" => Ok(Self::Upcoming),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(anyhow::Error::msg(format!(
                "invalid tournament status: {value}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum RoundStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum PlayerStatus {
    #[default]
    Active,
    Withdrawn,
    Eliminated,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Withdrawn => write!(f, "withdrawn"),
            Self::Eliminated => write!(f, "eliminated"),
        }
    }
}

/// How a pairing ended, named by the winning side.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum PairingResult {
    White,
    Black,
    Draw,
}

impl PairingResult {
    #[must_use]
    pub fn outcome_for(self, color: Color) -> Outcome {
        match (self, color) {
            (Self::Draw, _) => Outcome::Draw,
            (Self::White, Color::White) | (Self::Black, Color::Black) => Outcome::Win,
            (Self::White, Color::Black) | (Self::Black, Color::White) => Outcome::Loss,
        }
    }
}

impl fmt::Display for PairingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

impl FromStr for PairingResult {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.to_lowercase().as_str() {
            "white" | "1-0" => Ok(Self::White),
            "black" | "0-1" => Ok(Self::Black),
            "draw" | "1/2-1/2" => Ok(Self::Draw),
            _ => Err(anyhow::Error::msg(format!("invalid result: {value}"))),
        }
    }
}

/// A single game from one player's point of view.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Points earned: 1 for a win, 0.5 for a draw, 0 for a loss.
    #[must_use]
    pub fn score(self) -> f64 {
        match self {
            Self::Win => 1.0,
            Self::Draw => 0.5,
            Self::Loss => 0.0,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win => write!(f, "win"),
            Self::Draw => write!(f, "draw"),
            Self::Loss => write!(f, "loss"),
        }
    }
}

impl FromStr for Outcome {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.to_lowercase().as_str() {
            "w" | "win" | "1" => Ok(Self::Win),
            "d" | "draw" | "0.5" => Ok(Self::Draw),
            "l" | "loss" | "0" => Ok(Self::Loss),
            _ => Err(anyhow::Error::msg(format!("invalid outcome: {value}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_from_each_side() {
        assert_eq!(PairingResult::White.outcome_for(Color::White), Outcome::Win);
        assert_eq!(PairingResult::White.outcome_for(Color::Black), Outcome::Loss);
        assert_eq!(PairingResult::Black.outcome_for(Color::Black), Outcome::Win);
        assert_eq!(PairingResult::Draw.outcome_for(Color::White), Outcome::Draw);
        assert_eq!(PairingResult::Draw.outcome_for(Color::Black), Outcome::Draw);
    }

    #[test]
    fn parse_results() -> anyhow::Result<()> {
        assert_eq!("1-0".parse::<PairingResult>()?, PairingResult::White);
        assert_eq!("Black".parse::<PairingResult>()?, PairingResult::Black);
        assert!("2-0".parse::<PairingResult>().is_err());
        assert_eq!("cancelled".parse::<TournamentStatus>()?, TournamentStatus::Cancelled);

        Ok(())
    }
}
