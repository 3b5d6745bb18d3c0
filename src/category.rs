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

use std::fmt;

use serde::{Deserialize, Serialize};

/// Named rating bands, used for titles and display.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum RatingCategory {
    #[default]
    Beginner,
    Novice,
    Intermediate,
    ClubPlayer,
    Advanced,
    Expert,
    CandidateMaster,
    Master,
    Grandmaster,
    SuperGrandmaster,
}

impl RatingCategory {
    pub const ALL: [Self; 10] = [
        Self::Beginner,
        Self::Novice,
        Self::Intermediate,
        Self::ClubPlayer,
        Self::Advanced,
        Self::Expert,
        Self::CandidateMaster,
        Self::Master,
        Self::Grandmaster,
        Self::SuperGrandmaster,
    ];

    #[must_use]
    pub fn from_rating(rating: i32) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|category| rating >= category.min_rating())
            .unwrap_or_default()
    }

    /// The lowest rating in the band, inclusive.
    #[must_use]
    pub fn min_rating(self) -> i32 {
        match self {
            Self::Beginner => i32::MIN,
            Self::Novice => 1000,
            Self::Intermediate => 1200,
            Self::ClubPlayer => 1400,
            Self::Advanced => 1600,
            Self::Expert => 1800,
            Self::CandidateMaster => 2000,
            Self::Master => 2200,
            Self::Grandmaster => 2300,
            Self::SuperGrandmaster => 2400,
        }
    }

    /// Rough share of all players that fall in the band, in percent.
    #[must_use]
    pub fn population_percent(self) -> f64 {
        match self {
            Self::Beginner => 15.0,
            Self::Novice | Self::Intermediate => 20.0,
            Self::ClubPlayer => 18.0,
            Self::Advanced => 12.0,
            Self::Expert => 8.0,
            Self::CandidateMaster => 4.0,
            Self::Master => 1.5,
            Self::Grandmaster => 1.0,
            Self::SuperGrandmaster => 0.5,
        }
    }
}

impl fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beginner => write!(f, "Beginner"),
            Self::Novice => write!(f, "Novice"),
            Self::Intermediate => write!(f, "Intermediate"),
            Self::ClubPlayer => write!(f, "Club Player"),
            Self::Advanced => write!(f, "Advanced"),
            Self::Expert => write!(f, "Expert"),
            Self::CandidateMaster => write!(f, "Candidate Master"),
            Self::Master => write!(f, "Master"),
            Self::Grandmaster => write!(f, "Grandmaster"),
            Self::SuperGrandmaster => write!(f, "Super Grandmaster"),
        }
    }
}
