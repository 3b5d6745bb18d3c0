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

use crate::{category::RatingCategory, tiebreak::TiebreakMethod, tournament::TournamentPlayer};

/// One row of a tournament table.
#[derive(Clone, Debug, PartialEq)]
pub struct Standing {
    /// 1-based.
    pub position: usize,
    pub player: TournamentPlayer,
    /// The configured tiebreak methods, in order, computed fresh.
    pub tiebreaks: Vec<(TiebreakMethod, f64)>,
}

impl Standing {
    #[must_use]
    pub fn category(&self) -> RatingCategory {
        RatingCategory::from_rating(self.player.rating)
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>3}. {:<24} {:>4.1} {:>5.2} {:>4} {:>7.1} {} {}",
            self.position,
            self.player.to_string(),
            self.player.score,
            self.player.tiebreak,
            self.player.games_played,
            self.player.performance,
            self.player.status,
            self.category(),
        )?;

        for (method, value) in &self.tiebreaks {
            write!(f, " {method}={value:.2}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::tournament::PlayerIdentity;

    #[test]
    fn row() {
        let standing = Standing {
            position: 1,
            player: TournamentPlayer::new(
                PlayerIdentity {
                    id: "p1".to_string(),
                    username: "judit".to_string(),
                    rating: 2675,
                    title: Some("GM".to_string()),
                },
                Utc::now(),
            ),
            tiebreaks: vec![(TiebreakMethod::Buchholz, 1.5)],
        };

        assert_eq!(standing.category(), RatingCategory::SuperGrandmaster);

        let row = standing.to_string();
        assert!(row.starts_with("  1. GM judit (2675)"));
        assert!(row.ends_with("active Super Grandmaster buchholz=1.50"));
    }
}
