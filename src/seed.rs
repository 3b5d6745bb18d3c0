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

//! Demo tournaments for a fresh data file.

use chrono::{DateTime, Duration, Utc};
use log::error;

use crate::{
    format::Format,
    rating::Rated,
    store::Tournaments,
    time::TimeControl,
    tournament::{NewTournament, PlayerIdentity, Tournament},
};

const BLITZ_PLAYERS: [(&str, &str, i32, Option<&str>); 6] = [
    ("seed-player-1", "hikaru", 2780, Some("GM")),
    ("seed-player-2", "alireza", 2760, Some("GM")),
    ("seed-player-3", "judit", 2675, Some("GM")),
    ("seed-player-4", "anna", 2410, Some("IM")),
    ("seed-player-5", "viktor", 1980, None),
    ("seed-player-6", "maria", 1720, None),
];

/// One active Swiss, one gated arena and one open round robin.
#[must_use]
pub fn seed_tournaments(now: DateTime<Utc>) -> Tournaments {
    let mut tournaments = Tournaments::default();

    let mut blitz = Tournament::new(
        "seed-blitz-swiss".to_string(),
        NewTournament {
            name: "Weekly Blitz Swiss".to_string(),
            description: "Five rounds of 3+2, everyone welcome.".to_string(),
            format: Format::Swiss,
            time_control: TimeControl::new(3, 2),
            starts_at: now,
            max_players: 32,
            created_by: "seed".to_string(),
            rated: Rated::Yes,
            ..NewTournament::default()
        },
    );
    for (id, username, rating, title) in BLITZ_PLAYERS {
        let identity = PlayerIdentity {
            id: id.to_string(),
            username: username.to_string(),
            rating,
            title: title.map(ToString::to_string),
        };
        if let Err(err) = blitz.join(identity, now) {
            error!("seeding {}: {err}", blitz.id);
        }
    }
    if let Err(err) = blitz.start(now) {
        error!("seeding {}: {err}", blitz.id);
    }
    tournaments.insert(blitz);

    tournaments.insert(Tournament::new(
        "seed-masters-arena".to_string(),
        NewTournament {
            name: "Masters Arena".to_string(),
            description: "An hour of 1+0 for players rated 2200 and up.".to_string(),
            format: Format::Arena,
            time_control: TimeControl::new(1, 0),
            starts_at: now + Duration::days(1),
            max_players: 100,
            prize_pool: Some(500),
            created_by: "seed".to_string(),
            rated: Rated::Yes,
            min_rating: Some(2200),
            ..NewTournament::default()
        },
    ));

    tournaments.insert(Tournament::new(
        "seed-rapid-round-robin".to_string(),
        NewTournament {
            name: "Rapid Round Robin".to_string(),
            description: "Eight players, everyone plays everyone.".to_string(),
            format: Format::RoundRobin,
            time_control: TimeControl::new(10, 5),
            starts_at: now + Duration::days(7),
            max_players: 8,
            entry_fee: Some(10),
            created_by: "seed".to_string(),
            rated: Rated::No,
            ..NewTournament::default()
        },
    ));

    tournaments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::TournamentStatus;

    #[test]
    fn seeds() {
        let tournaments = seed_tournaments(Utc::now());
        assert_eq!(tournaments.0.len(), 3);

        let blitz = &tournaments.0["seed-blitz-swiss"];
        assert_eq!(blitz.status, TournamentStatus::Active);
        assert_eq!(blitz.current_players, 6);
        assert_eq!(blitz.rounds.len(), 1);
        assert_eq!(blitz.rounds[0].pairings.len(), 3);

        let arena = &tournaments.0["seed-masters-arena"];
        assert_eq!(arena.status, TournamentStatus::Upcoming);
        assert_eq!(arena.min_rating, Some(2200));
    }
}
