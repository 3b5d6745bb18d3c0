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

//! Owns every tournament and writes them out after each change.

use std::fmt::Write as _;

use chrono::Utc;
use log::{error, info};

use crate::{
    category::RatingCategory,
    message::{COMMANDS, Message},
    rating::performance_rating,
    seed::seed_tournaments,
    standings::Standing,
    status::{PairingResult, TournamentStatus},
    store::{TournamentStore, Tournaments},
    tournament::{
        GameRecord, NewTournament, PlayerIdentity, RoundProgress, Tournament, TournamentError,
    },
};

/// The one place tournaments get changed.
///
/// Every successful mutation is followed by a save. A failed save is logged
/// and the in memory state is kept.
#[derive(Debug)]
pub struct TournamentService<S> {
    tournaments: Tournaments,
    store: S,
}

impl<S: TournamentStore> TournamentService<S> {
    /// # Errors
    ///
    /// If the store can't be read.
    pub fn new(store: S) -> anyhow::Result<Self> {
        let tournaments = store.load_all()?;
        info!("loaded {} tournaments", tournaments.0.len());

        Ok(Self { tournaments, store })
    }

    /// Fills an empty store with the demo tournaments.
    pub fn seed_if_empty(&mut self) {
        if self.tournaments.0.is_empty() {
            self.tournaments = seed_tournaments(Utc::now());
            info!("seeded {} tournaments", self.tournaments.0.len());
            self.save();
        }
    }

    #[must_use]
    pub fn tournaments(&self) -> &Tournaments {
        &self.tournaments
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Opens a new tournament for registration and returns its id.
    pub fn create(&mut self, draft: NewTournament) -> String {
        let mut id = format!("{:x}", rand::random::<u64>());
        while self.tournaments.0.contains_key(&id) {
            id = format!("{:x}", rand::random::<u64>());
        }

        let tournament = Tournament::new(id.clone(), draft);
        info!("created {tournament}");
        self.tournaments.insert(tournament);
        self.save();

        id
    }

    /// # Errors
    ///
    /// If there is no such tournament.
    pub fn get(&self, id: &str) -> Result<&Tournament, TournamentError> {
        self.tournaments
            .0
            .get(id)
            .ok_or_else(|| TournamentError::NotFound(id.to_string()))
    }

    /// Tournaments by start time, optionally only those with `status`.
    #[must_use]
    pub fn list(&self, status: Option<TournamentStatus>) -> Vec<&Tournament> {
        let mut tournaments: Vec<_> = self
            .tournaments
            .0
            .values()
            .filter(|tournament| status.is_none_or(|status| tournament.status == status))
            .collect();

        tournaments.sort_unstable_by(|a, b| a.starts_at.cmp(&b.starts_at).then(a.id.cmp(&b.id)));
        tournaments
    }

    /// # Errors
    ///
    /// See [`Tournament::join`].
    pub fn join(&mut self, id: &str, identity: PlayerIdentity) -> Result<(), TournamentError> {
        self.mutate(id, |tournament| tournament.join(identity, Utc::now()))
    }

    /// # Errors
    ///
    /// See [`Tournament::withdraw`].
    pub fn withdraw(&mut self, id: &str, player_id: &str) -> Result<(), TournamentError> {
        self.mutate(id, |tournament| tournament.withdraw(player_id))
    }

    /// # Errors
    ///
    /// See [`Tournament::start`].
    pub fn start(&mut self, id: &str) -> Result<(), TournamentError> {
        self.mutate(id, |tournament| tournament.start(Utc::now()))
    }

    /// # Errors
    ///
    /// See [`Tournament::begin_game`].
    pub fn begin_game(
        &mut self,
        id: &str,
        pairing_id: &str,
        game_id: String,
        game: Option<GameRecord>,
    ) -> Result<(), TournamentError> {
        self.mutate(id, |tournament| {
            tournament.begin_game(pairing_id, game_id, game, Utc::now())
        })
    }

    /// # Errors
    ///
    /// See [`Tournament::record_result`].
    pub fn record_result(
        &mut self,
        id: &str,
        pairing_id: &str,
        result: PairingResult,
    ) -> Result<RoundProgress, TournamentError> {
        self.mutate(id, |tournament| {
            tournament.record_result(pairing_id, result, Utc::now())
        })
    }

    /// # Errors
    ///
    /// See [`Tournament::cancel`].
    pub fn cancel(&mut self, id: &str) -> Result<(), TournamentError> {
        self.mutate(id, |tournament| tournament.cancel(Utc::now()))
    }

    /// # Errors
    ///
    /// See [`Tournament::calculate_tiebreaks`].
    pub fn calculate_tiebreaks(&mut self, id: &str) -> Result<(), TournamentError> {
        self.mutate(id, Tournament::calculate_tiebreaks)
    }

    /// # Errors
    ///
    /// If there is no such tournament.
    pub fn standings(&self, id: &str) -> Result<Vec<Standing>, TournamentError> {
        Ok(self.get(id)?.standings())
    }

    fn mutate<T>(
        &mut self,
        id: &str,
        change: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let tournament = self
            .tournaments
            .0
            .get_mut(id)
            .ok_or_else(|| TournamentError::NotFound(id.to_string()))?;

        let value = change(tournament)?;
        self.save();
        Ok(value)
    }

    fn save(&self) {
        if let Err(err) = self.store.save_all(&self.tournaments) {
            error!("unable to save tournaments: {err}");
        }
    }

    /// Runs one protocol command, returning the text after `= `.
    ///
    /// # Errors
    ///
    /// If the command fails, the message is the text after `? `.
    #[allow(clippy::too_many_lines)]
    pub fn update(&mut self, message: Message) -> anyhow::Result<Option<String>> {
        match message {
            Message::Empty => Ok(None),
            Message::Cancel(id) => {
                self.cancel(&id)?;
                Ok(Some(format!("cancel {id}")))
            }
            Message::Category(rating) => {
                let category = RatingCategory::from_rating(rating);
                Ok(Some(format!(
                    "category {rating} {category} {}%",
                    category.population_percent()
                )))
            }
            Message::Create {
                name,
                format,
                max_players,
                time_control,
                min_rating,
                max_rating,
            } => {
                let id = self.create(NewTournament {
                    name,
                    format,
                    time_control,
                    starts_at: Utc::now(),
                    max_players,
                    min_rating,
                    max_rating,
                    ..NewTournament::default()
                });
                Ok(Some(format!("create {id}")))
            }
            Message::Game {
                tournament,
                pairing,
                game_id,
                record,
            } => {
                self.begin_game(&tournament, &pairing, game_id.clone(), record)?;
                Ok(Some(format!("game {tournament} {pairing} {game_id}")))
            }
            Message::Join { tournament, player } => {
                let player_id = player.id.clone();
                self.join(&tournament, player)?;
                Ok(Some(format!("join {tournament} {player_id}")))
            }
            Message::List(status) => {
                let mut reply = String::from("list");
                for tournament in self.list(status) {
                    write!(reply, "\n{tournament}")?;
                }
                Ok(Some(reply))
            }
            Message::ListCommands => Ok(Some(COMMANDS.join(" "))),
            Message::Performance(games) => {
                let rating = performance_rating(&games)
                    .ok_or_else(|| anyhow::Error::msg("performance: no games given"))?;
                Ok(Some(format!("performance {rating}")))
            }
            Message::Result {
                tournament,
                pairing,
                result,
            } => {
                let reply = match self.record_result(&tournament, &pairing, result)? {
                    RoundProgress::InProgress => "in_progress".to_string(),
                    RoundProgress::NextRound(round) => format!("next_round {round}"),
                    RoundProgress::Completed => "completed".to_string(),
                };
                Ok(Some(format!("result {tournament} {reply}")))
            }
            Message::Show(id) => {
                let tournament = self.get(&id)?;
                let mut reply = format!("show {tournament}");
                for round in &tournament.rounds {
                    write!(reply, "\nround {} {}", round.number, round.status)?;
                    if let Some(bye) = &round.bye {
                        write!(reply, " bye {bye}")?;
                    }
                    for pairing in &round.pairings {
                        write!(reply, "\n  {} {} {}", pairing.id, pairing.white, pairing.black)?;
                        if let Some(result) = pairing.result {
                            write!(reply, " {result}")?;
                        }
                    }
                }
                Ok(Some(reply))
            }
            Message::Standings(id) => {
                let mut reply = format!("standings {id}");
                for standing in self.standings(&id)? {
                    write!(reply, "\n{standing}")?;
                }
                Ok(Some(reply))
            }
            Message::Start(id) => {
                self.start(&id)?;
                Ok(Some(format!("start {id}")))
            }
            Message::Tiebreaks(id) => {
                self.calculate_tiebreaks(&id)?;
                Ok(Some(format!("tiebreaks {id}")))
            }
            Message::Withdraw { tournament, player } => {
                self.withdraw(&tournament, &player)?;
                Ok(Some(format!("withdraw {tournament} {player}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::store::MemoryStore;

    struct BrokenStore {
        attempts: Cell<usize>,
    }

    impl TournamentStore for BrokenStore {
        fn load_all(&self) -> anyhow::Result<Tournaments> {
            Ok(Tournaments::default())
        }

        fn save_all(&self, _tournaments: &Tournaments) -> anyhow::Result<()> {
            self.attempts.set(self.attempts.get() + 1);
            Err(anyhow::Error::msg("disk full"))
        }
    }

    fn draft(name: &str) -> NewTournament {
        NewTournament {
            name: name.to_string(),
            starts_at: Utc::now(),
            max_players: 8,
            ..NewTournament::default()
        }
    }

    fn identity(id: &str, rating: i32) -> PlayerIdentity {
        PlayerIdentity {
            id: id.to_string(),
            username: id.to_string(),
            rating,
            title: None,
        }
    }

    #[test]
    fn every_change_is_saved() -> anyhow::Result<()> {
        let store = MemoryStore::default();
        let mut service = TournamentService::new(store.clone())?;

        let id = service.create(draft("Tuesday Blitz"));
        service.join(&id, identity("a", 1500))?;
        service.join(&id, identity("b", 1500))?;
        service.start(&id)?;

        assert_eq!(store.saves(), 4);
        assert_eq!(&store.snapshot()?, service.tournaments());

        Ok(())
    }

    #[test]
    fn failures_are_not_saved() -> anyhow::Result<()> {
        let store = MemoryStore::default();
        let mut service = TournamentService::new(store.clone())?;
        let id = service.create(draft("Tuesday Blitz"));

        assert_eq!(
            service.start(&id),
            Err(TournamentError::NotEnoughPlayers(0))
        );
        assert_eq!(
            service.join("nope", identity("a", 1500)),
            Err(TournamentError::NotFound("nope".to_string()))
        );
        assert_eq!(store.saves(), 1);

        Ok(())
    }

    #[test]
    fn a_failed_save_keeps_the_change() -> anyhow::Result<()> {
        let mut service = TournamentService::new(BrokenStore {
            attempts: Cell::new(0),
        })?;

        let id = service.create(draft("Tuesday Blitz"));
        service.join(&id, identity("a", 1500))?;

        assert_eq!(service.get(&id)?.current_players, 1);
        assert_eq!(service.store().attempts.get(), 2);

        Ok(())
    }

    #[test]
    fn list_filters_by_status() -> anyhow::Result<()> {
        let mut service = TournamentService::new(MemoryStore::default())?;
        let upcoming = service.create(draft("Upcoming"));
        let cancelled = service.create(draft("Cancelled"));
        service.cancel(&cancelled)?;

        assert_eq!(service.list(None).len(), 2);

        let ids: Vec<_> = service
            .list(Some(TournamentStatus::Upcoming))
            .into_iter()
            .map(|tournament| tournament.id.clone())
            .collect();
        assert_eq!(ids, vec![upcoming]);

        Ok(())
    }

    #[test]
    fn seeding_only_fills_an_empty_store() -> anyhow::Result<()> {
        let mut service = TournamentService::new(MemoryStore::default())?;
        service.seed_if_empty();
        let seeded = service.tournaments().0.len();
        assert!(seeded > 0);

        service.seed_if_empty();
        assert_eq!(service.tournaments().0.len(), seeded);

        Ok(())
    }

    #[test]
    fn protocol_round_trip() -> anyhow::Result<()> {
        let mut service = TournamentService::new(MemoryStore::default())?;

        let reply = service
            .update(Message::read_line("create Club_Night swiss 4 3+2")?)?
            .unwrap_or_default();
        let id = reply
            .strip_prefix("create ")
            .ok_or_else(|| anyhow::Error::msg("bad create reply"))?
            .to_string();

        for (player, rating) in [("a", 1600), ("b", 1500), ("c", 1400), ("d", 1300)] {
            service.update(Message::read_line(&format!(
                "join {id} {player} {player} {rating}"
            ))?)?;
        }
        service.update(Message::read_line(&format!("start {id}"))?)?;

        assert_eq!(
            service.update(Message::read_line(&format!("result {id} 1-1 white"))?)?,
            Some(format!("result {id} in_progress"))
        );
        assert_eq!(
            service.update(Message::read_line(&format!("result {id} 1-2 draw"))?)?,
            Some(format!("result {id} next_round 2"))
        );
        assert!(
            service
                .update(Message::read_line(&format!("result {id} 1-1 white"))?)
                .is_err()
        );
        assert_eq!(
            service.update(Message::read_line("category 1850")?)?,
            Some("category 1850 Expert 8%".to_string())
        );
        assert!(service.update(Message::read_line("performance")?).is_err());

        Ok(())
    }

    #[test]
    fn huge_time_controls_still_list() -> anyhow::Result<()> {
        let mut service = TournamentService::new(MemoryStore::default())?;

        let reply = service
            .update(Message::read_line("create Big swiss 4 99999999+0")?)?
            .unwrap_or_default();
        let id = reply
            .strip_prefix("create ")
            .ok_or_else(|| anyhow::Error::msg("bad create reply"))?
            .to_string();

        let list = service
            .update(Message::read_line("list")?)?
            .unwrap_or_default();
        assert!(list.contains(&format!("{id} upcoming swiss 99999999+0 classical")));

        let show = service
            .update(Message::read_line(&format!("show {id}"))?)?
            .unwrap_or_default();
        assert!(show.contains("classical"));

        Ok(())
    }
}
