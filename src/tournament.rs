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

//! A tournament and every transition it can go through.
//!
//! A tournament is created `Upcoming`, collects players until it is started,
//! then runs round after round until its format says stop. Completed and
//! cancelled tournaments are never changed again.

use std::{cmp::Ordering, fmt};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    color::Color,
    format::Format,
    pairing::PairingSystem,
    rating::{Rated, performance_delta},
    standings::Standing,
    status::{PairingResult, PlayerStatus, RoundStatus, TournamentStatus},
    tiebreak::TiebreakMethod,
    time::TimeControl,
};

#[derive(Error, Debug, Eq, PartialEq)]
pub enum TournamentError {
    #[error("tournament {0} does not exist")]
    NotFound(String),
    #[error("pairing {0} does not exist")]
    PairingNotFound(String),
    #[error("player {0} is not in the tournament")]
    PlayerNotFound(String),
    #[error("the tournament is {status}, it has to be {expected}")]
    InvalidTransition {
        status: TournamentStatus,
        expected: &'static str,
    },
    #[error("at least 2 players are needed, there are {0}")]
    NotEnoughPlayers(usize),
    #[error("the tournament is full with {0} players")]
    CapacityExceeded(usize),
    #[error("a rating of {0} is not allowed in the tournament")]
    RatingGateViolation(i32),
    #[error("player {0} already joined")]
    AlreadyJoined(String),
    #[error("pairing {0} already has a result")]
    DuplicateResult(String),
    #[error("the tournament service is not running")]
    Disconnected,
}

/// Who a player is, as supplied by whoever manages accounts.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerIdentity {
    pub id: String,
    pub username: String,
    pub rating: i32,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TournamentPlayer {
    pub id: String,
    pub username: String,
    /// The rating at join time. It never changes during the tournament.
    pub rating: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub score: f64,
    /// Only as fresh as the last tiebreak calculation.
    #[serde(default)]
    pub tiebreak: f64,
    #[serde(default)]
    pub games_played: u32,
    pub performance: f64,
    #[serde(default)]
    pub status: PlayerStatus,
    pub joined_at: DateTime<Utc>,
}

impl TournamentPlayer {
    #[must_use]
    pub fn new(identity: PlayerIdentity, now: DateTime<Utc>) -> Self {
        Self {
            id: identity.id,
            username: identity.username,
            rating: identity.rating,
            title: identity.title,
            score: 0.0,
            tiebreak: 0.0,
            games_played: 0,
            performance: f64::from(identity.rating),
            status: PlayerStatus::Active,
            joined_at: now,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Orders the stronger standing first: by score, then tiebreak, then
    /// rating, all descending.
    #[must_use]
    pub fn standing_cmp(&self, other: &TournamentPlayer) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.tiebreak.total_cmp(&self.tiebreak))
            .then_with(|| other.rating.cmp(&self.rating))
    }
}

impl fmt::Display for TournamentPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            write!(f, "{title} ")?;
        }

        write!(f, "{} ({})", self.username, self.rating)
    }
}

/// Whatever the game server attached to a pairing. Never inspected here.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GameRecord(pub ron::Value);

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TournamentPairing {
    pub id: String,
    pub white: String,
    pub black: String,
    #[serde(default)]
    pub result: Option<PairingResult>,
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default)]
    pub game: Option<GameRecord>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

impl TournamentPairing {
    #[must_use]
    pub fn new(id: String, white: String, black: String) -> Self {
        Self {
            id,
            white,
            black,
            result: None,
            game_id: None,
            game: None,
            started_at: None,
            ended_at: None,
        }
    }

    #[must_use]
    pub fn player(&self, color: Color) -> &str {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    #[must_use]
    pub fn color_of(&self, player_id: &str) -> Option<Color> {
        if self.white == player_id {
            Some(Color::White)
        } else if self.black == player_id {
            Some(Color::Black)
        } else {
            None
        }
    }

    #[must_use]
    pub fn opponent_of(&self, player_id: &str) -> Option<&str> {
        self.color_of(player_id)
            .map(|color| self.player(color.opposite()))
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TournamentRound {
    /// 1-based.
    pub number: u32,
    pub pairings: Vec<TournamentPairing>,
    #[serde(default)]
    pub bye: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: RoundStatus,
}

impl TournamentRound {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pairings.iter().all(|pairing| pairing.result.is_some())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TournamentSettings {
    #[serde(default)]
    pub time_control: TimeControl,
    #[serde(default = "default_round_duration")]
    pub round_duration_minutes: u32,
    #[serde(default)]
    pub pairing_system: PairingSystem,
    #[serde(default = "default_tiebreaks")]
    pub tiebreaks: Vec<TiebreakMethod>,
    /// Without byes the odd player out sits the round out for no points.
    #[serde(default = "default_true")]
    pub allow_byes: bool,
    #[serde(default)]
    pub max_rounds: Option<u32>,
}

fn default_round_duration() -> u32 {
    60
}

fn default_tiebreaks() -> Vec<TiebreakMethod> {
    vec![TiebreakMethod::Buchholz]
}

fn default_true() -> bool {
    true
}

impl TournamentSettings {
    #[must_use]
    pub fn for_format(format: Format, time_control: TimeControl) -> Self {
        Self {
            time_control,
            pairing_system: format.default_pairing_system(),
            ..Self::default()
        }
    }
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            time_control: TimeControl::default(),
            round_duration_minutes: default_round_duration(),
            pairing_system: PairingSystem::default(),
            tiebreaks: default_tiebreaks(),
            allow_byes: true,
            max_rounds: None,
        }
    }
}

/// Everything needed to open a tournament for registration.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub time_control: TimeControl,
    pub starts_at: DateTime<Utc>,
    pub max_players: usize,
    #[serde(default)]
    pub entry_fee: Option<u32>,
    #[serde(default)]
    pub prize_pool: Option<u32>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub rated: Rated,
    #[serde(default)]
    pub min_rating: Option<i32>,
    #[serde(default)]
    pub max_rating: Option<i32>,
    /// Falls back to [`TournamentSettings::for_format`].
    #[serde(default)]
    pub settings: Option<TournamentSettings>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub format: Format,
    pub status: TournamentStatus,
    pub time_control: TimeControl,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    pub max_players: usize,
    /// Always `participants.len()`.
    pub current_players: usize,
    #[serde(default)]
    pub entry_fee: Option<u32>,
    #[serde(default)]
    pub prize_pool: Option<u32>,
    #[serde(default)]
    pub rounds: Vec<TournamentRound>,
    #[serde(default)]
    pub participants: Vec<TournamentPlayer>,
    #[serde(default)]
    pub settings: TournamentSettings,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub rated: Rated,
    #[serde(default)]
    pub min_rating: Option<i32>,
    #[serde(default)]
    pub max_rating: Option<i32>,
}

/// What recording a result did to the tournament.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RoundProgress {
    /// The current round still has games without a result.
    InProgress,
    /// The round finished and this round was paired.
    NextRound(u32),
    /// The round finished and so did the tournament.
    Completed,
}

impl Tournament {
    #[must_use]
    pub fn new(id: String, draft: NewTournament) -> Self {
        let settings = draft
            .settings
            .unwrap_or_else(|| TournamentSettings::for_format(draft.format, draft.time_control));

        Self {
            id,
            name: draft.name,
            description: draft.description,
            format: draft.format,
            status: TournamentStatus::Upcoming,
            time_control: draft.time_control,
            starts_at: draft.starts_at,
            ends_at: None,
            max_players: draft.max_players,
            current_players: 0,
            entry_fee: draft.entry_fee,
            prize_pool: draft.prize_pool,
            rounds: Vec::new(),
            participants: Vec::new(),
            settings,
            created_by: draft.created_by,
            rated: draft.rated,
            min_rating: draft.min_rating,
            max_rating: draft.max_rating,
        }
    }

    #[must_use]
    pub fn player(&self, player_id: &str) -> Option<&TournamentPlayer> {
        self.participants
            .iter()
            .find(|player| player.id == player_id)
    }

    fn player_mut(&mut self, player_id: &str) -> Option<&mut TournamentPlayer> {
        self.participants
            .iter_mut()
            .find(|player| player.id == player_id)
    }

    /// Active players in join order.
    #[must_use]
    pub fn active_players(&self) -> Vec<&TournamentPlayer> {
        self.participants
            .iter()
            .filter(|player| player.is_active())
            .collect()
    }

    #[must_use]
    pub fn current_round(&self) -> Option<&TournamentRound> {
        self.rounds.last()
    }

    #[must_use]
    pub fn pairing(&self, pairing_id: &str) -> Option<&TournamentPairing> {
        self.find_pairing(pairing_id)
            .map(|(round, pairing)| &self.rounds[round].pairings[pairing])
    }

    fn find_pairing(&self, pairing_id: &str) -> Option<(usize, usize)> {
        self.rounds.iter().enumerate().rev().find_map(|(index, round)| {
            round
                .pairings
                .iter()
                .position(|pairing| pairing.id == pairing_id)
                .map(|pairing| (index, pairing))
        })
    }

    fn expect_status(
        &self,
        status: TournamentStatus,
        expected: &'static str,
    ) -> Result<(), TournamentError> {
        if self.status == status {
            Ok(())
        } else {
            Err(TournamentError::InvalidTransition {
                status: self.status,
                expected,
            })
        }
    }

    fn rating_allowed(&self, rating: i32) -> bool {
        self.min_rating.is_none_or(|min| rating >= min)
            && self.max_rating.is_none_or(|max| rating <= max)
    }

    /// # Errors
    ///
    /// If the tournament is not upcoming, is full, already has the player, or
    /// the player's rating is outside its rating range.
    pub fn join(
        &mut self,
        identity: PlayerIdentity,
        now: DateTime<Utc>,
    ) -> Result<(), TournamentError> {
        self.expect_status(TournamentStatus::Upcoming, "upcoming")?;

        if self.current_players >= self.max_players {
            return Err(TournamentError::CapacityExceeded(self.max_players));
        }
        if self.player(&identity.id).is_some() {
            return Err(TournamentError::AlreadyJoined(identity.id));
        }
        if !self.rating_allowed(identity.rating) {
            return Err(TournamentError::RatingGateViolation(identity.rating));
        }

        info!(
            "{} {} joined, {} of {} players",
            self.id,
            identity.username,
            self.current_players + 1,
            self.max_players
        );

        self.participants.push(TournamentPlayer::new(identity, now));
        self.current_players = self.participants.len();
        Ok(())
    }

    /// Leaves an upcoming tournament, or stops being paired in an active one.
    ///
    /// # Errors
    ///
    /// If the player is unknown or the tournament is over.
    pub fn withdraw(&mut self, player_id: &str) -> Result<(), TournamentError> {
        match self.status {
            TournamentStatus::Upcoming => {
                let index = self
                    .participants
                    .iter()
                    .position(|player| player.id == player_id)
                    .ok_or_else(|| TournamentError::PlayerNotFound(player_id.to_string()))?;

                self.participants.remove(index);
                self.current_players = self.participants.len();
            }
            TournamentStatus::Active => {
                let player = self
                    .player_mut(player_id)
                    .ok_or_else(|| TournamentError::PlayerNotFound(player_id.to_string()))?;

                player.status = PlayerStatus::Withdrawn;
            }
            status @ (TournamentStatus::Completed | TournamentStatus::Cancelled) => {
                return Err(TournamentError::InvalidTransition {
                    status,
                    expected: "upcoming or active",
                });
            }
        }

        info!("{} {player_id} withdrew", self.id);
        Ok(())
    }

    /// # Errors
    ///
    /// If the tournament is not upcoming or has fewer than two players.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), TournamentError> {
        self.expect_status(TournamentStatus::Upcoming, "upcoming")?;

        if self.participants.len() < 2 {
            return Err(TournamentError::NotEnoughPlayers(self.participants.len()));
        }

        self.status = TournamentStatus::Active;
        self.starts_at = now;
        info!(
            "{} started with {} players",
            self.id,
            self.participants.len()
        );

        self.create_next_round(now);
        Ok(())
    }

    /// Pairs the active players into a new round.
    ///
    /// Returns `false`, changing nothing, when fewer than two players are
    /// active.
    pub fn create_next_round(&mut self, now: DateTime<Utc>) -> bool {
        let active = self.active_players();
        if active.len() < 2 {
            debug!("{} can't pair {} active players", self.id, active.len());
            return false;
        }

        let number = u32::try_from(self.rounds.len() + 1).unwrap_or(u32::MAX);
        let pairings = self
            .settings
            .pairing_system
            .generate_pairings(&active, number);

        let games: Vec<_> = pairings
            .pairs
            .into_iter()
            .enumerate()
            .map(|(board, (white, black))| {
                TournamentPairing::new(format!("{number}-{}", board + 1), white, black)
            })
            .collect();

        if let Some(bye) = &pairings.bye
            && self.settings.allow_byes
            && let Some(player) = self.player_mut(bye)
        {
            player.score += 1.0;
        }

        info!(
            "{} round {number}: {} games, bye: {}",
            self.id,
            games.len(),
            pairings.bye.as_deref().unwrap_or("-")
        );

        self.rounds.push(TournamentRound {
            number,
            pairings: games,
            bye: pairings.bye,
            started_at: Some(now),
            ended_at: None,
            status: RoundStatus::Active,
        });

        true
    }

    /// Whether the format wants another round after the ones played so far.
    #[must_use]
    pub fn should_continue(&self) -> bool {
        self.format.should_continue(
            self.rounds.len(),
            self.active_players().len(),
            self.settings.max_rounds,
        )
    }

    /// Attaches the game that will decide a pairing.
    ///
    /// # Errors
    ///
    /// If the tournament is not active, or the pairing is unknown or decided.
    pub fn begin_game(
        &mut self,
        pairing_id: &str,
        game_id: String,
        game: Option<GameRecord>,
        now: DateTime<Utc>,
    ) -> Result<(), TournamentError> {
        self.expect_status(TournamentStatus::Active, "active")?;

        let (round, pairing) = self
            .find_pairing(pairing_id)
            .ok_or_else(|| TournamentError::PairingNotFound(pairing_id.to_string()))?;
        let pairing = &mut self.rounds[round].pairings[pairing];

        if pairing.result.is_some() {
            return Err(TournamentError::DuplicateResult(pairing_id.to_string()));
        }

        debug!("{} pairing {pairing_id} is game {game_id}", self.id);
        pairing.game_id = Some(game_id);
        pairing.game = game;
        pairing.started_at = Some(now);
        Ok(())
    }

    /// Decides a pairing and, if that finishes the round, moves on.
    ///
    /// # Errors
    ///
    /// If the tournament is not active, the pairing is unknown, or the pairing
    /// already has a result. Nothing changes on error.
    pub fn record_result(
        &mut self,
        pairing_id: &str,
        result: PairingResult,
        now: DateTime<Utc>,
    ) -> Result<RoundProgress, TournamentError> {
        self.expect_status(TournamentStatus::Active, "active")?;

        let (round_index, pairing_index) = self
            .find_pairing(pairing_id)
            .ok_or_else(|| TournamentError::PairingNotFound(pairing_id.to_string()))?;
        let pairing = &self.rounds[round_index].pairings[pairing_index];

        if pairing.result.is_some() {
            return Err(TournamentError::DuplicateResult(pairing_id.to_string()));
        }

        let white = pairing.white.clone();
        let black = pairing.black.clone();
        let rating = |id: &str| {
            self.player(id)
                .map(|player| f64::from(player.rating))
                .ok_or_else(|| TournamentError::PlayerNotFound(id.to_string()))
        };
        let white_rating = rating(&white)?;
        let black_rating = rating(&black)?;

        let pairing = &mut self.rounds[round_index].pairings[pairing_index];
        pairing.result = Some(result);
        pairing.ended_at = Some(now);

        for (color, id, own, opponent) in [
            (Color::White, &white, white_rating, black_rating),
            (Color::Black, &black, black_rating, white_rating),
        ] {
            let outcome = result.outcome_for(color);
            if let Some(player) = self.player_mut(id) {
                player.score += outcome.score();
                player.games_played += 1;
                player.performance += performance_delta(own, opponent, outcome);
            }
        }

        info!("{} {pairing_id} {white} {black} {result}", self.id);

        let round = &mut self.rounds[round_index];
        if !round.is_complete() {
            return Ok(RoundProgress::InProgress);
        }

        round.status = RoundStatus::Completed;
        round.ended_at = Some(now);
        info!("{} round {} completed", self.id, round.number);

        if self.should_continue() && self.create_next_round(now) {
            let number = u32::try_from(self.rounds.len()).unwrap_or(u32::MAX);
            return Ok(RoundProgress::NextRound(number));
        }

        self.complete(now);
        Ok(RoundProgress::Completed)
    }

    fn complete(&mut self, now: DateTime<Utc>) {
        self.refresh_tiebreaks();
        self.status = TournamentStatus::Completed;
        self.ends_at = Some(now);

        let winner = self.standings().into_iter().next();
        info!(
            "{} completed after {} rounds, winner: {}",
            self.id,
            self.rounds.len(),
            winner.map_or_else(|| "-".to_string(), |standing| standing.player.to_string())
        );
    }

    /// # Errors
    ///
    /// If the tournament is already completed or cancelled.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), TournamentError> {
        if self.status.is_terminal() {
            return Err(TournamentError::InvalidTransition {
                status: self.status,
                expected: "upcoming or active",
            });
        }

        self.status = TournamentStatus::Cancelled;
        self.ends_at = Some(now);
        info!("{} cancelled", self.id);
        Ok(())
    }

    /// Sets every player's tiebreak to their current Buchholz score.
    ///
    /// # Errors
    ///
    /// If the tournament is completed or cancelled.
    pub fn calculate_tiebreaks(&mut self) -> Result<(), TournamentError> {
        if self.status.is_terminal() {
            return Err(TournamentError::InvalidTransition {
                status: self.status,
                expected: "upcoming or active",
            });
        }

        self.refresh_tiebreaks();
        Ok(())
    }

    fn refresh_tiebreaks(&mut self) {
        let mut buchholz = TiebreakMethod::Buchholz.compute_all(self);

        for player in &mut self.participants {
            player.tiebreak = buchholz.remove(&player.id).unwrap_or_default();
        }
    }

    /// Every participant, best first, numbered from 1.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        let tiebreaks: Vec<_> = self
            .settings
            .tiebreaks
            .iter()
            .map(|method| (*method, method.compute_all(self)))
            .collect();

        let mut players: Vec<_> = self.participants.iter().collect();
        players.sort_by(|a, b| a.standing_cmp(b));

        players
            .into_iter()
            .enumerate()
            .map(|(index, player)| Standing {
                position: index + 1,
                player: player.clone(),
                tiebreaks: tiebreaks
                    .iter()
                    .map(|(method, values)| {
                        (*method, values.get(&player.id).copied().unwrap_or_default())
                    })
                    .collect(),
            })
            .collect()
    }
}

impl fmt::Display for Tournament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {}/{} round {}",
            self.id,
            self.status,
            self.format,
            self.time_control,
            self.time_control.speed(),
            self.rated,
            self.starts_at.format("%F %R"),
            self.current_players,
            self.max_players,
            self.rounds.len(),
        )?;

        match (self.min_rating, self.max_rating) {
            (None, None) => {}
            (min, max) => write!(
                f,
                " rating {}..{}",
                min.map(|min| min.to_string()).unwrap_or_default(),
                max.map(|max| max.to_string()).unwrap_or_default()
            )?,
        }

        write!(f, " {}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: &str, rating: i32) -> PlayerIdentity {
        PlayerIdentity {
            id: id.to_string(),
            username: id.to_string(),
            rating,
            title: None,
        }
    }

    fn tournament(format: Format, max_players: usize) -> Tournament {
        Tournament::new(
            "t".to_string(),
            NewTournament {
                name: "Test".to_string(),
                format,
                max_players,
                ..NewTournament::default()
            },
        )
    }

    #[test]
    fn join_keeps_the_player_count() -> anyhow::Result<()> {
        let now = Utc::now();
        let mut tournament = tournament(Format::Swiss, 2);

        tournament.join(identity("a", 1500), now)?;
        assert_eq!(
            tournament.join(identity("a", 1500), now),
            Err(TournamentError::AlreadyJoined("a".to_string()))
        );
        tournament.join(identity("b", 1500), now)?;
        assert_eq!(
            tournament.join(identity("c", 1500), now),
            Err(TournamentError::CapacityExceeded(2))
        );
        assert_eq!(tournament.current_players, 2);
        assert_eq!(tournament.participants.len(), 2);

        let player = tournament
            .player("a")
            .ok_or_else(|| anyhow::Error::msg("no player"))?;
        assert!((player.performance - 1500.0).abs() < f64::EPSILON);
        assert_eq!(player.status, PlayerStatus::Active);

        Ok(())
    }

    #[test]
    fn rating_gates() {
        let now = Utc::now();
        let mut tournament = tournament(Format::Arena, 10);
        tournament.min_rating = Some(2200);
        tournament.max_rating = Some(2500);

        assert_eq!(
            tournament.join(identity("low", 2100), now),
            Err(TournamentError::RatingGateViolation(2100))
        );
        assert_eq!(
            tournament.join(identity("high", 2600), now),
            Err(TournamentError::RatingGateViolation(2600))
        );
        assert_eq!(tournament.join(identity("edge", 2200), now), Ok(()));
        assert_eq!(tournament.current_players, 1);
    }

    #[test]
    fn start_needs_two_players() {
        let now = Utc::now();
        let mut tournament = tournament(Format::Swiss, 10);
        assert_eq!(
            tournament.start(now),
            Err(TournamentError::NotEnoughPlayers(0))
        );

        let _ = tournament.join(identity("a", 1500), now);
        let _ = tournament.join(identity("b", 1500), now);
        assert_eq!(tournament.start(now), Ok(()));
        assert_eq!(tournament.status, TournamentStatus::Active);
        assert_eq!(tournament.rounds.len(), 1);

        assert!(matches!(
            tournament.start(now),
            Err(TournamentError::InvalidTransition { .. })
        ));
        assert!(matches!(
            tournament.join(identity("c", 1500), now),
            Err(TournamentError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn withdraw_before_and_after_the_start() -> anyhow::Result<()> {
        let now = Utc::now();
        let mut tournament = tournament(Format::Swiss, 10);
        for id in ["a", "b", "c", "d"] {
            tournament.join(identity(id, 1500), now)?;
        }

        tournament.withdraw("d")?;
        assert_eq!(tournament.current_players, 3);
        assert!(tournament.player("d").is_none());

        tournament.start(now)?;
        tournament.withdraw("c")?;
        assert_eq!(tournament.current_players, 3);
        assert_eq!(tournament.active_players().len(), 2);
        assert_eq!(
            tournament.withdraw("zz"),
            Err(TournamentError::PlayerNotFound("zz".to_string()))
        );

        Ok(())
    }

    #[test]
    fn bye_without_a_point() -> anyhow::Result<()> {
        let now = Utc::now();
        let mut tournament = tournament(Format::Swiss, 10);
        tournament.settings.allow_byes = false;
        for (id, rating) in [("a", 1500), ("b", 1400), ("c", 1300)] {
            tournament.join(identity(id, rating), now)?;
        }

        tournament.start(now)?;
        let round = tournament
            .current_round()
            .ok_or_else(|| anyhow::Error::msg("no round"))?;
        assert_eq!(round.bye.as_deref(), Some("c"));
        assert!(
            tournament
                .participants
                .iter()
                .all(|player| player.score.abs() < f64::EPSILON)
        );

        Ok(())
    }

    #[test]
    fn begin_game_attaches_the_game() -> anyhow::Result<()> {
        let now = Utc::now();
        let mut tournament = tournament(Format::Swiss, 10);
        tournament.join(identity("a", 1500), now)?;
        tournament.join(identity("b", 1500), now)?;
        tournament.start(now)?;

        tournament.begin_game("1-1", "game-7".to_string(), None, now)?;
        let pairing = tournament
            .pairing("1-1")
            .ok_or_else(|| anyhow::Error::msg("no pairing"))?;
        assert_eq!(pairing.game_id.as_deref(), Some("game-7"));
        assert_eq!(pairing.started_at, Some(now));

        assert_eq!(
            tournament.begin_game("9-9", "game-8".to_string(), None, now),
            Err(TournamentError::PairingNotFound("9-9".to_string()))
        );

        Ok(())
    }

    #[test]
    fn cancel_is_final() -> anyhow::Result<()> {
        let now = Utc::now();
        let mut tournament = tournament(Format::Swiss, 10);
        tournament.cancel(now)?;
        assert_eq!(tournament.status, TournamentStatus::Cancelled);
        assert!(tournament.cancel(now).is_err());
        assert!(tournament.join(identity("a", 1500), now).is_err());
        assert!(tournament.calculate_tiebreaks().is_err());

        Ok(())
    }

    #[test]
    fn standing_order() {
        let now = Utc::now();
        let mut a = TournamentPlayer::new(identity("a", 1500), now);
        let mut b = TournamentPlayer::new(identity("b", 1600), now);

        assert_eq!(a.standing_cmp(&b), Ordering::Greater);
        a.tiebreak = 1.0;
        assert_eq!(a.standing_cmp(&b), Ordering::Less);
        b.score = 0.5;
        assert_eq!(a.standing_cmp(&b), Ordering::Greater);
    }
}
