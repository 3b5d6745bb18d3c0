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

//! Shares one [`TournamentService`] between threads.
//!
//! The service lives on its own thread and handles one request at a time,
//! so two results for the same pairing can never race.

use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread::{self, JoinHandle},
};

use log::{debug, info};

use crate::{
    message::Message,
    service::TournamentService,
    standings::Standing,
    status::{PairingResult, TournamentStatus},
    store::TournamentStore,
    tournament::{
        GameRecord, NewTournament, PlayerIdentity, RoundProgress, Tournament, TournamentError,
    },
};

type Reply<T> = Sender<Result<T, TournamentError>>;

#[derive(Debug)]
enum Request {
    BeginGame {
        id: String,
        pairing_id: String,
        game_id: String,
        game: Option<GameRecord>,
        reply: Reply<()>,
    },
    CalculateTiebreaks(String, Reply<()>),
    Cancel(String, Reply<()>),
    Create(Box<NewTournament>, Sender<String>),
    Get(String, Reply<Tournament>),
    Join(String, PlayerIdentity, Reply<()>),
    List(Option<TournamentStatus>, Sender<Vec<Tournament>>),
    RecordResult {
        id: String,
        pairing_id: String,
        result: PairingResult,
        reply: Reply<RoundProgress>,
    },
    Standings(String, Reply<Vec<Standing>>),
    Start(String, Reply<()>),
    Update(Message, Sender<anyhow::Result<Option<String>>>),
    Withdraw(String, String, Reply<()>),
}

/// A cheap to clone sender of requests to the service thread.
///
/// The thread exits once every handle is dropped.
#[derive(Clone, Debug)]
pub struct TournamentHandle {
    tx: Sender<Request>,
}

impl TournamentHandle {
    #[must_use]
    pub fn spawn<S>(service: TournamentService<S>) -> (Self, JoinHandle<()>)
    where
        S: TournamentStore + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let thread = thread::spawn(move || {
            let mut service = service;
            handle_requests(&mut service, &rx);
        });

        (Self { tx }, thread)
    }

    fn call<T>(&self, request: impl FnOnce(Sender<T>) -> Request) -> Result<T, TournamentError> {
        let (reply, rx) = mpsc::channel();
        self.tx
            .send(request(reply))
            .map_err(|_| TournamentError::Disconnected)?;

        rx.recv().map_err(|_| TournamentError::Disconnected)
    }

    /// # Errors
    ///
    /// If the service thread is gone.
    pub fn create(&self, draft: NewTournament) -> Result<String, TournamentError> {
        self.call(|reply| Request::Create(Box::new(draft), reply))
    }

    /// # Errors
    ///
    /// If there is no such tournament or the service thread is gone.
    pub fn get(&self, id: &str) -> Result<Tournament, TournamentError> {
        self.call(|reply| Request::Get(id.to_string(), reply))?
    }

    /// # Errors
    ///
    /// If the service thread is gone.
    pub fn list(
        &self,
        status: Option<TournamentStatus>,
    ) -> Result<Vec<Tournament>, TournamentError> {
        self.call(|reply| Request::List(status, reply))
    }

    /// # Errors
    ///
    /// See [`Tournament::join`].
    pub fn join(&self, id: &str, identity: PlayerIdentity) -> Result<(), TournamentError> {
        self.call(|reply| Request::Join(id.to_string(), identity, reply))?
    }

    /// # Errors
    ///
    /// See [`Tournament::withdraw`].
    pub fn withdraw(&self, id: &str, player_id: &str) -> Result<(), TournamentError> {
        self.call(|reply| Request::Withdraw(id.to_string(), player_id.to_string(), reply))?
    }

    /// # Errors
    ///
    /// See [`Tournament::start`].
    pub fn start(&self, id: &str) -> Result<(), TournamentError> {
        self.call(|reply| Request::Start(id.to_string(), reply))?
    }

    /// # Errors
    ///
    /// See [`Tournament::begin_game`].
    pub fn begin_game(
        &self,
        id: &str,
        pairing_id: &str,
        game_id: String,
        game: Option<GameRecord>,
    ) -> Result<(), TournamentError> {
        self.call(|reply| Request::BeginGame {
            id: id.to_string(),
            pairing_id: pairing_id.to_string(),
            game_id,
            game,
            reply,
        })?
    }

    /// # Errors
    ///
    /// See [`Tournament::record_result`].
    pub fn record_result(
        &self,
        id: &str,
        pairing_id: &str,
        result: PairingResult,
    ) -> Result<RoundProgress, TournamentError> {
        self.call(|reply| Request::RecordResult {
            id: id.to_string(),
            pairing_id: pairing_id.to_string(),
            result,
            reply,
        })?
    }

    /// # Errors
    ///
    /// See [`Tournament::cancel`].
    pub fn cancel(&self, id: &str) -> Result<(), TournamentError> {
        self.call(|reply| Request::Cancel(id.to_string(), reply))?
    }

    /// # Errors
    ///
    /// See [`Tournament::calculate_tiebreaks`].
    pub fn calculate_tiebreaks(&self, id: &str) -> Result<(), TournamentError> {
        self.call(|reply| Request::CalculateTiebreaks(id.to_string(), reply))?
    }

    /// # Errors
    ///
    /// If there is no such tournament or the service thread is gone.
    pub fn standings(&self, id: &str) -> Result<Vec<Standing>, TournamentError> {
        self.call(|reply| Request::Standings(id.to_string(), reply))?
    }

    /// Runs one protocol command on the service thread.
    ///
    /// # Errors
    ///
    /// If the command fails or the service thread is gone.
    pub fn update(&self, message: Message) -> anyhow::Result<Option<String>> {
        self.call(|reply| Request::Update(message, reply))?
    }
}

fn handle_requests<S: TournamentStore>(
    service: &mut TournamentService<S>,
    rx: &Receiver<Request>,
) {
    info!("tournament service started");

    for request in rx {
        debug!("{request:?}");

        // A send only fails when the caller stopped waiting.
        match request {
            Request::BeginGame {
                id,
                pairing_id,
                game_id,
                game,
                reply,
            } => {
                let _ = reply.send(service.begin_game(&id, &pairing_id, game_id, game));
            }
            Request::CalculateTiebreaks(id, reply) => {
                let _ = reply.send(service.calculate_tiebreaks(&id));
            }
            Request::Cancel(id, reply) => {
                let _ = reply.send(service.cancel(&id));
            }
            Request::Create(draft, reply) => {
                let _ = reply.send(service.create(*draft));
            }
            Request::Get(id, reply) => {
                let _ = reply.send(service.get(&id).cloned());
            }
            Request::Join(id, identity, reply) => {
                let _ = reply.send(service.join(&id, identity));
            }
            Request::List(status, reply) => {
                let _ = reply.send(service.list(status).into_iter().cloned().collect());
            }
            Request::RecordResult {
                id,
                pairing_id,
                result,
                reply,
            } => {
                let _ = reply.send(service.record_result(&id, &pairing_id, result));
            }
            Request::Standings(id, reply) => {
                let _ = reply.send(service.standings(&id));
            }
            Request::Start(id, reply) => {
                let _ = reply.send(service.start(&id));
            }
            Request::Update(message, reply) => {
                let _ = reply.send(service.update(message));
            }
            Request::Withdraw(id, player_id, reply) => {
                let _ = reply.send(service.withdraw(&id, &player_id));
            }
        }
    }

    info!("tournament service stopped");
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn stops_when_every_handle_is_dropped() -> anyhow::Result<()> {
        let (handle, thread) = TournamentHandle::spawn(TournamentService::new(
            MemoryStore::default(),
        )?);

        let id = handle.create(NewTournament {
            name: "Late Night Bullet".to_string(),
            starts_at: Utc::now(),
            max_players: 4,
            ..NewTournament::default()
        })?;
        assert_eq!(handle.get(&id)?.name, "Late Night Bullet");
        assert_eq!(
            handle.get("nope"),
            Err(TournamentError::NotFound("nope".to_string()))
        );

        let other = handle.clone();
        drop(handle);
        assert_eq!(other.list(None)?.len(), 1);
        drop(other);

        thread
            .join()
            .map_err(|_| anyhow::Error::msg("the service thread panicked"))?;

        Ok(())
    }
}
