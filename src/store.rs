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

//! Where tournaments live between runs.
//!
//! A store only ever sees whole snapshots: everything is read once at start
//! up and everything is written after each change.

use std::{
    collections::HashMap,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::tournament::Tournament;

/// Every tournament, keyed by id.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Tournaments(pub HashMap<String, Tournament>);

impl Tournaments {
    pub fn insert(&mut self, tournament: Tournament) {
        self.0.insert(tournament.id.clone(), tournament);
    }
}

pub trait TournamentStore {
    /// Reads every tournament. An empty store gives an empty map.
    ///
    /// # Errors
    ///
    /// If the store exists but can't be read or parsed.
    fn load_all(&self) -> anyhow::Result<Tournaments>;

    /// Replaces everything stored with `tournaments`.
    ///
    /// # Errors
    ///
    /// If the store can't be written.
    fn save_all(&self, tournaments: &Tournaments) -> anyhow::Result<()>;
}

/// A RON file holding the whole map.
#[derive(Clone, Debug)]
pub struct RonStore {
    path: PathBuf,
}

impl RonStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TournamentStore for RonStore {
    fn load_all(&self) -> anyhow::Result<Tournaments> {
        match fs::read_to_string(&self.path) {
            Ok(string) => match ron::from_str(string.as_str()) {
                Ok(tournaments) => {
                    debug!("loaded {}", self.path.display());
                    Ok(tournaments)
                }
                Err(err) => Err(anyhow::Error::msg(format!(
                    "RON: {}: {err}",
                    self.path.display(),
                ))),
            },
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    debug!("{} does not exist yet", self.path.display());
                    Ok(Tournaments::default())
                }
                _ => Err(anyhow::Error::msg(format!(
                    "{}: {err}",
                    self.path.display()
                ))),
            },
        }
    }

    fn save_all(&self, tournaments: &Tournaments) -> anyhow::Result<()> {
        let string = ron::ser::to_string_pretty(tournaments, ron::ser::PrettyConfig::default())?;

        let mut file = File::create(&self.path)?;
        file.write_all(string.as_bytes())?;

        debug!("saved {}", self.path.display());
        Ok(())
    }
}

/// Keeps the last snapshot in memory. Clones share the same snapshot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tournaments: Arc<Mutex<Tournaments>>,
    saves: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// A copy of what was saved last.
    ///
    /// # Errors
    ///
    /// If the lock is poisoned.
    pub fn snapshot(&self) -> anyhow::Result<Tournaments> {
        self.load_all()
    }

    /// How many times the snapshot was written.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl TournamentStore for MemoryStore {
    fn load_all(&self) -> anyhow::Result<Tournaments> {
        let tournaments = self
            .tournaments
            .lock()
            .map_err(|err| anyhow::Error::msg(err.to_string()))?;

        Ok(tournaments.clone())
    }

    fn save_all(&self, tournaments: &Tournaments) -> anyhow::Result<()> {
        let mut stored = self
            .tournaments
            .lock()
            .map_err(|err| anyhow::Error::msg(err.to_string()))?;

        *stored = tournaments.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::NewTournament;

    #[test]
    fn memory_store_shares_snapshots() -> anyhow::Result<()> {
        let store = MemoryStore::default();
        let clone = store.clone();
        assert!(store.load_all()?.0.is_empty());

        let mut tournaments = Tournaments::default();
        tournaments.insert(Tournament::new(
            "abc".to_string(),
            NewTournament {
                name: "Stored".to_string(),
                max_players: 8,
                ..NewTournament::default()
            },
        ));
        store.save_all(&tournaments)?;

        assert_eq!(clone.snapshot()?, tournaments);
        assert_eq!(clone.saves(), 1);

        Ok(())
    }
}
