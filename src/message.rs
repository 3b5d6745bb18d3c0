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

//! The line based text protocol spoken by `tournament-server`.
//!
//! One command per line, words separated by spaces, `#` starts a comment.
//! Replies start with `= ` on success and `? ` on failure.

use std::{borrow::Cow, str::FromStr};

use anyhow::Context;

use crate::{
    format::Format,
    status::{Outcome, PairingResult, TournamentStatus},
    time::TimeControl,
    tournament::{GameRecord, PlayerIdentity},
};

pub const COMMANDS: [&str; 14] = [
    "cancel",
    "category",
    "create",
    "game",
    "join",
    "list",
    "list_commands",
    "performance",
    "result",
    "show",
    "standings",
    "start",
    "tiebreaks",
    "withdraw",
];

#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Empty,
    /// `cancel TOURNAMENT`
    Cancel(String),
    /// `category RATING`
    Category(i32),
    /// `create NAME FORMAT MAX_PLAYERS [TIME_CONTROL] [MIN_RATING|_] [MAX_RATING|_]`
    Create {
        name: String,
        format: Format,
        max_players: usize,
        time_control: TimeControl,
        min_rating: Option<i32>,
        max_rating: Option<i32>,
    },
    /// `game TOURNAMENT PAIRING GAME_ID [RON]`
    Game {
        tournament: String,
        pairing: String,
        game_id: String,
        record: Option<GameRecord>,
    },
    /// `join TOURNAMENT PLAYER_ID USERNAME RATING [TITLE]`
    Join {
        tournament: String,
        player: PlayerIdentity,
    },
    /// `list [STATUS]`
    List(Option<TournamentStatus>),
    ListCommands,
    /// `performance RATING OUTCOME [RATING OUTCOME]...`
    Performance(Vec<(i32, Outcome)>),
    /// `result TOURNAMENT PAIRING white|black|draw`
    Result {
        tournament: String,
        pairing: String,
        result: PairingResult,
    },
    /// `show TOURNAMENT`
    Show(String),
    /// `standings TOURNAMENT`
    Standings(String),
    /// `start TOURNAMENT`
    Start(String),
    /// `tiebreaks TOURNAMENT`
    Tiebreaks(String),
    /// `withdraw TOURNAMENT PLAYER_ID`
    Withdraw { tournament: String, player: String },
}

impl Message {
    /// Parses a line, ignoring anything after a `#`.
    ///
    /// # Errors
    ///
    /// If the line is not a valid command.
    pub fn read_line(buffer: &str) -> anyhow::Result<Self> {
        let mut buffer = Cow::from(buffer);
        if let Some(comment_offset) = buffer.find('#') {
            buffer.to_mut().replace_range(comment_offset.., "");
        }

        Self::from_str(buffer.as_ref())
    }
}

fn word<'a>(words: &[&'a str], index: usize, usage: &str) -> anyhow::Result<&'a str> {
    words
        .get(index)
        .copied()
        .ok_or_else(|| anyhow::Error::msg(format!("expected: {usage}")))
}

fn optional_rating(words: &[&str], index: usize) -> anyhow::Result<Option<i32>> {
    match words.get(index) {
        None | Some(&"_") => Ok(None),
        Some(rating) => Ok(Some(
            rating
                .parse::<i32>()
                .with_context(|| format!("'{rating}' is not a rating"))?,
        )),
    }
}

impl FromStr for Message {
    type Err = anyhow::Error;

    #[allow(clippy::too_many_lines)]
    fn from_str(line: &str) -> anyhow::Result<Self> {
        let words: Vec<&str> = line.split_ascii_whitespace().collect();

        let Some(command) = words.first() else {
            return Ok(Self::Empty);
        };

        match *command {
            "cancel" => Ok(Self::Cancel(
                word(&words, 1, "cancel TOURNAMENT")?.to_string(),
            )),
            "category" => {
                let rating = word(&words, 1, "category RATING")?;
                Ok(Self::Category(rating.parse::<i32>().with_context(|| {
                    format!("category: '{rating}' is not a rating")
                })?))
            }
            "create" => {
                let usage = "create NAME FORMAT MAX_PLAYERS [TIME_CONTROL] [MIN_RATING|_] [MAX_RATING|_]";
                let name = word(&words, 1, usage)?.replace('_', " ");
                let format = word(&words, 2, usage)?.parse::<Format>()?;
                let max_players = word(&words, 3, usage)?
                    .parse::<usize>()
                    .context("create: MAX_PLAYERS is not a number")?;
                let time_control = match words.get(4) {
                    Some(time_control) => time_control.parse::<TimeControl>()?,
                    None => TimeControl::default(),
                };

                Ok(Self::Create {
                    name,
                    format,
                    max_players,
                    time_control,
                    min_rating: optional_rating(&words, 5)?,
                    max_rating: optional_rating(&words, 6)?,
                })
            }
            "game" => {
                let usage = "game TOURNAMENT PAIRING GAME_ID [RON]";
                let record = match words.get(4..) {
                    Some(rest) if !rest.is_empty() => Some(GameRecord(
                        ron::from_str::<ron::Value>(&rest.join(" ")).context("game: invalid RON")?,
                    )),
                    _ => None,
                };

                Ok(Self::Game {
                    tournament: word(&words, 1, usage)?.to_string(),
                    pairing: word(&words, 2, usage)?.to_string(),
                    game_id: word(&words, 3, usage)?.to_string(),
                    record,
                })
            }
            "join" => {
                let usage = "join TOURNAMENT PLAYER_ID USERNAME RATING [TITLE]";
                let rating = word(&words, 4, usage)?;

                Ok(Self::Join {
                    tournament: word(&words, 1, usage)?.to_string(),
                    player: PlayerIdentity {
                        id: word(&words, 2, usage)?.to_string(),
                        username: word(&words, 3, usage)?.to_string(),
                        rating: rating
                            .parse::<i32>()
                            .with_context(|| format!("join: '{rating}' is not a rating"))?,
                        title: words.get(5).map(|title| (*title).to_string()),
                    },
                })
            }
            "list" => Ok(Self::List(match words.get(1) {
                Some(status) => Some(status.parse::<TournamentStatus>()?),
                None => None,
            })),
            "list_commands" => Ok(Self::ListCommands),
            "performance" => {
                let games = words
                    .get(1..)
                    .unwrap_or_default()
                    .chunks(2)
                    .map(|game| match game {
                        [rating, outcome] => Ok((
                            rating
                                .parse::<i32>()
                                .with_context(|| format!("performance: '{rating}' is not a rating"))?,
                            outcome.parse::<Outcome>()?,
                        )),
                        _ => Err(anyhow::Error::msg(
                            "expected: performance RATING OUTCOME [RATING OUTCOME]...",
                        )),
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;

                Ok(Self::Performance(games))
            }
            "result" => {
                let usage = "result TOURNAMENT PAIRING white|black|draw";

                Ok(Self::Result {
                    tournament: word(&words, 1, usage)?.to_string(),
                    pairing: word(&words, 2, usage)?.to_string(),
                    result: word(&words, 3, usage)?.parse::<PairingResult>()?,
                })
            }
            "show" => Ok(Self::Show(word(&words, 1, "show TOURNAMENT")?.to_string())),
            "standings" => Ok(Self::Standings(
                word(&words, 1, "standings TOURNAMENT")?.to_string(),
            )),
            "start" => Ok(Self::Start(word(&words, 1, "start TOURNAMENT")?.to_string())),
            "tiebreaks" => Ok(Self::Tiebreaks(
                word(&words, 1, "tiebreaks TOURNAMENT")?.to_string(),
            )),
            "withdraw" => {
                let usage = "withdraw TOURNAMENT PLAYER_ID";

                Ok(Self::Withdraw {
                    tournament: word(&words, 1, usage)?.to_string(),
                    player: word(&words, 2, usage)?.to_string(),
                })
            }
            command => Err(anyhow::Error::msg(format!(
                "unknown command: {command}, try list_commands"
            ))),
        }
    }
}
