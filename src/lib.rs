//! A chess tournament engine: Swiss and round robin pairing, Elo ratings,
//! tiebreaks, achievements and a tournament state machine that persists
//! itself after every change.
//!
//! ## Layout
//!
//! * [`tournament`] - the tournament state machine
//! * [`pairing`], [`tiebreak`], [`standings`] - what happens inside a round
//! * [`rating`], [`category`], [`achievements`] - the rating engine
//! * [`service`], [`handle`], [`store`] - ownership, threads and persistence
//! * [`message`] - the text protocol spoken by `tournament-server`

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


#![deny(clippy::panic)]

pub mod achievements;
pub mod category;
pub mod color;
pub mod format;
pub mod handle;
pub mod message;
pub mod pairing;
pub mod rating;
pub mod seed;
pub mod service;
pub mod standings;
pub mod status;
pub mod store;
pub mod tiebreak;
pub mod time;
pub mod tournament;
pub mod utils;

pub const HOME: &str = "tournament-engine";

pub const COPYRIGHT: &str = r".SH COPYRIGHT
Copyright (C) 2026 Developers of the tournament-engine project

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
";

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright (c) 2026 Developers of the tournament-engine project
Licensed under the AGPLv3"
);
